use bullion_fees_core::rates::FeeRateSet;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON or YAML file (chosen by extension) as a JSON document, leaving
/// typed parsing to the engine input's own constructor.
pub fn read_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    log::debug!("reading input from {}", canonical.display());
    parse_document(&canonical, &contents)
}

/// Load a fee rate configuration and check it before any engine sees it.
pub fn read_rates(path: &str) -> Result<FeeRateSet, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    log::debug!("loading rate configuration from {}", canonical.display());
    let rates = parse_rates(&canonical, &contents)?;
    rates.validate()?;
    Ok(rates)
}

fn parse_document(path: &Path, contents: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let value: Value = if is_yaml(path) {
        serde_yaml::from_str(contents)
            .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?
    } else {
        serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?
    };
    Ok(value)
}

fn parse_rates(path: &Path, contents: &str) -> Result<FeeRateSet, Box<dyn std::error::Error>> {
    if is_yaml(path) {
        Ok(FeeRateSet::from_value(parse_document(path, contents)?)?)
    } else {
        Ok(FeeRateSet::from_json(contents)?)
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bullion_fees_core::rates::PaymentTiming;
    use bullion_fees_core::FeeError;
    use rust_decimal_macros::dec;

    const YAML_RATES: &str = r#"
purchase_fee_pct: "0.015"
custody:
  tiers:
    - first_year: 1
      rate: "0.0025"
  timing: annual
"#;

    #[test]
    fn test_yaml_rates_parse() {
        let rates = parse_rates(Path::new("rates.yaml"), YAML_RATES).unwrap();
        assert_eq!(rates.purchase_fee_pct, dec!(0.015));
        assert_eq!(rates.custody.timing, PaymentTiming::PayEachPeriod);
    }

    #[test]
    fn test_yaml_unknown_timing_is_configuration_error() {
        let yaml = YAML_RATES.replace("timing: annual", "timing: monthly");
        let err = parse_rates(Path::new("rates.yml"), &yaml).unwrap_err();
        match err.downcast_ref::<FeeError>() {
            Some(FeeError::InvalidConfiguration { field, .. }) => assert_eq!(field, "rates"),
            other => panic!("Expected InvalidConfiguration, got: {other:?}"),
        }
    }

    #[test]
    fn test_json_unknown_timing_is_configuration_error() {
        let json = r#"{ "custody": { "tiers": [{ "first_year": 1, "rate": "0.003" }], "timing": "monthly" } }"#;
        let err = parse_rates(Path::new("rates.json"), json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FeeError>(),
            Some(FeeError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_yaml_model_input_document() {
        let yaml = r#"
unit_price: "596"
units: "1"
horizon_years: 5
rates:
  custody:
    tiers:
      - first_year: 1
        rate: "0.003"
    timing: weekly
"#;
        let value = parse_document(Path::new("model.yaml"), yaml).unwrap();
        assert!(matches!(
            bullion_fees_core::configurable::ConfigurableInput::from_value(value),
            Err(FeeError::InvalidConfiguration { .. })
        ));
    }
}
