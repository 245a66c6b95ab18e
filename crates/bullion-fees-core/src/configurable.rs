use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FeeError;
use crate::ledger::builder::build_ledger;
use crate::ledger::{validate_position, CalculationResult, EngineKind};
use crate::rates::{FeeRateSet, PaymentTiming};
use crate::types::*;
use crate::FeeResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurableInput {
    pub unit_price: Money,
    pub units: Units,
    pub horizon_years: u32,
    #[serde(default)]
    pub rates: FeeRateSet,
}

impl ConfigurableInput {
    /// Parse a full model input. Problems in the `rates` section are
    /// configuration errors; anything else is an input error.
    pub fn from_value(mut value: serde_json::Value) -> FeeResult<Self> {
        let rates = match value.as_object_mut().and_then(|m| m.remove("rates")) {
            Some(rates) => FeeRateSet::from_value(rates)?,
            None => FeeRateSet::zero(),
        };
        let position: ConfigurableInput =
            serde_json::from_value(value).map_err(|e| FeeError::InvalidInput {
                field: "input".into(),
                reason: e.to_string(),
            })?;
        Ok(ConfigurableInput { rates, ..position })
    }

    pub fn from_json(json: &str) -> FeeResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }
}

/// Model a proprietary fee structure over an arbitrary holding period.
///
/// Custody and management fees are settled independently according to their
/// own [`PaymentTiming`]; the redemption fee is always paid in the final year.
pub fn compute_configurable(
    unit_price: Money,
    units: Units,
    horizon_years: u32,
    rates: &FeeRateSet,
) -> FeeResult<CalculationResult> {
    validate_position(unit_price, units, horizon_years)?;
    rates.validate()?;

    build_ledger(
        EngineKind::Configurable,
        format!("Configurable: {horizon_years}-Year Hold"),
        unit_price,
        units,
        horizon_years,
        rates,
    )
}

/// Envelope wrapper around [`compute_configurable`].
pub fn calculate_configurable(
    input: &ConfigurableInput,
) -> FeeResult<ComputationOutput<CalculationResult>> {
    let start = Instant::now();
    let result = compute_configurable(
        input.unit_price,
        input.units,
        input.horizon_years,
        &input.rates,
    )?;
    let warnings = configuration_warnings(&input.rates, input.horizon_years);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Configurable fee model: one-time purchase fees, custody and management fees with independent payment timing",
        &serde_json::json!({
            "unit_price": input.unit_price.to_string(),
            "units": input.units.to_string(),
            "horizon_years": input.horizon_years,
            "custody_timing": input.rates.custody.timing,
            "management_timing": input.rates.management.timing,
        }),
        warnings,
        elapsed,
        result,
    ))
}

fn configuration_warnings(rates: &FeeRateSet, horizon_years: u32) -> Vec<String> {
    let mut warnings = Vec::new();
    if rates.is_zero() {
        warnings.push("All fee rates are zero; total fees will be zero".to_string());
    }
    for (name, fee) in [("custody", &rates.custody), ("management", &rates.management)] {
        if fee.timing == PaymentTiming::PayEachPeriod && fee.is_zero() {
            warnings.push(format!(
                "{name} fee is set to pay annually but its rate is zero"
            ));
        }
        let unused: Vec<String> = fee
            .tiers
            .iter()
            .filter(|t| t.first_year > horizon_years)
            .map(|t| t.label())
            .collect();
        if !unused.is_empty() {
            warnings.push(format!(
                "{name} tier(s) {} start after the {horizon_years}-year horizon and never apply",
                unused.join(", ")
            ));
        }
    }
    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
