use serde_json::Value;

use bullion_fees_core::comparison::{self, ComparisonInput};

use crate::commands::log_warnings;
use crate::commands::model::ModelArgs;

pub fn run_compare(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let compare_input = ComparisonInput::from(args.resolve()?);

    let result = comparison::calculate_comparison(&compare_input)?;
    log::debug!(
        "compare: {} against {}-year benchmark",
        result.result.primary.verdict,
        result.result.benchmark.horizon_years
    );
    log_warnings(&result.warnings);
    Ok(serde_json::to_value(result)?)
}
