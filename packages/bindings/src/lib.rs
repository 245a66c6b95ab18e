use napi::Result as NapiResult;
use napi_derive::napi;

use bullion_fees_core::ledger::CalculationResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Engines
// ---------------------------------------------------------------------------

#[napi]
pub fn fixed_schedule(input_json: String) -> NapiResult<String> {
    let input = bullion_fees_core::fixed_schedule::FixedScheduleInput::from_json(&input_json)
        .map_err(to_napi_error)?;
    let output = bullion_fees_core::fixed_schedule::calculate_fixed_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn configurable(input_json: String) -> NapiResult<String> {
    let input = bullion_fees_core::configurable::ConfigurableInput::from_json(&input_json)
        .map_err(to_napi_error)?;
    let output = bullion_fees_core::configurable::calculate_configurable(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_fee_structures(input_json: String) -> NapiResult<String> {
    let input = bullion_fees_core::comparison::ComparisonInput::from_json(&input_json)
        .map_err(to_napi_error)?;
    let output =
        bullion_fees_core::comparison::calculate_comparison(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Display and export
// ---------------------------------------------------------------------------

#[napi]
pub fn fixed_schedule_rates() -> NapiResult<String> {
    let rates = bullion_fees_core::fixed_schedule::fixed_schedule_rates();
    serde_json::to_string(&rates).map_err(to_napi_error)
}

/// Export rows for a `CalculationResult` previously returned by either engine.
#[napi]
pub fn ledger_rows(result_json: String) -> NapiResult<String> {
    let result: CalculationResult = serde_json::from_str(&result_json).map_err(to_napi_error)?;
    let rows = bullion_fees_core::ledger::ledger_rows(&result);
    serde_json::to_string(&rows).map_err(to_napi_error)
}
