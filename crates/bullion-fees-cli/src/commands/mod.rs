pub mod benchmark;
pub mod compare;
pub mod model;
pub mod rates;

use rust_decimal::Decimal;

/// Bullion is traded in whole units unless the caller opts out.
pub fn check_whole_units(
    units: Decimal,
    fractional_units: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !fractional_units && !units.fract().is_zero() {
        return Err(format!(
            "units must be a whole number, got {units} (pass --fractional-units to allow fractions)"
        )
        .into());
    }
    Ok(())
}

pub fn log_warnings(warnings: &[String]) {
    for w in warnings {
        log::warn!("{}", w);
    }
}
