//! Benchmark fee schedule with fixed, published rates.
//!
//! - Acquisition fee: 0.1575 per unit, one-time at purchase
//! - Arrangement fee: 2.10% of notional, one-time at purchase
//! - Custody & insurance: 0.315% p.a. for years 1-5, 1.05% p.a. from year 6;
//!   accrues yearly and is charged at redemption
//! - Redemption charge: 0.525% of notional, paid at redemption

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FeeError;
use crate::ledger::builder::build_ledger;
use crate::ledger::{validate_position, CalculationResult, EngineKind};
use crate::rates::{format_pct, FeeRateSet, FeeScheduleEntry, PaymentTiming, RecurringFee};
use crate::types::*;
use crate::FeeResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ACQUISITION_FEE_PER_UNIT: Money = dec!(0.1575);
pub const ARRANGEMENT_FEE_PCT: Rate = dec!(0.021);
pub const CUSTODY_FEE_PCT_STANDARD: Rate = dec!(0.00315);
pub const CUSTODY_FEE_PCT_EXTENDED: Rate = dec!(0.0105);
/// Last holding year charged at the standard custody rate
pub const CUSTODY_TIER_THRESHOLD_YEARS: u32 = 5;
pub const REDEMPTION_FEE_PCT: Rate = dec!(0.00525);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The two holding periods the benchmark schedule is quoted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedHorizon {
    /// Redeem at the end of year 5
    Short,
    /// Redeem at the end of year 10
    Long,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedScheduleInput {
    pub unit_price: Money,
    pub units: Units,
    pub horizon: FixedHorizon,
}

impl FixedScheduleInput {
    /// Parse a benchmark request; an unknown horizon is an input error.
    pub fn from_value(value: serde_json::Value) -> FeeResult<Self> {
        serde_json::from_value(value).map_err(|e| FeeError::InvalidInput {
            field: "input".into(),
            reason: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> FeeResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }
}

impl FixedHorizon {
    pub fn years(self) -> u32 {
        match self {
            FixedHorizon::Short => 5,
            FixedHorizon::Long => 10,
        }
    }

    pub fn scenario_name(self) -> &'static str {
        match self {
            FixedHorizon::Short => "Scenario 1: 5-Year Hold",
            FixedHorizon::Long => "Scenario 2: 10-Year Hold",
        }
    }
}

// ---------------------------------------------------------------------------
// Rate sets
// ---------------------------------------------------------------------------

/// The benchmark schedule expressed as a rate set, custody tiered.
pub fn schedule_rates() -> FeeRateSet {
    FeeRateSet {
        purchase_fee_per_unit: ACQUISITION_FEE_PER_UNIT,
        purchase_fee_pct: ARRANGEMENT_FEE_PCT,
        custody: RecurringFee::tiered(
            CUSTODY_TIER_THRESHOLD_YEARS,
            CUSTODY_FEE_PCT_STANDARD,
            CUSTODY_FEE_PCT_EXTENDED,
            PaymentTiming::AccrueAndSettle,
        ),
        management: RecurringFee::none(),
        redemption_fee_pct: REDEMPTION_FEE_PCT,
    }
}

impl FeeRateSet {
    /// Benchmark rates with custody flattened to the standard (years 1-5)
    /// rate. Reproduces the short-horizon schedule exactly.
    pub fn matching_benchmark() -> Self {
        FeeRateSet {
            custody: RecurringFee::flat(CUSTODY_FEE_PCT_STANDARD, PaymentTiming::AccrueAndSettle),
            ..schedule_rates()
        }
    }

    /// Benchmark rates including the year-6 custody step-up.
    pub fn matching_benchmark_tiered() -> Self {
        schedule_rates()
    }
}

/// Read-only fee table for display.
pub fn fixed_schedule_rates() -> Vec<FeeScheduleEntry> {
    let settle = "Accrues yearly, paid at redemption";
    let extended_from = CUSTODY_TIER_THRESHOLD_YEARS + 1;
    vec![
        FeeScheduleEntry {
            fee: "Acquisition Fee".into(),
            rate: format!("{} per unit", ACQUISITION_FEE_PER_UNIT),
            timing: "One-time at purchase".into(),
        },
        FeeScheduleEntry {
            fee: "Arrangement Fee".into(),
            rate: format!("{}% of notional", format_pct(ARRANGEMENT_FEE_PCT)),
            timing: "One-time at purchase".into(),
        },
        FeeScheduleEntry {
            fee: format!("Custody (Years 1-{CUSTODY_TIER_THRESHOLD_YEARS})"),
            rate: format!("{}% p.a.", format_pct(CUSTODY_FEE_PCT_STANDARD)),
            timing: settle.into(),
        },
        FeeScheduleEntry {
            fee: format!("Custody (Years {extended_from}+)"),
            rate: format!("{}% p.a.", format_pct(CUSTODY_FEE_PCT_EXTENDED)),
            timing: settle.into(),
        },
        FeeScheduleEntry {
            fee: "Redemption Fee".into(),
            rate: format!("{}% of notional", format_pct(REDEMPTION_FEE_PCT)),
            timing: "Paid at redemption".into(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Apply the benchmark schedule to a holding of `units` at `unit_price`.
pub fn compute_fixed_schedule(
    unit_price: Money,
    units: Units,
    horizon: FixedHorizon,
) -> FeeResult<CalculationResult> {
    validate_position(unit_price, units, horizon.years())?;
    build_ledger(
        EngineKind::FixedSchedule,
        horizon.scenario_name().to_string(),
        unit_price,
        units,
        horizon.years(),
        &schedule_rates(),
    )
}

/// Envelope wrapper around [`compute_fixed_schedule`].
pub fn calculate_fixed_schedule(
    input: &FixedScheduleInput,
) -> FeeResult<ComputationOutput<CalculationResult>> {
    let start = Instant::now();
    let result = compute_fixed_schedule(input.unit_price, input.units, input.horizon)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed benchmark schedule: one-time purchase fees, tiered custody accrued to redemption",
        &serde_json::json!({
            "unit_price": input.unit_price.to_string(),
            "units": input.units.to_string(),
            "horizon_years": input.horizon.years(),
            "custody_tier_threshold_years": CUSTODY_TIER_THRESHOLD_YEARS,
        }),
        Vec::new(),
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
