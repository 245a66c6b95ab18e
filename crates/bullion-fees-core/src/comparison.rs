use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::fixed_schedule::{compute_fixed_schedule, FixedHorizon, CUSTODY_TIER_THRESHOLD_YEARS};
use crate::ledger::CalculationResult;
use crate::rates::FeeRateSet;
use crate::types::*;
use crate::FeeResult;

/// Differences within this band are reporting noise, not a price advantage.
pub const COMPARISON_EPSILON: Money = dec!(0.001);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    MoreCompetitive,
    LessCompetitive,
    Equivalent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub candidate_horizon_years: u32,
    pub benchmark_horizon_years: u32,
    pub candidate_total_fees: Money,
    pub benchmark_total_fees: Money,
    pub candidate_fees_pct: Rate,
    pub benchmark_fees_pct: Rate,
    /// Candidate minus benchmark
    pub difference: Money,
    /// Difference as a fraction of the benchmark total
    pub difference_pct: Rate,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub unit_price: Money,
    pub units: Units,
    pub horizon_years: u32,
    #[serde(default)]
    pub rates: FeeRateSet,
}

/// Candidate ledger, the benchmark it is judged against, and every
/// benchmark delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub candidate: CalculationResult,
    pub benchmark: CalculationResult,
    pub primary: ComparisonRow,
    pub rows: Vec<ComparisonRow>,
}

#[cfg(feature = "configurable")]
impl From<crate::configurable::ConfigurableInput> for ComparisonInput {
    fn from(input: crate::configurable::ConfigurableInput) -> Self {
        ComparisonInput {
            unit_price: input.unit_price,
            units: input.units,
            horizon_years: input.horizon_years,
            rates: input.rates,
        }
    }
}

#[cfg(feature = "configurable")]
impl ComparisonInput {
    /// Same rules as [`crate::configurable::ConfigurableInput::from_value`].
    pub fn from_value(value: serde_json::Value) -> FeeResult<Self> {
        crate::configurable::ConfigurableInput::from_value(value).map(Self::from)
    }

    pub fn from_json(json: &str) -> FeeResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::MoreCompetitive => "more competitive",
            Verdict::LessCompetitive => "less competitive",
            Verdict::Equivalent => "equivalent",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Comparator
// ---------------------------------------------------------------------------

/// Delta of `candidate` against `benchmark`. Agnostic to which engine
/// produced either side.
pub fn compare(
    candidate: &CalculationResult,
    benchmark: &CalculationResult,
    label: &str,
) -> ComparisonRow {
    let difference = candidate.total_fees - benchmark.total_fees;
    // Saturates when a near-zero benchmark total pushes the ratio out of range
    let difference_pct = if benchmark.total_fees.is_zero() {
        Decimal::ZERO
    } else {
        match difference.checked_div(benchmark.total_fees) {
            Some(pct) => pct,
            None if difference.is_sign_negative() => Decimal::MIN,
            None => Decimal::MAX,
        }
    };

    ComparisonRow {
        label: label.to_string(),
        candidate_horizon_years: candidate.horizon_years,
        benchmark_horizon_years: benchmark.horizon_years,
        candidate_total_fees: candidate.total_fees,
        benchmark_total_fees: benchmark.total_fees,
        candidate_fees_pct: candidate.total_fees_pct,
        benchmark_fees_pct: benchmark.total_fees_pct,
        difference,
        difference_pct,
        verdict: classify_difference(difference),
    }
}

pub fn classify_difference(difference: Money) -> Verdict {
    if difference < -COMPARISON_EPSILON {
        Verdict::MoreCompetitive
    } else if difference > COMPARISON_EPSILON {
        Verdict::LessCompetitive
    } else {
        Verdict::Equivalent
    }
}

// ---------------------------------------------------------------------------
// Benchmark selection
// ---------------------------------------------------------------------------

/// Short schedule for horizons inside the standard custody tier, long
/// schedule otherwise.
pub fn select_benchmark_horizon(candidate_horizon_years: u32) -> FixedHorizon {
    if candidate_horizon_years <= CUSTODY_TIER_THRESHOLD_YEARS {
        FixedHorizon::Short
    } else {
        FixedHorizon::Long
    }
}

/// The fixed schedule a candidate should be judged against, priced on the
/// candidate's own holding.
pub fn benchmark_for(candidate: &CalculationResult) -> FeeResult<CalculationResult> {
    compute_fixed_schedule(
        candidate.unit_price,
        candidate.units,
        select_benchmark_horizon(candidate.horizon_years),
    )
}

/// Compare against the short schedule, and also the long schedule once the
/// candidate holds past the custody tier threshold.
pub fn compare_against_benchmarks(
    candidate: &CalculationResult,
) -> FeeResult<Vec<ComparisonRow>> {
    let mut horizons = vec![FixedHorizon::Short];
    if candidate.horizon_years > CUSTODY_TIER_THRESHOLD_YEARS {
        horizons.push(FixedHorizon::Long);
    }

    horizons
        .into_iter()
        .map(|horizon| -> FeeResult<ComparisonRow> {
            let benchmark =
                compute_fixed_schedule(candidate.unit_price, candidate.units, horizon)?;
            let label = format!(
                "Candidate ({}yr) vs Benchmark ({}yr)",
                candidate.horizon_years,
                horizon.years()
            );
            Ok(compare(candidate, &benchmark, &label))
        })
        .collect()
}

/// Run the configurable engine and judge it against the benchmark schedule.
#[cfg(feature = "configurable")]
pub fn calculate_comparison(
    input: &ComparisonInput,
) -> FeeResult<ComputationOutput<ComparisonReport>> {
    let start = Instant::now();
    let candidate = crate::configurable::compute_configurable(
        input.unit_price,
        input.units,
        input.horizon_years,
        &input.rates,
    )?;
    let benchmark = benchmark_for(&candidate)?;
    let label = format!(
        "Candidate ({}yr) vs Benchmark ({}yr)",
        candidate.horizon_years, benchmark.horizon_years
    );
    let primary = compare(&candidate, &benchmark, &label);
    let rows = compare_against_benchmarks(&candidate)?;

    let mut warnings: Vec<String> = Vec::new();
    if candidate.horizon_years != benchmark.horizon_years {
        warnings.push(format!(
            "Candidate horizon ({} years) differs from benchmark horizon ({} years)",
            candidate.horizon_years, benchmark.horizon_years
        ));
    }

    let report = ComparisonReport {
        candidate,
        benchmark,
        primary,
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fee comparison: configurable model vs fixed benchmark schedule",
        &serde_json::json!({
            "unit_price": input.unit_price.to_string(),
            "units": input.units.to_string(),
            "horizon_years": input.horizon_years,
            "epsilon": COMPARISON_EPSILON.to_string(),
        }),
        warnings,
        elapsed,
        report,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
