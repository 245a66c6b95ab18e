use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FeeError;
use crate::types::*;
use crate::FeeResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// When a recurring fee is actually charged to the holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTiming {
    /// Each year's accrual is paid in the year it accrues
    #[serde(alias = "annual")]
    PayEachPeriod,
    /// Accruals are held back and paid as one lump sum at redemption
    #[serde(alias = "at_redemption")]
    AccrueAndSettle,
}

/// A rate bracket covering a contiguous range of holding years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    /// First holding year (1-based) the rate applies to
    pub first_year: u32,
    /// Last holding year, inclusive. `None` leaves the tier open-ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_year: Option<u32>,
    pub rate: Rate,
}

/// An annual percentage fee charged on notional during the holding period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringFee {
    pub tiers: Vec<RateTier>,
    pub timing: PaymentTiming,
}

/// Complete set of fee terms for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeRateSet {
    /// Flat currency amount charged per unit at purchase
    pub purchase_fee_per_unit: Money,
    /// One-time fee on notional at purchase
    pub purchase_fee_pct: Rate,
    pub custody: RecurringFee,
    pub management: RecurringFee,
    /// One-time fee on notional at redemption
    pub redemption_fee_pct: Rate,
}

/// Display row for a fee table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeScheduleEntry {
    pub fee: String,
    pub rate: String,
    pub timing: String,
}

// ---------------------------------------------------------------------------
// PaymentTiming
// ---------------------------------------------------------------------------

impl PaymentTiming {
    pub fn description(self) -> &'static str {
        match self {
            PaymentTiming::PayEachPeriod => "Pay annually",
            PaymentTiming::AccrueAndSettle => "Accrue and pay at redemption",
        }
    }
}

impl fmt::Display for PaymentTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for PaymentTiming {
    type Err = FeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pay_each_period" | "annual" | "annually" => Ok(PaymentTiming::PayEachPeriod),
            "accrue_and_settle" | "at_redemption" => Ok(PaymentTiming::AccrueAndSettle),
            _ => Err(FeeError::InvalidConfiguration {
                field: "timing".into(),
                reason: format!(
                    "Unrecognised payment timing '{s}' (expected 'annual' or 'at_redemption')"
                ),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tiers and recurring fees
// ---------------------------------------------------------------------------

impl RateTier {
    pub fn contains(&self, year: u32) -> bool {
        year >= self.first_year && self.last_year.map_or(true, |last| year <= last)
    }

    /// Human label such as "Years 1-5" or "Years 6+".
    pub fn label(&self) -> String {
        match self.last_year {
            Some(last) if last == self.first_year => format!("Year {last}"),
            Some(last) => format!("Years {}-{}", self.first_year, last),
            None => format!("Years {}+", self.first_year),
        }
    }
}

impl RecurringFee {
    /// One rate for every holding year.
    pub fn flat(rate: Rate, timing: PaymentTiming) -> Self {
        RecurringFee {
            tiers: vec![RateTier {
                first_year: 1,
                last_year: None,
                rate,
            }],
            timing,
        }
    }

    /// No recurring charge.
    pub fn none() -> Self {
        Self::flat(Decimal::ZERO, PaymentTiming::AccrueAndSettle)
    }

    /// Two brackets: `early_rate` for years 1..=threshold_year, `late_rate`
    /// afterwards.
    pub fn tiered(
        threshold_year: u32,
        early_rate: Rate,
        late_rate: Rate,
        timing: PaymentTiming,
    ) -> Self {
        RecurringFee {
            tiers: vec![
                RateTier {
                    first_year: 1,
                    last_year: Some(threshold_year),
                    rate: early_rate,
                },
                RateTier {
                    first_year: threshold_year.saturating_add(1),
                    last_year: None,
                    rate: late_rate,
                },
            ],
            timing,
        }
    }

    pub fn rate_for_year(&self, year: u32) -> Rate {
        self.tiers
            .iter()
            .find(|t| t.contains(year))
            .map(|t| t.rate)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.tiers.iter().all(|t| t.rate.is_zero())
    }

    /// Tiers must start at year 1, be contiguous, and end open-ended so that
    /// every holding year has exactly one rate.
    fn validate(&self, field: &str) -> FeeResult<()> {
        if self.tiers.is_empty() {
            return Err(FeeError::InvalidConfiguration {
                field: format!("{field}.tiers"),
                reason: "At least one rate tier is required".into(),
            });
        }

        let mut expected_first = 1u32;
        for (i, tier) in self.tiers.iter().enumerate() {
            let tier_field = format!("{field}.tiers[{i}]");
            ensure_non_negative(&format!("{tier_field}.rate"), tier.rate)?;

            if tier.first_year != expected_first {
                return Err(FeeError::InvalidConfiguration {
                    field: format!("{tier_field}.first_year"),
                    reason: format!("Tier must start in year {expected_first}"),
                });
            }

            match tier.last_year {
                Some(last) if last < tier.first_year => {
                    return Err(FeeError::InvalidConfiguration {
                        field: format!("{tier_field}.last_year"),
                        reason: "Tier ends before it starts".into(),
                    });
                }
                Some(last) => expected_first = last.saturating_add(1),
                None if i + 1 != self.tiers.len() => {
                    return Err(FeeError::InvalidConfiguration {
                        field: format!("{tier_field}.last_year"),
                        reason: "Only the final tier may be open-ended".into(),
                    });
                }
                None => {}
            }
        }

        if self.tiers.last().and_then(|t| t.last_year).is_some() {
            return Err(FeeError::InvalidConfiguration {
                field: format!("{field}.tiers"),
                reason: "Final tier must be open-ended".into(),
            });
        }
        Ok(())
    }
}

impl Default for RecurringFee {
    fn default() -> Self {
        Self::none()
    }
}

// ---------------------------------------------------------------------------
// FeeRateSet
// ---------------------------------------------------------------------------

impl FeeRateSet {
    /// Every rate zero.
    pub fn zero() -> Self {
        FeeRateSet {
            purchase_fee_per_unit: Decimal::ZERO,
            purchase_fee_pct: Decimal::ZERO,
            custody: RecurringFee::none(),
            management: RecurringFee::none(),
            redemption_fee_pct: Decimal::ZERO,
        }
    }

    /// Parse a JSON rate set. Any parse failure, including an unknown timing
    /// mode, is reported as a configuration error.
    pub fn from_json(json: &str) -> FeeResult<Self> {
        serde_json::from_str(json).map_err(|e| FeeError::InvalidConfiguration {
            field: "rates".into(),
            reason: e.to_string(),
        })
    }

    /// As [`FeeRateSet::from_json`], for a document already parsed from JSON
    /// or YAML.
    pub fn from_value(value: serde_json::Value) -> FeeResult<Self> {
        serde_json::from_value(value).map_err(|e| FeeError::InvalidConfiguration {
            field: "rates".into(),
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> FeeResult<()> {
        ensure_non_negative("purchase_fee_per_unit", self.purchase_fee_per_unit)?;
        ensure_non_negative("purchase_fee_pct", self.purchase_fee_pct)?;
        ensure_non_negative("redemption_fee_pct", self.redemption_fee_pct)?;
        self.custody.validate("custody")?;
        self.management.validate("management")?;
        Ok(())
    }

    pub fn is_zero(&self) -> bool {
        self.purchase_fee_per_unit.is_zero()
            && self.purchase_fee_pct.is_zero()
            && self.redemption_fee_pct.is_zero()
            && self.custody.is_zero()
            && self.management.is_zero()
    }
}

impl Default for FeeRateSet {
    fn default() -> Self {
        Self::zero()
    }
}

/// Display table for a configured rate set, one row per recurring tier.
pub fn configured_rates(rates: &FeeRateSet) -> Vec<FeeScheduleEntry> {
    let mut rows = vec![
        FeeScheduleEntry {
            fee: "Purchase Fee (per unit)".into(),
            rate: format!("{} per unit", rates.purchase_fee_per_unit.normalize()),
            timing: "One-time at purchase".into(),
        },
        FeeScheduleEntry {
            fee: "Purchase Fee (%)".into(),
            rate: format!("{}% of notional", format_pct(rates.purchase_fee_pct)),
            timing: "One-time at purchase".into(),
        },
    ];
    rows.extend(recurring_rows("Annual Custody Fee", &rates.custody));
    rows.extend(recurring_rows("Annual Management Fee", &rates.management));
    rows.push(FeeScheduleEntry {
        fee: "Redemption Fee".into(),
        rate: format!("{}% of notional", format_pct(rates.redemption_fee_pct)),
        timing: "Paid at redemption".into(),
    });
    rows
}

fn recurring_rows(name: &str, fee: &RecurringFee) -> Vec<FeeScheduleEntry> {
    let single = fee.tiers.len() == 1;
    fee.tiers
        .iter()
        .map(|tier| FeeScheduleEntry {
            fee: if single {
                name.to_string()
            } else {
                format!("{name} ({})", tier.label())
            },
            rate: format!("{}% p.a.", format_pct(tier.rate)),
            timing: fee.timing.description().to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render a decimal rate as a percentage without trailing zeros (0.00315 -> "0.315").
/// Rates too large to scale by 100 are shown as a plain multiple.
pub fn format_pct(rate: Rate) -> String {
    match rate.checked_mul(dec!(100)) {
        Some(pct) => pct.normalize().to_string(),
        None => format!("{}x100", rate.normalize()),
    }
}

fn ensure_non_negative(field: &str, value: Decimal) -> FeeResult<()> {
    if value < Decimal::ZERO {
        return Err(FeeError::InvalidConfiguration {
            field: field.into(),
            reason: "Fee rate must be non-negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
