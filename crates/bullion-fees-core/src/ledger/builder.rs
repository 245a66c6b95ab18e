use rust_decimal::Decimal;

use crate::error::FeeError;
use crate::rates::{format_pct, FeeRateSet, PaymentTiming, RecurringFee};
use crate::types::*;
use crate::FeeResult;

use super::records::{CalculationResult, EngineKind, LedgerEvent, YearRecord};

/// Upper bound on the holding horizon accepted by either engine.
pub const MAX_HORIZON_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Checked arithmetic
// ---------------------------------------------------------------------------

fn out_of_range(field: &str) -> FeeError {
    FeeError::InvalidInput {
        field: field.into(),
        reason: "Amount exceeds the supported decimal range".into(),
    }
}

fn checked_product(a: Money, b: Decimal, field: &str) -> FeeResult<Money> {
    a.checked_mul(b).ok_or_else(|| out_of_range(field))
}

fn checked_sum(a: Money, b: Money, field: &str) -> FeeResult<Money> {
    a.checked_add(b).ok_or_else(|| out_of_range(field))
}

fn checked_total(amounts: &[Money], field: &str) -> FeeResult<Money> {
    amounts
        .iter()
        .try_fold(Decimal::ZERO, |acc, amount| checked_sum(acc, *amount, field))
}

// ---------------------------------------------------------------------------
// Fee accounts
// ---------------------------------------------------------------------------

/// Running state of one recurring fee within a single ledger build.
///
/// The accrue-and-settle variant carries no paid balance until it settles,
/// so the lump sum paid at redemption is the whole of what was ever paid
/// for that fee.
#[derive(Debug)]
enum FeeAccount {
    PayEachPeriod { paid_to_date: Money },
    AccrueAndSettle {
        pending: Vec<Money>,
        settled: Option<Money>,
    },
}

impl FeeAccount {
    fn open(timing: PaymentTiming, horizon_years: u32) -> Self {
        match timing {
            PaymentTiming::PayEachPeriod => FeeAccount::PayEachPeriod {
                paid_to_date: Decimal::ZERO,
            },
            PaymentTiming::AccrueAndSettle => FeeAccount::AccrueAndSettle {
                pending: Vec::with_capacity(horizon_years as usize),
                settled: None,
            },
        }
    }

    /// Record a holding-year accrual. Returns the amount paid this year.
    fn accrue(&mut self, accrual: Money) -> FeeResult<Money> {
        match self {
            FeeAccount::PayEachPeriod { paid_to_date } => {
                *paid_to_date = checked_sum(*paid_to_date, accrual, "recurring_fees_paid")?;
                Ok(accrual)
            }
            FeeAccount::AccrueAndSettle { pending, .. } => {
                pending.push(accrual);
                Ok(Decimal::ZERO)
            }
        }
    }

    /// Record the redemption-year accrual and pay whatever is due.
    fn settle(&mut self, accrual: Money) -> FeeResult<Money> {
        match self {
            FeeAccount::PayEachPeriod { paid_to_date } => {
                *paid_to_date = checked_sum(*paid_to_date, accrual, "recurring_fees_paid")?;
                Ok(accrual)
            }
            FeeAccount::AccrueAndSettle { pending, settled } => {
                pending.push(accrual);
                let lump = checked_total(pending, "accrued_fees")?;
                *settled = Some(lump);
                Ok(lump)
            }
        }
    }

    fn outstanding(&self) -> FeeResult<Money> {
        match self {
            FeeAccount::PayEachPeriod { .. } => Ok(Decimal::ZERO),
            FeeAccount::AccrueAndSettle {
                settled: Some(_), ..
            } => Ok(Decimal::ZERO),
            FeeAccount::AccrueAndSettle {
                pending,
                settled: None,
            } => checked_total(pending, "accrued_fees"),
        }
    }

    fn total_paid(&self) -> Money {
        match self {
            FeeAccount::PayEachPeriod { paid_to_date } => *paid_to_date,
            FeeAccount::AccrueAndSettle { settled, .. } => settled.unwrap_or(Decimal::ZERO),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject positions that would produce a zero, negative, or unbounded ledger.
pub fn validate_position(unit_price: Money, units: Units, horizon_years: u32) -> FeeResult<()> {
    if unit_price <= Decimal::ZERO {
        return Err(FeeError::InvalidInput {
            field: "unit_price".into(),
            reason: "Unit price must be greater than zero".into(),
        });
    }
    if units <= Decimal::ZERO {
        return Err(FeeError::InvalidInput {
            field: "units".into(),
            reason: "Unit count must be greater than zero".into(),
        });
    }
    if unit_price.checked_mul(units).is_none() {
        return Err(FeeError::InvalidInput {
            field: "units".into(),
            reason: "Notional (unit price x units) exceeds the supported decimal range".into(),
        });
    }
    if horizon_years == 0 {
        return Err(FeeError::InvalidInput {
            field: "horizon_years".into(),
            reason: "Holding horizon must be at least 1 year".into(),
        });
    }
    if horizon_years > MAX_HORIZON_YEARS {
        return Err(FeeError::InvalidInput {
            field: "horizon_years".into(),
            reason: format!("Holding horizon must not exceed {MAX_HORIZON_YEARS} years"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Ledger build
// ---------------------------------------------------------------------------

/// Walk years 0..=horizon applying `rates`. Callers validate the position
/// and rate set first; amounts too large for a `Decimal` still fail with
/// `InvalidInput` rather than overflowing.
pub(crate) fn build_ledger(
    engine: EngineKind,
    scenario: String,
    unit_price: Money,
    units: Units,
    horizon_years: u32,
    rates: &FeeRateSet,
) -> FeeResult<CalculationResult> {
    let notional = checked_product(unit_price, units, "units")?;

    // One-time charges
    let purchase_fee_per_unit =
        checked_product(rates.purchase_fee_per_unit, units, "purchase_fee_per_unit")?;
    let purchase_fee_pct = checked_product(notional, rates.purchase_fee_pct, "purchase_fee_pct")?;
    let total_purchase_fees =
        checked_sum(purchase_fee_per_unit, purchase_fee_pct, "total_purchase_fees")?;
    let redemption_fee = checked_product(notional, rates.redemption_fee_pct, "redemption_fee")?;

    let mut custody = FeeAccount::open(rates.custody.timing, horizon_years);
    let mut management = FeeAccount::open(rates.management.timing, horizon_years);

    let mut records: Vec<YearRecord> = Vec::with_capacity(horizon_years as usize + 1);
    let mut cumulative = total_purchase_fees;

    records.push(YearRecord {
        year: 0,
        event: LedgerEvent::Purchase,
        notional,
        purchase_fee_per_unit,
        purchase_fee_pct,
        custody_accrual: Decimal::ZERO,
        custody_paid: Decimal::ZERO,
        management_accrual: Decimal::ZERO,
        management_paid: Decimal::ZERO,
        redemption_fee: Decimal::ZERO,
        fees_paid: total_purchase_fees,
        cumulative_fees_paid: cumulative,
        outstanding_accruals: Decimal::ZERO,
        notes: "One-time purchase fees paid".into(),
    });

    for year in 1..=horizon_years {
        let event = LedgerEvent::for_year(year, horizon_years);
        let custody_rate = rates.custody.rate_for_year(year);
        let management_rate = rates.management.rate_for_year(year);
        let custody_accrual = checked_product(notional, custody_rate, "custody_accrual")?;
        let management_accrual =
            checked_product(notional, management_rate, "management_accrual")?;

        let (custody_paid, management_paid, redemption, notes) = match event {
            LedgerEvent::Redeem => (
                custody.settle(custody_accrual)?,
                management.settle(management_accrual)?,
                redemption_fee,
                "Redemption: all due fees paid".to_string(),
            ),
            _ => {
                let mut parts: Vec<String> = Vec::new();
                if custody_accrual > Decimal::ZERO {
                    parts.push(accrual_note("Custody", &rates.custody, custody_rate));
                }
                if management_accrual > Decimal::ZERO {
                    parts.push(accrual_note("Mgmt", &rates.management, management_rate));
                }
                let notes = if parts.is_empty() {
                    "No fees this year".to_string()
                } else {
                    parts.join("; ")
                };
                (
                    custody.accrue(custody_accrual)?,
                    management.accrue(management_accrual)?,
                    Decimal::ZERO,
                    notes,
                )
            }
        };

        let fees_paid = checked_total(&[custody_paid, management_paid, redemption], "fees_paid")?;
        cumulative = checked_sum(cumulative, fees_paid, "cumulative_fees_paid")?;
        let outstanding_accruals = checked_sum(
            custody.outstanding()?,
            management.outstanding()?,
            "outstanding_accruals",
        )?;

        records.push(YearRecord {
            year,
            event,
            notional,
            purchase_fee_per_unit: Decimal::ZERO,
            purchase_fee_pct: Decimal::ZERO,
            custody_accrual,
            custody_paid,
            management_accrual,
            management_paid,
            redemption_fee: redemption,
            fees_paid,
            cumulative_fees_paid: cumulative,
            outstanding_accruals,
            notes,
        });
    }

    let total_custody_paid = custody.total_paid();
    let total_management_paid = management.total_paid();
    let total_recurring_paid =
        checked_sum(total_custody_paid, total_management_paid, "total_recurring_paid")?;
    let total_fees = checked_total(
        &[total_purchase_fees, total_recurring_paid, redemption_fee],
        "total_fees",
    )?;
    let total_fees_pct = if notional > Decimal::ZERO {
        total_fees
            .checked_div(notional)
            .ok_or_else(|| out_of_range("total_fees_pct"))?
    } else {
        Decimal::ZERO
    };

    Ok(CalculationResult {
        engine,
        scenario,
        horizon_years,
        unit_price,
        units,
        notional,
        rates: rates.clone(),
        yearly_records: records,
        total_purchase_fees,
        total_custody_paid,
        total_management_paid,
        total_recurring_paid,
        redemption_fee,
        total_fees,
        total_fees_pct,
    })
}

fn accrual_note(label: &str, fee: &RecurringFee, rate: Rate) -> String {
    match fee.timing {
        PaymentTiming::PayEachPeriod => format!("{label} paid at {}%", format_pct(rate)),
        PaymentTiming::AccrueAndSettle => {
            format!("{label} accrues at {}%; charged upon redemption", format_pct(rate))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
