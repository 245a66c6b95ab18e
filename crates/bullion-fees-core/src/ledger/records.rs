use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rates::FeeRateSet;
use crate::types::*;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerEvent {
    Purchase,
    Hold,
    Redeem,
}

/// Which engine produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    FixedSchedule,
    Configurable,
}

/// Fee activity for a single year of the holding period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// 0 = purchase, horizon = redemption
    pub year: u32,
    pub event: LedgerEvent,
    /// Unit price x units; never revalued
    pub notional: Money,
    pub purchase_fee_per_unit: Money,
    pub purchase_fee_pct: Money,
    pub custody_accrual: Money,
    pub custody_paid: Money,
    pub management_accrual: Money,
    pub management_paid: Money,
    pub redemption_fee: Money,
    /// Everything charged to the holder this year
    pub fees_paid: Money,
    pub cumulative_fees_paid: Money,
    /// Accrued but not yet paid, after this year's payments
    pub outstanding_accruals: Money,
    pub notes: String,
}

/// Full ledger and summary for one holding scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub engine: EngineKind,
    pub scenario: String,
    pub horizon_years: u32,
    pub unit_price: Money,
    pub units: Units,
    pub notional: Money,
    pub rates: FeeRateSet,
    pub yearly_records: Vec<YearRecord>,
    /// Per-unit plus percentage purchase fees
    pub total_purchase_fees: Money,
    pub total_custody_paid: Money,
    pub total_management_paid: Money,
    pub total_recurring_paid: Money,
    pub redemption_fee: Money,
    pub total_fees: Money,
    /// Total fees as a fraction of notional
    pub total_fees_pct: Rate,
}

// ---------------------------------------------------------------------------
// Impls
// ---------------------------------------------------------------------------

impl LedgerEvent {
    pub fn for_year(year: u32, horizon_years: u32) -> Self {
        if year == 0 {
            LedgerEvent::Purchase
        } else if year < horizon_years {
            LedgerEvent::Hold
        } else {
            LedgerEvent::Redeem
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LedgerEvent::Purchase => "Purchase",
            LedgerEvent::Hold => "Hold",
            LedgerEvent::Redeem => "Redeem",
        }
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CalculationResult {
    /// Sum of `fees_paid` across the ledger. Always equals `total_fees`.
    pub fn ledger_total_paid(&self) -> Money {
        self.yearly_records.iter().map(|r| r.fees_paid).sum()
    }

    pub fn record(&self, year: u32) -> Option<&YearRecord> {
        self.yearly_records.get(year as usize)
    }

    /// Sum of every year's custody and management accrual.
    pub fn total_accrued(&self) -> Money {
        self.yearly_records
            .iter()
            .map(|r| r.custody_accrual + r.management_accrual)
            .fold(Decimal::ZERO, |acc, x| acc + x)
    }
}
