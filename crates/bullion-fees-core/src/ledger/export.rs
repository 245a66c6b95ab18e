use serde::{Deserialize, Serialize};

use crate::types::*;

use super::records::{CalculationResult, LedgerEvent, YearRecord};

/// Column order for tabular ledger output. Identical for both engines; fee
/// columns an engine never charges are present and zero.
pub const LEDGER_COLUMNS: [&str; 12] = [
    "Year",
    "Event",
    "Notional",
    "Purchase Fee - Per Unit",
    "Purchase Fee - %",
    "Custody Accrual",
    "Custody Paid",
    "Management Accrual",
    "Management Paid",
    "Redemption Fee",
    "Fees Paid",
    "Notes",
];

/// One exported ledger line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    #[serde(rename = "Year")]
    pub year: u32,
    #[serde(rename = "Event")]
    pub event: LedgerEvent,
    #[serde(rename = "Notional")]
    pub notional: Money,
    #[serde(rename = "Purchase Fee - Per Unit")]
    pub purchase_fee_per_unit: Money,
    #[serde(rename = "Purchase Fee - %")]
    pub purchase_fee_pct: Money,
    #[serde(rename = "Custody Accrual")]
    pub custody_accrual: Money,
    #[serde(rename = "Custody Paid")]
    pub custody_paid: Money,
    #[serde(rename = "Management Accrual")]
    pub management_accrual: Money,
    #[serde(rename = "Management Paid")]
    pub management_paid: Money,
    #[serde(rename = "Redemption Fee")]
    pub redemption_fee: Money,
    #[serde(rename = "Fees Paid")]
    pub fees_paid: Money,
    #[serde(rename = "Notes")]
    pub notes: String,
}

impl LedgerRow {
    /// Cell values in `LEDGER_COLUMNS` order, amounts without trailing zeros.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            self.event.to_string(),
            cell(self.notional),
            cell(self.purchase_fee_per_unit),
            cell(self.purchase_fee_pct),
            cell(self.custody_accrual),
            cell(self.custody_paid),
            cell(self.management_accrual),
            cell(self.management_paid),
            cell(self.redemption_fee),
            cell(self.fees_paid),
            self.notes.clone(),
        ]
    }
}

impl From<&YearRecord> for LedgerRow {
    fn from(r: &YearRecord) -> Self {
        LedgerRow {
            year: r.year,
            event: r.event,
            notional: r.notional,
            purchase_fee_per_unit: r.purchase_fee_per_unit,
            purchase_fee_pct: r.purchase_fee_pct,
            custody_accrual: r.custody_accrual,
            custody_paid: r.custody_paid,
            management_accrual: r.management_accrual,
            management_paid: r.management_paid,
            redemption_fee: r.redemption_fee,
            fees_paid: r.fees_paid,
            notes: r.notes.clone(),
        }
    }
}

/// Amounts carry the scale of their inputs; strip trailing zeros for export.
fn cell(amount: Money) -> String {
    amount.normalize().to_string()
}

pub fn ledger_rows(result: &CalculationResult) -> Vec<LedgerRow> {
    result.yearly_records.iter().map(LedgerRow::from).collect()
}
