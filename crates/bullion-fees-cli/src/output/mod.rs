pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use bullion_fees_core::ledger::{LedgerRow, YearRecord};
use serde_json::Value;

use crate::OutputFormat;

/// Column keys and headers for comparison rows, in display order.
pub const COMPARISON_COLUMNS: [(&str, &str); 8] = [
    ("label", "Comparison"),
    ("candidate_total_fees", "Candidate Fees"),
    ("benchmark_total_fees", "Benchmark Fees"),
    ("candidate_fees_pct", "Candidate %"),
    ("benchmark_fees_pct", "Benchmark %"),
    ("difference", "Difference"),
    ("difference_pct", "Difference %"),
    ("verdict", "Verdict"),
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Ledger cells in export column order, if `result` carries a ledger.
pub fn ledger_records(result: &Value) -> Option<Vec<Vec<String>>> {
    let records = result.get("yearly_records")?;
    let records: Vec<YearRecord> = serde_json::from_value(records.clone()).ok()?;
    Some(
        records
            .iter()
            .map(|r| LedgerRow::from(r).to_record())
            .collect(),
    )
}

/// Comparison rows as cells in `COMPARISON_COLUMNS` order.
pub fn comparison_records(rows: &[Value]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            COMPARISON_COLUMNS
                .iter()
                .map(|(key, _)| row.get(*key).map(format_cell).unwrap_or_default())
                .collect()
        })
        .collect()
}

pub fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_cell).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
