use bullion_fees_core::ledger::LEDGER_COLUMNS;
use serde_json::Value;
use std::io;

use super::{comparison_records, format_cell, ledger_records, COMPARISON_COLUMNS};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Ledgers use the fixed export columns so files from either engine line up;
/// comparisons emit one line per benchmark row.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let result = map.get("result").unwrap_or(value);
            if let Some(Value::Array(rows)) = result.get("rows") {
                write_comparison_csv(&mut wtr, rows);
            } else if let Some(records) = ledger_records(result) {
                write_ledger_csv(&mut wtr, records);
            } else if let Value::Object(fields) = result {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in fields {
                    let _ = wtr.write_record([key.as_str(), &format_cell(val)]);
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_cell(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_ledger_csv(wtr: &mut StdoutWriter<'_>, records: Vec<Vec<String>>) {
    let _ = wtr.write_record(LEDGER_COLUMNS);
    for record in records {
        let _ = wtr.write_record(&record);
    }
}

fn write_comparison_csv(wtr: &mut StdoutWriter<'_>, rows: &[Value]) {
    let _ = wtr.write_record(COMPARISON_COLUMNS.iter().map(|(_, header)| *header));
    for record in comparison_records(rows) {
        let _ = wtr.write_record(&record);
    }
}

fn write_array_csv(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_cell).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_cell(item)]);
        }
    }
}
