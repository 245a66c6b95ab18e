use bullion_fees_core::ledger::LEDGER_COLUMNS;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{comparison_records, format_cell, ledger_records, COMPARISON_COLUMNS};

/// Fields too large for the summary table; shown separately or not at all.
const SUMMARY_SKIP: [&str; 2] = ["yearly_records", "rates"];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_notes(map);
            } else {
                print_summary(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    let Value::Object(res_map) = result else {
        println!("{}", format_cell(result));
        return;
    };

    if let Some(Value::Array(rows)) = res_map.get("rows") {
        print_comparison(rows);
        if let Some(candidate) = res_map.get("candidate") {
            println!("\nCandidate ledger:");
            print_ledger(candidate);
        }
        if let Some(benchmark) = res_map.get("benchmark") {
            println!("\nBenchmark ledger:");
            print_ledger(benchmark);
        }
        return;
    }

    print_summary(res_map);
    if res_map.contains_key("yearly_records") {
        println!();
        print_ledger(result);
    }
}

fn print_summary(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if SUMMARY_SKIP.contains(&key.as_str()) {
            continue;
        }
        builder.push_record([key.as_str(), &format_cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_ledger(result: &Value) {
    let Some(records) = ledger_records(result) else {
        return;
    };
    let mut builder = Builder::default();
    builder.push_record(LEDGER_COLUMNS);
    for record in records {
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_comparison(rows: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(COMPARISON_COLUMNS.iter().map(|(_, header)| *header));
    for record in comparison_records(rows) {
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_cell(item));
        }
    }
}
