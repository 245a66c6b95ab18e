use serde_json::Value;

use super::format_cell;

/// Print just the headline figure.
///
/// Comparisons print the primary difference and verdict; ledgers print the
/// total fees; anything else falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(primary) = result_obj.get("primary") {
        let difference = primary.get("difference").map(format_cell).unwrap_or_default();
        let verdict = primary.get("verdict").map(format_cell).unwrap_or_default();
        println!("{} {}", difference, verdict);
        return;
    }

    let priority_keys = ["total_fees", "difference", "verdict"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_cell(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_cell(val));
            return;
        }
    }

    println!("{}", format_cell(result_obj));
}
