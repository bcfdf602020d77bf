use serde_json::{Map, Value};

/// Key answer fields, in order of priority.
const PRIORITY_KEYS: [&str; 6] = [
    "monthly_emi",
    "eligible_loan_amount",
    "in_hand_monthly",
    "is_eligible",
    "valid",
    "reason",
];

/// Print just the key answer value from the output.
///
/// Looks for a priority field in the result object, then one level down
/// (reports nest the EMI under `emi`, the breakup under `breakup`), then
/// falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            if let Some(val) = find_priority(map) {
                println!("{}", format_minimal(val));
            } else if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_minimal(val));
            }
        }
        Value::Array(rows) => {
            for row in rows {
                println!("{}", format_minimal(row));
            }
        }
        _ => println!("{}", format_minimal(result_obj)),
    }
}

fn find_priority(map: &Map<String, Value>) -> Option<&Value> {
    priority_field(map).or_else(|| {
        map.values()
            .filter_map(Value::as_object)
            .find_map(priority_field)
    })
}

fn priority_field(map: &Map<String, Value>) -> Option<&Value> {
    PRIORITY_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|val| !val.is_null())
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
