use serde_json::{Map, Value};

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 3] = ["interest_saved", "monthly_payment", "total_interest"];

/// Print just the key answer value from the output.
///
/// Looks for the priority fields in the result, then in a nested `loan`
/// summary, then falls back to the first field of the result.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        let nested = map.get("loan").and_then(Value::as_object);
        if let Some(val) = find_priority(map).or_else(|| nested.and_then(find_priority)) {
            println!("{}", format_minimal(val));
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn find_priority(map: &Map<String, Value>) -> Option<&Value> {
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
