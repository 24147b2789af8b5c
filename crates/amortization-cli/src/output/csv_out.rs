use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
///
/// A result carrying schedule entries is written one row per payment;
/// any other result as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => match map.get("entries") {
            Some(Value::Array(entries)) => write_rows(&mut wtr, entries),
            _ => {
                let _ = wtr.write_record(["field", "value"]);
                write_fields(&mut wtr, "", map);
            }
        },
        Value::Array(arr) => write_rows(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut csv::Writer<io::StdoutLock<'_>>, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let label = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        if let Value::Object(inner) = val {
            write_fields(wtr, &label, inner);
        } else {
            let _ = wtr.write_record([label.as_str(), &format_csv_value(val)]);
        }
    }
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
