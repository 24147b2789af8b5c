use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format::format_field;

/// Format output as tables: scalar fields first, then one table per row set.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_field_table(map);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    if let Value::Object(res_map) = result {
        print_field_table(res_map);
    } else {
        println!("{}", format_field("result", result));
    }

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

/// Field/Value table; nested objects are flattened as `outer.inner`,
/// arrays of records (schedule entries) get a table of their own.
fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut row_sets: Vec<(String, &[Value])> = Vec::new();
    push_fields(&mut builder, "", map, &mut row_sets);
    println!("{}", Table::from(builder));

    for (label, rows) in row_sets {
        println!("\n{}:", label);
        print_array_table(rows);
    }
}

fn push_fields<'a>(
    builder: &mut Builder,
    prefix: &str,
    map: &'a Map<String, Value>,
    row_sets: &mut Vec<(String, &'a [Value])>,
) {
    for (key, val) in map {
        let label = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => push_fields(builder, &label, inner, row_sets),
            Value::Array(arr) if !arr.is_empty() && arr.iter().all(Value::is_object) => {
                row_sets.push((label, arr.as_slice()));
            }
            _ => {
                let rendered = format_field(key, val);
                builder.push_record([label, rendered]);
            }
        }
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
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_field(h, v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_field("", item));
        }
    }
}
