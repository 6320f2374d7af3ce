pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

/// Nested objects become dotted keys (`breakdown.total_monthly`) so
/// results print as one field per row. Arrays are kept whole.
pub fn flatten_fields(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    flatten_into("", map, &mut rows);
    rows
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, rows: &mut Vec<(String, Value)>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) if !inner.is_empty() => flatten_into(&name, inner, rows),
            _ => rows.push((name, val.clone())),
        }
    }
}

/// Scalar rendering shared by the table and CSV writers.
pub fn scalar_text(value: &Value, null: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_result() {
        let value = json!({
            "loan_amount": "320000",
            "breakdown": { "total_monthly": "2636.16", "insurance_monthly": "150" },
            "horizon": { "status": "balance_grows" }
        });
        let rows = flatten_fields(value.as_object().unwrap());
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "breakdown.insurance_monthly",
                "breakdown.total_monthly",
                "horizon.status",
                "loan_amount"
            ]
        );
    }

    #[test]
    fn test_scalar_text_null() {
        assert_eq!(scalar_text(&Value::Null, ""), "");
        assert_eq!(scalar_text(&json!(true), ""), "true");
    }
}
