use serde_json::{Map, Value};

use super::scalar_text;

/// Headline figure per calculator, in priority order.
const PRIORITY_KEYS: [&str; 8] = [
    "total_monthly",
    "monthly_payment",
    "months",
    "final_balance",
    "cap_rate",
    "remaining",
    "needs",
    "matches_saved",
];

/// Print just the key answer value from the output.
///
/// Looks for a well-known field in the result, then one level down
/// (mortgage `breakdown`, debt `horizon`), then falls back to the first
/// field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        if let Some(val) = find_priority(map) {
            println!("{}", scalar_text(val, "null"));
            return;
        }
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val, "null"));
            return;
        }
    }

    println!("{}", scalar_text(result_obj, "null"));
}

fn find_priority(map: &Map<String, Value>) -> Option<&Value> {
    PRIORITY_KEYS.iter().find_map(|key| {
        map.get(*key)
            .filter(|v| !v.is_null())
            .or_else(|| {
                map.values()
                    .filter_map(Value::as_object)
                    .find_map(|inner| inner.get(*key).filter(|v| !v.is_null()))
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_mortgage_total_found_in_breakdown() {
        let result = json!({
            "loan_amount": "320000",
            "breakdown": { "principal_and_interest": "2086.16", "total_monthly": "2636.16" },
            "amortization": { "monthly_payment": "2086.16" }
        });
        let found = find_priority(result.as_object().unwrap()).unwrap();
        assert_eq!(found, &json!("2636.16"));
    }

    #[test]
    fn test_balance_grows_has_no_months() {
        let result = json!({ "total_balance": "10000", "horizon": { "status": "balance_grows" } });
        assert!(find_priority(result.as_object().unwrap()).is_none());
    }
}
