//! JSON rendering policy applied at the HTTP boundary.
//!
//! Every numeric value leaving the service is rendered as a floating point
//! number, so integer and decimal values stored in the backend look the same to
//! clients. Bookings carry no numeric fields today; the policy still runs over
//! every response body.

use serde_json::{Number, Value};

pub fn render_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Number(n)),
        Value::Array(items) => Value::Array(items.into_iter().map(render_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| (key, render_numbers(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integers_render_as_floats() {
        let rendered = render_numbers(json!({ "seats": 3, "nested": [1, { "price": 10 }] }));

        assert_eq!(serde_json::to_string(&rendered["seats"]).unwrap(), "3.0");
        assert_eq!(serde_json::to_string(&rendered["nested"][0]).unwrap(), "1.0");
        assert_eq!(serde_json::to_string(&rendered["nested"][1]["price"]).unwrap(), "10.0");
    }

    #[test]
    fn test_non_numeric_values_untouched() {
        let body = json!({ "message": "ok", "flag": true, "missing": null, "list": ["a"] });
        assert_eq!(render_numbers(body.clone()), body);
    }
}
