//! Unwrapping of LogRocket response envelopes.
//!
//! Endpoints are not consistent about where they put their payload: a single session may
//! come back as `{"session": {...}}` or as the bare object, a list as `{"sessions": [...]}`
//! or `{"data": [...]}`. Callers list the keys they accept, in priority order.
use serde_json::Value;

/// The first array found under one of `keys`, or an empty list.
pub fn items_under(response: &Value, keys: &[&str]) -> Vec<Value> {
    keys.iter()
        .find_map(|key| response.get(*key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

/// The first non-null value found under one of `keys`, or the whole response.
pub fn record_under(response: Value, keys: &[&str]) -> Value {
    let found = keys
        .iter()
        .find_map(|key| response.get(*key).filter(|value| !value.is_null()))
        .cloned();

    found.unwrap_or(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_items_under_priority() {
        let response = json!({"network": [{"id": 2}], "data": [{"id": 3}]});
        assert_eq!(
            items_under(&response, &["requests", "network", "data"]),
            vec![json!({"id": 2})]
        );
        assert!(items_under(&json!({"requests": "nope"}), &["requests"]).is_empty());
    }

    #[test]
    fn test_record_under_unwraps_envelope() {
        let response = json!({"session": {"id": "abc"}});
        assert_eq!(record_under(response, &["session"]), json!({"id": "abc"}));
    }

    #[test]
    fn test_record_under_returns_bare_response() {
        let response = json!({"id": "abc"});
        assert_eq!(
            record_under(response.clone(), &["project", "app"]),
            response
        );
    }
}
