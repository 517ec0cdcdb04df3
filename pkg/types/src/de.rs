//! Deserialization helpers for objects written by Go controllers.

use serde::{Deserialize, Deserializer};

/// Go marshals nil slices and maps as `null`; read those as empty.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, Default, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        labels: HashMap<String, String>,
    }

    #[test]
    fn test_null_reads_as_empty() {
        let h: Holder = serde_json::from_str(r#"{"items":null,"labels":null}"#).unwrap();
        assert!(h.items.is_empty());
        assert!(h.labels.is_empty());
    }

    #[test]
    fn test_missing_and_present_values() {
        let h: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert!(h.items.is_empty());
        let h: Holder = serde_json::from_str(r#"{"items":["a"],"labels":{"k":"v"}}"#).unwrap();
        assert_eq!(h.items, vec!["a".to_string()]);
        assert_eq!(h.labels.get("k").map(String::as_str), Some("v"));
    }
}
