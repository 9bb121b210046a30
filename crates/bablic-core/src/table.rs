//! Translation tables and normalization of raw service responses.

use crate::error::BablicError;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Reserved key carrying keys whose translation is the key itself.
pub const EMPTIES_KEY: &str = "_empties";

/// Key → localized string for a single language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TranslationTable(HashMap<String, String>);

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a table from a raw fetch response.
    ///
    /// The raw value is left untouched. Nested objects flatten into dotted
    /// keys, non-string scalars are stringified, `null` and arrays are
    /// dropped. Every key listed under [`EMPTIES_KEY`] maps to itself, and
    /// the reserved key never appears in the result.
    pub fn from_response(raw: &Value) -> Result<Self, BablicError> {
        let obj = raw.as_object().ok_or_else(|| {
            BablicError::Decode(format!("expected a JSON object, got {}", kind(raw)))
        })?;

        let mut table = Self::new();
        for (key, value) in obj {
            if key == EMPTIES_KEY {
                continue;
            }
            flatten_into(&mut table, key, value);
        }

        if let Some(empties) = obj.get(EMPTIES_KEY) {
            let list = empties.as_array().ok_or_else(|| {
                BablicError::Decode(format!("{EMPTIES_KEY} must be an array"))
            })?;
            for item in list {
                match item.as_str() {
                    Some(k) => table.insert(k, k),
                    None => debug!("table: skipping non-string {EMPTIES_KEY} entry {item}"),
                }
            }
        }

        Ok(table)
    }
}

fn flatten_into(table: &mut TranslationTable, path: &str, value: &Value) {
    match value {
        Value::String(s) => table.insert(path, s.as_str()),
        Value::Number(n) => table.insert(path, n.to_string()),
        Value::Bool(b) => table.insert(path, b.to_string()),
        Value::Object(children) => {
            for (k, v) in children {
                flatten_into(table, &format!("{path}.{k}"), v);
            }
        }
        Value::Null | Value::Array(_) => {
            debug!("table: dropping {} value at {path}", kind(value));
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A table viewed with a single extra entry on top.
///
/// Used to render a fallback for a missing key without touching the
/// host's canonical store.
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    base: Option<&'a TranslationTable>,
    key: &'a str,
    value: &'a str,
}

impl<'a> Overlay<'a> {
    pub fn new(base: Option<&'a TranslationTable>, key: &'a str, value: &'a str) -> Self {
        Self { base, key, value }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        if key == self.key {
            return Some(self.value);
        }
        self.base.and_then(|t| t.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empties_expanded_and_stripped() {
        let raw = json!({
            "greeting": "Bonjour",
            "_empties": ["OK", "Email"]
        });
        let table = TranslationTable::from_response(&raw).unwrap();
        assert_eq!(table.get("greeting"), Some("Bonjour"));
        assert_eq!(table.get("OK"), Some("OK"));
        assert_eq!(table.get("Email"), Some("Email"));
        assert!(!table.contains_key(EMPTIES_KEY));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_raw_response_keeps_reserved_key() {
        let raw = json!({"_empties": ["a"]});
        let _ = TranslationTable::from_response(&raw).unwrap();
        assert!(raw.get(EMPTIES_KEY).is_some());
    }

    #[test]
    fn test_empties_override_existing_value() {
        let raw = json!({"Save": "Enregistrer", "_empties": ["Save"]});
        let table = TranslationTable::from_response(&raw).unwrap();
        assert_eq!(table.get("Save"), Some("Save"));
    }

    #[test]
    fn test_without_empties() {
        let raw = json!({"a": "A", "b": "B"});
        let table = TranslationTable::from_response(&raw).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_nested_objects_flatten() {
        let raw = json!({
            "home": {"title": "Accueil", "menu": {"open": "Ouvrir"}},
            "count": 3,
            "flag": true,
            "gone": null,
            "list": ["x"]
        });
        let table = TranslationTable::from_response(&raw).unwrap();
        assert_eq!(table.get("home.title"), Some("Accueil"));
        assert_eq!(table.get("home.menu.open"), Some("Ouvrir"));
        assert_eq!(table.get("count"), Some("3"));
        assert_eq!(table.get("flag"), Some("true"));
        assert!(!table.contains_key("gone"));
        assert!(!table.contains_key("list"));
    }

    #[test]
    fn test_non_object_response_rejected() {
        let err = TranslationTable::from_response(&json!(["a"])).unwrap_err();
        assert!(matches!(err, BablicError::Decode(_)));
    }

    #[test]
    fn test_non_array_empties_rejected() {
        let err = TranslationTable::from_response(&json!({"_empties": "a"})).unwrap_err();
        assert!(matches!(err, BablicError::Decode(_)));
    }

    #[test]
    fn test_overlay_prefers_override() {
        let mut base = TranslationTable::new();
        base.insert("a", "A");
        base.insert("miss", "stale");
        let overlay = Overlay::new(Some(&base), "miss", "miss");
        assert_eq!(overlay.get("miss"), Some("miss"));
        assert_eq!(overlay.get("a"), Some("A"));
        assert_eq!(overlay.get("b"), None);
        assert_eq!(base.get("miss"), Some("stale"));
    }

    #[test]
    fn test_overlay_without_base() {
        let overlay = Overlay::new(None, "k", "k");
        assert_eq!(overlay.get("k"), Some("k"));
        assert_eq!(overlay.get("other"), None);
    }
}
