//! Serialized form state
//!
//! A record maps each field name to the values captured for it, in
//! document order. It encodes as a plain JSON object of arrays:
//!
//! ```json
//! {"name": ["alice"], "agree": [true], "color": ["red", "blue"]}
//! ```

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One captured value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox state
    Bool(bool),
    /// Everything else
    Text(String),
}

impl FieldValue {
    /// Value as written into a value-bearing control
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Bool(b) => Cow::Owned(b.to_string()),
            FieldValue::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Value as a checkbox state; text is truthy unless empty or "false"
    pub fn as_bool(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Text(s) => !s.is_empty() && s != "false",
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Field name → captured values; key order is first-appearance order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormRecord {
    fields: IndexMap<String, Vec<FieldValue>>,
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to `name`, creating the field on first use
    pub fn push(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(value.into());
    }

    /// Values for `name`, if the field is present
    pub fn get(&self, name: &str) -> Option<&[FieldValue]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fields in record order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldValue])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Field names in record order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let mut record = FormRecord::new();
        record.push("name", "alice");
        record.push("agree", true);
        record.push("color", "red");
        record.push("color", "blue");

        assert_eq!(
            record.to_json().unwrap(),
            r#"{"name":["alice"],"agree":[true],"color":["red","blue"]}"#
        );
    }

    #[test]
    fn test_decode_keeps_key_order() {
        let record = FormRecord::from_json(r#"{"z":["1"],"a":[false],"m":["x","y"]}"#).unwrap();
        let names: Vec<&str> = record.names().collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(record.get("a"), Some(&[FieldValue::Bool(false)][..]));
    }

    #[test]
    fn test_decode_rejects_non_record() {
        assert!(FormRecord::from_json("[1, 2]").is_err());
        assert!(FormRecord::from_json(r#"{"a": "not-an-array"}"#).is_err());
        assert!(FormRecord::from_json("{not json").is_err());
    }

    #[test]
    fn test_value_coercions() {
        assert_eq!(FieldValue::Bool(true).as_text(), "true");
        assert!(FieldValue::from("on").as_bool());
        assert!(!FieldValue::from("false").as_bool());
        assert!(!FieldValue::from("").as_bool());
    }
}
