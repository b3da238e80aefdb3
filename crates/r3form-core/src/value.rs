//! Field values held by the form store.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A snapshot of every field value, keyed by field name.
pub type FormValues = BTreeMap<String, FieldValue>;

/// The value of a single form field.
///
/// Serializes untagged, so a snapshot becomes a plain JSON object such as
/// `{"email": "a@b.c", "newsletter": true, "volume": 0.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text entered into an input field.
    Text(String),
    /// On/off state of a switch.
    Flag(bool),
    /// Normalized slider position or any other number.
    Number(f64),
}

impl FieldValue {
    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Flag state, if this is a flag value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serializes_untagged() {
        let mut values = FormValues::new();
        values.insert("email".into(), "a@b.c".into());
        values.insert("newsletter".into(), true.into());
        values.insert("volume".into(), 0.5.into());

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"email":"a@b.c","newsletter":true,"volume":0.5}"#);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(FieldValue::from("x").as_text(), Some("x"));
        assert_eq!(FieldValue::from(true).as_flag(), Some(true));
        assert_eq!(FieldValue::from(true).as_text(), None);
        assert_eq!(FieldValue::from(0.25).as_number(), Some(0.25));
    }
}
