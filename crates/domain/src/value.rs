//! Typed state values exposed by entities.

use serde::{Deserialize, Serialize};

/// A single entity state or attribute value.
///
/// Serialized untagged, so a number stays a JSON number and a text stays a
/// JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl StateValue {
    /// Numeric view of the value, if it is a number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Text view of the value, if it is a text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            Self::Int(_) | Self::Float(_) => None,
        }
    }
}

impl From<f64> for StateValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for StateValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<String> for StateValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for StateValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_float_as_number() {
        let json = serde_json::to_string(&StateValue::Float(21.5)).unwrap();
        assert_eq!(json, "21.5");
    }

    #[test]
    fn should_serialize_text_as_plain_string() {
        let json = serde_json::to_string(&StateValue::from("NNE")).unwrap();
        assert_eq!(json, "\"NNE\"");
    }

    #[test]
    fn should_expose_numeric_view_for_int_and_float() {
        assert_eq!(StateValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(StateValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(StateValue::from("x").as_f64(), None);
    }

    #[test]
    fn should_expose_text_view_only_for_text() {
        assert_eq!(StateValue::from("rising").as_str(), Some("rising"));
        assert_eq!(StateValue::Float(1.0).as_str(), None);
    }
}
