//! Tagged field values.
//!
//! Item fields are free-form, but proposals carry one of four shapes so the
//! applier can check a value against the field it targets before writing.
//! Serialized untagged: `"in_progress"`, `42`, `true`, `["a", "b"]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::FieldKind;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Number(serde_json::Number),
    Text(String),
    TextList(Vec<String>),
}

impl FieldValue {
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Number(_) => FieldKind::Number,
            Self::Text(_) => FieldKind::Text,
            Self::TextList(_) => FieldKind::TextList,
        }
    }

    /// Convert into a JSON value for storage.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::TextList(items) => serde_json::Value::Array(
                items
                    .iter()
                    .cloned()
                    .map(serde_json::Value::String)
                    .collect(),
            ),
        }
    }

    /// Read a stored JSON value back. Returns `None` for null and for shapes
    /// outside the four supported variants (objects, mixed arrays).
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Parse a command-line argument. Valid JSON of a supported shape is used
    /// as-is; anything else is taken as plain text.
    #[must_use]
    pub fn parse_arg(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|_| Self::Text(raw.to_string()))
    }

    /// Numeric view of a `Number` value.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::TextList(items)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}
