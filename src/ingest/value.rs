/*!
 * Untyped values as they come out of a parsed file.
 *
 * CSV cells are always text; JSON values keep their shape so the validator
 * can tell "wrong type" apart from "wrong content".
 */

use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;

/// A field value before validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// JSON `null`
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number
    Number(Number),
    /// CSV cell or JSON string
    Text(String),
    /// JSON array
    List(Vec<RawValue>),
    /// JSON object (kept only so it can be reported back)
    Object(Map<String, Value>),
}

impl RawValue {
    /// Shorthand for a text value
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }

    /// Whether the value counts as "supplied" for alias resolution.
    ///
    /// `null` and the empty string are treated as absent. Whitespace-only
    /// text is supplied and fails validation later.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Text(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Whether the value is absent, null or blank text
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Name of the value's shape, used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::List(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(RawValue::from).collect()),
            Value::Object(map) => Self::Object(map),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
            // Compound values print as JSON
            other => match serde_json::to_string(other) {
                Ok(json) => write!(f, "{}", json),
                Err(_) => write!(f, "<{}>", other.kind()),
            },
        }
    }
}

/// Unvalidated mapping from field name to value, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: Vec<(String, RawValue)>,
}

impl RawRow {
    /// Creates an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field; a repeated name replaces the earlier value
    pub fn insert(&mut self, name: &str, value: RawValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value;
        } else {
            self.fields.push((name.to_string(), value));
        }
    }

    /// Looks up a field by exact name
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Field names in source order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for RawRow {
    fn from(map: Map<String, Value>) -> Self {
        let mut row = RawRow::new();
        for (key, value) in map {
            row.insert(&key, RawValue::from(value));
        }
        row
    }
}

impl<const N: usize> From<[(&str, RawValue); N]> for RawRow {
    fn from(pairs: [(&str, RawValue); N]) -> Self {
        let mut row = RawRow::new();
        for (key, value) in pairs {
            row.insert(key, value);
        }
        row
    }
}
