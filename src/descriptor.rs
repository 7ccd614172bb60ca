// Copyright 2025 Cowboy AI, LLC.

//! Brand descriptors
//!
//! A descriptor is the application data a brand carries: an ordered set of
//! named JSON fields such as `{"kind": "external"}`. Descriptors are values;
//! the identity of a brand lives in its [`BrandId`](crate::BrandId).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::{BrandError, BrandResult};

/// Immutable field map describing a brand kind
///
/// # Examples
///
/// ```rust
/// use cim_brand::BrandDescriptor;
///
/// let external = BrandDescriptor::new().with("kind", "external");
/// let audited = BrandDescriptor::new().with("audited", true);
///
/// let both = external.union(&audited);
/// assert_eq!(both.get("kind"), Some(&serde_json::json!("external")));
/// assert_eq!(both.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandDescriptor {
    fields: IndexMap<String, Value>,
}

impl BrandDescriptor {
    /// Create an empty descriptor
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Build a descriptor from a JSON object
    ///
    /// # Errors
    ///
    /// Returns [`BrandError::InvalidDescriptor`] if `value` is not an object
    pub fn from_value(value: Value) -> BrandResult<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().collect(),
            }),
            other => Err(BrandError::InvalidDescriptor(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Return a copy with `key` set to `value`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Field union; on key collision the value from `other` wins
    ///
    /// Keys keep the position of their first occurrence.
    pub fn union(&self, other: &BrandDescriptor) -> BrandDescriptor {
        let mut fields = self.fields.clone();
        for (key, value) in &other.fields {
            fields.insert(key.clone(), value.clone());
        }
        BrandDescriptor { fields }
    }

    /// Get a field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Check if a field is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The `kind` field, when it is a string
    pub fn kind(&self) -> Option<&str> {
        self.get("kind").and_then(Value::as_str)
    }

    /// Iterate over the fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl TryFrom<Value> for BrandDescriptor {
    type Error = BrandError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl<K, V> FromIterator<(K, V)> for BrandDescriptor
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for BrandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
