// SPDX-License-Identifier: MIT

//! Raw activity records as returned by the remote source.
//!
//! The remote schema varies by sport type and account settings, so a raw
//! record is kept as an opaque field-name → value mapping. The normalizer
//! enforces the required/optional field contracts at this boundary; nothing
//! downstream ever sees a raw record.

use crate::error::{AppError, Result};
use serde_json::{Map, Value};

/// One raw activity record: an opaque JSON object.
#[derive(Debug, Clone)]
pub struct RawActivity(Map<String, Value>);

impl RawActivity {
    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AppError::malformed(
                "<record>",
                format!("expected a JSON object, got {}", type_name(&other)),
            )),
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Return the first of `names` that is present and non-null,
    /// along with the name that matched.
    pub fn first_present<'a>(&'a self, names: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        for name in names {
            if let Some(v) = self.0.get(*name) {
                if !v.is_null() {
                    return Some((name, v));
                }
            }
        }
        None
    }

    /// Read a required numeric field under any of the given aliases.
    pub fn require_f64(&self, names: &[&'static str]) -> Result<(&'static str, f64)> {
        let (name, value) = self
            .first_present(names)
            .ok_or_else(|| AppError::malformed(names[0], "is missing"))?;
        let n = value
            .as_f64()
            .ok_or_else(|| AppError::malformed(name, format!("expected a number, got {}", type_name(value))))?;
        Ok((name, n))
    }

    /// Read an optional numeric field; absent or null maps to `None`,
    /// never to zero.
    pub fn optional_f64(&self, names: &[&'static str]) -> Result<Option<(&'static str, f64)>> {
        match self.first_present(names) {
            None => Ok(None),
            Some((name, value)) => {
                let n = value.as_f64().ok_or_else(|| {
                    AppError::malformed(name, format!("expected a number, got {}", type_name(value)))
                })?;
                Ok(Some((name, n)))
            }
        }
    }

    /// Read a required string field under any of the given aliases.
    pub fn require_str(&self, names: &[&'static str]) -> Result<(&'static str, &str)> {
        let (name, value) = self
            .first_present(names)
            .ok_or_else(|| AppError::malformed(names[0], "is missing"))?;
        let s = value
            .as_str()
            .ok_or_else(|| AppError::malformed(name, format!("expected a string, got {}", type_name(value))))?;
        Ok((name, s))
    }

    /// Read a required unsigned integer field.
    pub fn require_u64(&self, names: &[&'static str]) -> Result<(&'static str, u64)> {
        let (name, value) = self
            .first_present(names)
            .ok_or_else(|| AppError::malformed(names[0], "is missing"))?;
        let n = value
            .as_u64()
            .ok_or_else(|| AppError::malformed(name, format!("expected an unsigned integer, got {}", type_name(value))))?;
        Ok((name, n))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
