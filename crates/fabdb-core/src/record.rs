//! Schema validation for raw records.
//!
//! Raw records arrive as untyped JSON objects. [`FromRecord`] turns one of them
//! into a domain object, failing with [`FabDbError::MissingField`] or
//! [`FabDbError::InvalidValue`] instead of silently defaulting.

use crate::{FabDbError, Result};
use serde_json::{Map, Value};

/// An undecoded, source-format representation of one entity
pub type RawRecord = Map<String, Value>;

/// A domain object that can be built from one raw record
pub trait FromRecord: Sized {
    /// Human readable entity kind, used in log lines and errors
    const KIND: &'static str;

    /// Validate and convert one raw record
    fn from_record(record: &Value) -> Result<Self>;

    /// Stable identifier of the built object
    fn id(&self) -> &str;
}

/// View over a raw record with typed accessors
///
/// `prefix` is prepended to field names in errors, so nested failures read as
/// `stats.cost` or `cards[3].name`.
pub(crate) struct Fields<'a> {
    map: &'a RawRecord,
    prefix: String,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(record: &'a Value, prefix: &str) -> Result<Self> {
        match record {
            Value::Object(map) => Ok(Self {
                map,
                prefix: prefix.to_string(),
            }),
            other => Err(FabDbError::MalformedResponse(format!(
                "expected a JSON object{}, got {}",
                if prefix.is_empty() {
                    String::new()
                } else {
                    format!(" at `{prefix}`")
                },
                type_name(other)
            ))),
        }
    }

    pub(crate) fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.prefix)
        }
    }

    /// Present and non-null value for `key`
    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Required, non-empty string
    pub(crate) fn required_str(&self, key: &str) -> Result<String> {
        match self.get(key) {
            None => Err(FabDbError::missing(self.path(key))),
            Some(Value::String(s)) if s.trim().is_empty() => {
                Err(FabDbError::missing(self.path(key)))
            }
            Some(Value::String(s)) => Ok(s.clone()),
            // numeric ids are rendered, never rejected
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(FabDbError::invalid(self.path(key), other)),
        }
    }

    pub(crate) fn opt_str(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(FabDbError::invalid(self.path(key), other)),
        }
    }

    /// Optional integer; numeric strings are accepted, anything else fails
    pub(crate) fn opt_i64(&self, key: &str) -> Result<Option<i64>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| FabDbError::invalid(self.path(key), value)),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| FabDbError::invalid(self.path(key), value)),
            other => Err(FabDbError::invalid(self.path(key), other)),
        }
    }

    pub(crate) fn opt_u32(&self, key: &str) -> Result<Option<u32>> {
        match self.opt_i64(key)? {
            None => Ok(None),
            Some(n) => u32::try_from(n)
                .map(Some)
                .map_err(|_| FabDbError::invalid(self.path(key), &Value::from(n))),
        }
    }

    pub(crate) fn opt_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::Number(n)) if n.as_i64() == Some(0) => Ok(Some(false)),
            Some(Value::Number(n)) if n.as_i64() == Some(1) => Ok(Some(true)),
            Some(other) => Err(FabDbError::invalid(self.path(key), other)),
        }
    }

    /// Optional list of strings, in payload order
    pub(crate) fn str_list(&self, key: &str) -> Result<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(FabDbError::invalid(format!("{}[{i}]", self.path(key)), other)),
                })
                .collect(),
            Some(other) => Err(FabDbError::invalid(self.path(key), other)),
        }
    }

    /// Optional list of nested objects, in payload order
    pub(crate) fn list(&self, key: &str) -> Result<&'a [Value]> {
        match self.get(key) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(FabDbError::invalid(self.path(key), other)),
        }
    }

    /// Collect every key not listed in `known`
    pub(crate) fn extra(&self, known: &[&str]) -> RawRecord {
        self.map
            .iter()
            .filter(|(k, _)| !known.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Check an identifier or slug before it is placed into a request path
pub fn validate_identifier(name: &str, id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(FabDbError::InvalidFilterValue {
            name: name.to_string(),
            value: id.to_string(),
        })
    }
}

pub(crate) const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
