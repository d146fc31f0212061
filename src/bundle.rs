//! Key/value result maps returned by the LTSM extras interface.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Well-known key carrying the remote error code.
pub const ERROR_KEY: &str = "e";

/// A single bundle entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Bytes(Vec<u8>),
    Text(String),
}

/// String-keyed result map in the style of the platform result bundles.
///
/// An LTSM operation succeeds exactly when the error code under
/// [`ERROR_KEY`] is present and zero; a missing code counts as a failed
/// call, not as success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    entries: HashMap<String, Value>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bundle carrying a zero error code.
    pub fn ok() -> Self {
        Self::with_error(0)
    }

    pub fn with_error(code: i64) -> Self {
        let mut bundle = Self::new();
        bundle.put_int(ERROR_KEY, code);
        bundle
    }

    pub fn put_int(&mut self, key: impl Into<String>, value: i64) -> &mut Self {
        self.entries.insert(key.into(), Value::Int(value));
        self
    }

    pub fn put_bytes(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.insert(key.into(), Value::Bytes(value.into()));
        self
    }

    pub fn put_text(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), Value::Text(value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.entries.get(key) {
            Some(Value::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn bytes(&self, key: &str) -> Option<&[u8]> {
        match self.entries.get(key) {
            Some(Value::Bytes(value)) => Some(value.as_slice()),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Value::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The embedded remote error code, when present and well-typed.
    pub fn error_code(&self) -> Option<i64> {
        self.int(ERROR_KEY)
    }

    pub fn is_ok(&self) -> bool {
        self.error_code() == Some(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}
