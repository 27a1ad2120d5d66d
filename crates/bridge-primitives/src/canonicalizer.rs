use canonical_json::to_string;
use serde::Serialize;
use serde_json::Value;

use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Value could not be converted to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Fractional or non-finite number detected; ledger records only carry integers.
    #[error("non-integer number detected at {0}")]
    NonIntegerNumber(String),
    /// Generic failure.
    #[error("other error: {0}")]
    Other(String),
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic RFC 8785 bytes.
///
/// Record digests are only stable while every writer uses this one encoding;
/// a different encoding needs a new record domain in [`crate::digest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates the record canonicalizer.
    pub fn new() -> Self {
        Self
    }

    /// Produces canonical bytes for a JSON value.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        validate(value, Path::root())?;
        let canonical =
            to_string(value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
        Ok(canonical.into_bytes())
    }

    /// Serializes a value to JSON and canonicalizes the result.
    pub fn canonicalize_serialize<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, CanonicalizationError> {
        let value = serde_json::to_value(value)?;
        self.canonicalize(&value)
    }
}

fn validate(value: &Value, path: Path) -> Result<(), CanonicalizationError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                validate(child, path.push_field(key))?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                validate(item, path.push_index(idx))?;
            }
            Ok(())
        }
        Value::Number(num) => {
            if num.is_f64() {
                return Err(CanonicalizationError::NonIntegerNumber(path.to_string()));
            }
            Ok(())
        }
        Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
    }
}
