use thiserror::Error;

/// Validation errors for primitive types.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Asset kind code outside `0..=2`.
    #[error("unknown asset kind code {0}")]
    UnknownKind(u8),
}
