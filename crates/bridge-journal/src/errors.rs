use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid file header (magic, version, flags or reserved bytes).
    #[error("invalid journal header: {0}")]
    InvalidHeader(String),
    /// Invalid frame structure (reserved bytes or length).
    #[error("invalid frame at offset {offset}: {reason}")]
    InvalidFrame {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Payload exceeds maximum size limit.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Maximum allowed size.
        max: u32,
    },
    /// Record payload is not UTF-8.
    #[error("invalid UTF-8 in record payload: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// Record payload is not a ledger record.
    #[error("record decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// File exists but is shorter than a header.
    #[error("file is {0} bytes long, too short to hold a journal header")]
    NotAJournal(u64),
    /// An earlier append failed and its partial frame could not be removed.
    #[error("journal writer is unusable: a failed append could not be rolled back at offset {offset}")]
    Poisoned {
        /// Offset where the failed frame started.
        offset: u64,
    },
    /// Truncated frame detected in strict mode.
    #[error("truncated frame at offset {offset}")]
    TruncatedFrame {
        /// Byte offset where the truncated frame starts.
        offset: u64,
    },
}
