//! Error types for store operations.

use bridge_core::LedgerError;
use bridge_journal::JournalError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),
    /// Payload exceeds the 16 MiB frame limit.
    #[error("payload exceeds 16 MiB limit")]
    PayloadTooLarge,
    /// Replay or genesis failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
    /// A ledger was expected at `path` but the journal is missing or empty.
    #[error("no ledger at {}", .0.display())]
    NoLedger(PathBuf),
    /// A ledger already exists at `path`.
    #[error("ledger already exists at {}", .0.display())]
    AlreadyInitialized(PathBuf),
}
