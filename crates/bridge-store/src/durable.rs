//! Opening a ledger whose records live in a journal file.

use crate::error::StoreError;
use crate::journal::{JournalBackendReader, JournalBackendWriter};
use crate::traits::StoreReader;
use bridge_core::{GovernanceParams, Ledger, RecordEnvelope};
use bridge_journal::{ReadMode, WriteOptions};
use std::path::Path;
use tracing::{info, warn};

/// Ledger whose sink is a journal on disk.
pub type DurableLedger = Ledger<JournalBackendWriter>;

fn stored_records(path: &Path) -> Result<Vec<RecordEnvelope>, StoreError> {
    if !path.exists() || std::fs::metadata(path)?.len() == 0 {
        return Ok(Vec::new());
    }
    let mut reader = JournalBackendReader::open(path, ReadMode::Permissive)?;
    reader.read_all()
}

/// Creates a new ledger at `path` and records its genesis.
///
/// # Errors
///
/// Returns [`StoreError::AlreadyInitialized`] if the journal already holds
/// records.
pub fn create_ledger<P: AsRef<Path>>(
    path: P,
    params: GovernanceParams,
    options: WriteOptions,
) -> Result<DurableLedger, StoreError> {
    let path = path.as_ref();
    if !stored_records(path)?.is_empty() {
        return Err(StoreError::AlreadyInitialized(path.to_path_buf()));
    }
    let (writer, _) = JournalBackendWriter::recover(path, options)?;
    let ledger = Ledger::genesis(params, writer)?;
    info!(path = %path.display(), "ledger created");
    Ok(ledger)
}

/// Reopens the ledger stored at `path`.
///
/// A torn final frame is truncated before replay. Every record's digest
/// and link is verified while state is rebuilt.
///
/// # Errors
///
/// Returns [`StoreError::NoLedger`] if the journal is missing or empty, and
/// [`StoreError::Ledger`] if replay finds a corrupt record.
pub fn open_ledger<P: AsRef<Path>>(
    path: P,
    options: WriteOptions,
) -> Result<DurableLedger, StoreError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StoreError::NoLedger(path.to_path_buf()));
    }
    let (writer, dropped) = JournalBackendWriter::recover(path, options)?;
    if dropped > 0 {
        warn!(path = %path.display(), dropped, "discarded torn record before replay");
    }
    let records = stored_records(path)?;
    if records.is_empty() {
        return Err(StoreError::NoLedger(path.to_path_buf()));
    }
    let count = records.len();
    let ledger = Ledger::replay(records, writer)?;
    info!(path = %path.display(), records = count, tip = %ledger.tip_hash(), "ledger opened");
    Ok(ledger)
}

/// Reopens the ledger at `path`, or creates it from `params` if none exists.
pub fn open_or_create<P: AsRef<Path>>(
    path: P,
    params: GovernanceParams,
    options: WriteOptions,
) -> Result<DurableLedger, StoreError> {
    let path = path.as_ref();
    match open_ledger(path, options.clone()) {
        Err(StoreError::NoLedger(_)) => create_ledger(path, params, options),
        other => other,
    }
}
