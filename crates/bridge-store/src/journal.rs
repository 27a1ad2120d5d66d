//! Journal-backed storage implementation.

use crate::error::StoreError;
use crate::traits::{StoreReader, StoreWriter};
use bridge_core::{EventSink, RecordEnvelope, SinkError};
use bridge_journal::{JournalError, JournalReader, JournalWriter, ReadMode, WriteOptions};
use std::path::Path;

/// Writer appending records to a `.brj` journal.
///
/// Also serves as the ledger's [`EventSink`], so every accepted operation is
/// on disk before the ledger applies it.
#[derive(Debug)]
pub struct JournalBackendWriter {
    writer: JournalWriter,
}

impl JournalBackendWriter {
    /// Opens a journal for appending.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, StoreError> {
        Ok(Self {
            writer: JournalWriter::open(path, options)?,
        })
    }

    /// Opens a journal after cutting off a torn tail; returns bytes dropped.
    pub fn recover<P: AsRef<Path>>(
        path: P,
        options: WriteOptions,
    ) -> Result<(Self, u64), StoreError> {
        let (writer, dropped) = JournalWriter::recover(path, options)?;
        Ok((Self { writer }, dropped))
    }

    /// Flushes and closes the journal.
    pub fn finish(self) -> Result<(), StoreError> {
        Ok(self.writer.finish()?)
    }
}

impl StoreWriter for JournalBackendWriter {
    fn append(&mut self, record: &RecordEnvelope) -> Result<(), StoreError> {
        self.writer.append_record(record).map_err(|err| match err {
            JournalError::PayloadTooLarge { .. } => StoreError::PayloadTooLarge,
            other => StoreError::Journal(other),
        })
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        // appends are flushed as they are written
        Ok(())
    }
}

impl EventSink for JournalBackendWriter {
    fn record(&mut self, envelope: &RecordEnvelope) -> Result<(), SinkError> {
        self.append(envelope).map_err(SinkError::from)
    }
}

/// Reader over a `.brj` journal.
#[derive(Debug)]
pub struct JournalBackendReader {
    reader: JournalReader,
}

impl JournalBackendReader {
    /// Opens a journal for reading.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, StoreError> {
        Ok(Self {
            reader: JournalReader::open(path, mode)?,
        })
    }

    /// True once a torn final frame was met in permissive mode.
    pub fn is_torn(&self) -> bool {
        self.reader.is_torn()
    }
}

impl StoreReader for JournalBackendReader {
    fn read_next(&mut self) -> Result<Option<RecordEnvelope>, StoreError> {
        Ok(self.reader.read_record()?)
    }
}
