//! Storage backend traits.

use crate::error::StoreError;
use bridge_core::RecordEnvelope;

/// Append-only destination for sealed records.
pub trait StoreWriter {
    /// Appends one record.
    fn append(&mut self, record: &RecordEnvelope) -> Result<(), StoreError>;

    /// Flushes buffered records to the backing medium.
    fn flush(&mut self) -> Result<(), StoreError>;
}

/// Sequential source of sealed records.
pub trait StoreReader {
    /// Returns the next record, or `None` when the store is exhausted.
    fn read_next(&mut self) -> Result<Option<RecordEnvelope>, StoreError>;

    /// Drains the reader.
    fn read_all(&mut self) -> Result<Vec<RecordEnvelope>, StoreError> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }
}

impl<R: StoreReader + ?Sized> StoreReader for &mut R {
    fn read_next(&mut self) -> Result<Option<RecordEnvelope>, StoreError> {
        (**self).read_next()
    }
}

/// Reader over records already in memory.
#[derive(Debug, Clone)]
pub struct MemoryReader {
    records: std::vec::IntoIter<RecordEnvelope>,
}

impl MemoryReader {
    /// Reader yielding `records` in order.
    pub fn new(records: Vec<RecordEnvelope>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }
}

impl StoreReader for MemoryReader {
    fn read_next(&mut self) -> Result<Option<RecordEnvelope>, StoreError> {
        Ok(self.records.next())
    }
}
