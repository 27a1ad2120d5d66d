use crate::errors::SinkError;
use crate::events::RecordEnvelope;

/// Destination for sealed records.
///
/// The ledger calls `record` before applying an event; an error aborts the
/// operation and leaves in-memory state unchanged.
pub trait EventSink {
    /// Persists one record.
    fn record(&mut self, envelope: &RecordEnvelope) -> Result<(), SinkError>;
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, envelope: &RecordEnvelope) -> Result<(), SinkError> {
        (**self).record(envelope)
    }
}

/// Sink that keeps records in a vector.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<RecordEnvelope>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far.
    pub fn records(&self) -> &[RecordEnvelope] {
        &self.records
    }

    /// Consumes the sink, returning its records.
    pub fn into_records(self) -> Vec<RecordEnvelope> {
        self.records
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, envelope: &RecordEnvelope) -> Result<(), SinkError> {
        self.records.push(envelope.clone());
        Ok(())
    }
}
