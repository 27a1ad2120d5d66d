//! Record filtering API for selective iteration.

use crate::traits::StoreReader;
use bridge_core::{LedgerEvent, RecordEnvelope};
use bridge_primitives::{Address, SlotId};

/// Trait for filtering records during iteration.
pub trait RecordFilter {
    /// Returns true if the record matches the filter criteria.
    fn matches(&self, record: &RecordEnvelope) -> bool;
}

/// Filter by event kind.
#[derive(Debug, Clone)]
pub struct EventKindFilter {
    /// Event kind to match (e.g., "deposited", "period_submitted").
    pub kind: String,
}

impl RecordFilter for EventKindFilter {
    fn matches(&self, record: &RecordEnvelope) -> bool {
        record.event.kind() == self.kind
    }
}

/// Filter deposits credited to one depositor.
#[derive(Debug, Clone)]
pub struct DepositorFilter {
    /// Depositor to match.
    pub depositor: Address,
}

impl RecordFilter for DepositorFilter {
    fn matches(&self, record: &RecordEnvelope) -> bool {
        matches!(&record.event, LedgerEvent::Deposited { deposit } if deposit.depositor == self.depositor)
    }
}

/// Filter by the slot an event concerns.
#[derive(Debug, Clone)]
pub struct SlotFilter {
    /// Slot to match.
    pub slot_id: SlotId,
}

impl RecordFilter for SlotFilter {
    fn matches(&self, record: &RecordEnvelope) -> bool {
        record.event.slot_id() == Some(self.slot_id)
    }
}

/// Filter by root-chain height.
#[derive(Debug, Clone)]
pub struct HeightRangeFilter {
    /// Include records at or above this height.
    pub from: Option<u64>,
    /// Include records at or below this height.
    pub to: Option<u64>,
}

impl RecordFilter for HeightRangeFilter {
    fn matches(&self, record: &RecordEnvelope) -> bool {
        if let Some(from) = self.from {
            if record.height < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.height > to {
                return false;
            }
        }
        true
    }
}

/// Composite filter: all filters must match (AND).
pub struct AndFilter {
    /// Filters to combine with AND logic.
    pub filters: Vec<Box<dyn RecordFilter>>,
}

impl RecordFilter for AndFilter {
    fn matches(&self, record: &RecordEnvelope) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}

/// Composite filter: any filter must match (OR).
pub struct OrFilter {
    /// Filters to combine with OR logic.
    pub filters: Vec<Box<dyn RecordFilter>>,
}

impl RecordFilter for OrFilter {
    fn matches(&self, record: &RecordEnvelope) -> bool {
        self.filters.iter().any(|f| f.matches(record))
    }
}

/// Reader that filters records from an underlying reader.
#[derive(Debug)]
pub struct FilteredReader<R: StoreReader, F: RecordFilter> {
    reader: R,
    filter: F,
}

impl<R: StoreReader, F: RecordFilter> FilteredReader<R, F> {
    /// Creates a new filtered reader.
    pub fn new(reader: R, filter: F) -> Self {
        Self { reader, filter }
    }
}

impl<R: StoreReader, F: RecordFilter> StoreReader for FilteredReader<R, F> {
    fn read_next(&mut self) -> Result<Option<RecordEnvelope>, crate::error::StoreError> {
        loop {
            match self.reader.read_next()? {
                None => return Ok(None),
                Some(record) if self.filter.matches(&record) => return Ok(Some(record)),
                Some(_) => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::{Deposit, GovernanceParams};
    use bridge_primitives::{Color, B256, U256};

    fn envelope(seq: u64, height: u64, event: LedgerEvent) -> RecordEnvelope {
        RecordEnvelope::seal(seq, height, B256::ZERO, event).unwrap()
    }

    fn deposited(depositor: Address) -> LedgerEvent {
        LedgerEvent::Deposited {
            deposit: Deposit {
                deposit_id: 0,
                depositor,
                funded_by: depositor,
                color: Color(0),
                value: U256::from(5u64),
                storage_root: None,
            },
        }
    }

    #[test]
    fn height_range_bounds_are_inclusive() {
        let filter = HeightRangeFilter {
            from: Some(10),
            to: Some(20),
        };
        let genesis = LedgerEvent::Genesis {
            params: GovernanceParams::new(Address::ZERO),
        };
        for (height, expected) in [(9, false), (10, true), (20, true), (21, false)] {
            assert_eq!(filter.matches(&envelope(0, height, genesis.clone())), expected);
        }
    }

    #[test]
    fn composite_filters() {
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb0);
        let record = envelope(1, 5, deposited(alice));

        let both = AndFilter {
            filters: vec![
                Box::new(EventKindFilter {
                    kind: "deposited".to_string(),
                }),
                Box::new(DepositorFilter { depositor: alice }),
            ],
        };
        assert!(both.matches(&record));

        let neither = OrFilter {
            filters: vec![
                Box::new(DepositorFilter { depositor: bob }),
                Box::new(SlotFilter { slot_id: 0 }),
            ],
        };
        assert!(!neither.matches(&record));
    }
}
