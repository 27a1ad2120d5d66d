//! Height to epoch to authorized slot.

use bridge_primitives::SlotId;

use crate::errors::LedgerError;

/// Round-robin scheduler: one slot is authorized per epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochScheduler {
    epoch_length: u32,
    slot_count: u16,
}

impl EpochScheduler {
    /// Builds a scheduler; both parameters must be non-zero.
    pub fn new(epoch_length: u32, slot_count: u16) -> Result<Self, LedgerError> {
        if epoch_length == 0 {
            return Err(LedgerError::InvalidEpochLength);
        }
        if slot_count == 0 {
            return Err(LedgerError::InvalidSlotCount);
        }
        Ok(Self {
            epoch_length,
            slot_count,
        })
    }

    /// Heights per epoch.
    pub fn epoch_length(&self) -> u32 {
        self.epoch_length
    }

    /// Number of slots rotated through.
    pub fn slot_count(&self) -> u16 {
        self.slot_count
    }

    /// Epoch containing `height`.
    pub fn epoch(&self, height: u64) -> u64 {
        height / u64::from(self.epoch_length)
    }

    /// First height of `epoch`.
    pub fn epoch_start(&self, epoch: u64) -> u64 {
        epoch.saturating_mul(u64::from(self.epoch_length))
    }

    /// Slot allowed to submit at `height`.
    pub fn authorized_slot(&self, height: u64) -> SlotId {
        // remainder is below slot_count, which fits in u16
        (self.epoch(height) % u64::from(self.slot_count)) as SlotId
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_parameters_rejected() {
        assert!(matches!(
            EpochScheduler::new(0, 4),
            Err(LedgerError::InvalidEpochLength)
        ));
        assert!(matches!(
            EpochScheduler::new(4, 0),
            Err(LedgerError::InvalidSlotCount)
        ));
    }

    #[test]
    fn rotates_through_slots() {
        let scheduler = EpochScheduler::new(10, 3).unwrap();
        let slots = [0, 9, 10, 25, 30, 31].map(|h| scheduler.authorized_slot(h));
        assert_eq!(slots, [0, 0, 1, 2, 0, 0]);
        assert_eq!(scheduler.epoch_start(scheduler.epoch(25)), 20);
    }

    proptest! {
        #[test]
        fn authorized_slot_is_in_range(len in 1u32..1_000, count in 1u16..64, height in any::<u64>()) {
            let scheduler = EpochScheduler::new(len, count).unwrap();
            prop_assert!(scheduler.authorized_slot(height) < count);
            let epoch = scheduler.epoch(height);
            prop_assert_eq!(scheduler.authorized_slot(height), (epoch % u64::from(count)) as u16);
        }
    }
}
