//! Linear log of accepted periods and the chain tip it produces.

use bridge_primitives::{period_tip, Address, SlotId, B256, GENESIS_TIP};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// An accepted checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Position in the log.
    pub period_index: u64,
    /// Tip the period builds on.
    pub parent_tip: B256,
    /// Opaque commitment supplied by the submitting slot.
    pub merkle_root: B256,
    /// Slot that submitted the period.
    pub submitted_by: SlotId,
    /// Signer address that made the call.
    pub signer: Address,
    /// Height of the submission.
    pub height: u64,
    /// Caller-supplied timestamp.
    pub timestamp: u64,
}

impl Period {
    /// Tip produced by accepting this period.
    pub fn tip(&self) -> B256 {
        period_tip(
            self.period_index,
            &self.parent_tip,
            &self.merkle_root,
            self.submitted_by,
        )
    }
}

/// The only consensus state: waiting for the period after `tip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwaitingPeriod {
    /// Index the next period will receive.
    pub period_index: u64,
    /// Tip the next period must reference.
    pub tip: B256,
}

/// Append-only period log.
#[derive(Debug, Clone)]
pub struct CheckpointLog {
    periods: Vec<Period>,
    tip: B256,
}

impl Default for CheckpointLog {
    fn default() -> Self {
        Self {
            periods: Vec::new(),
            tip: GENESIS_TIP,
        }
    }
}

impl CheckpointLog {
    /// Empty log at the genesis tip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tip.
    pub fn tip(&self) -> B256 {
        self.tip
    }

    /// Index the next period will receive.
    pub fn period_index(&self) -> u64 {
        self.periods.len() as u64
    }

    /// Current consensus state.
    pub fn state(&self) -> AwaitingPeriod {
        AwaitingPeriod {
            period_index: self.period_index(),
            tip: self.tip,
        }
    }

    /// Period at `index`, if accepted.
    pub fn period(&self, index: u64) -> Option<&Period> {
        usize::try_from(index).ok().and_then(|i| self.periods.get(i))
    }

    /// Most recent period.
    pub fn last(&self) -> Option<&Period> {
        self.periods.last()
    }

    /// All periods in order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Fails with `WrongParent` unless `prev_tip` is the current tip.
    pub fn check_parent(&self, prev_tip: B256) -> Result<(), LedgerError> {
        if prev_tip != self.tip {
            return Err(LedgerError::WrongParent {
                expected: self.tip,
                got: prev_tip,
            });
        }
        Ok(())
    }

    pub(crate) fn append(&mut self, period: Period) -> Result<B256, LedgerError> {
        self.check_parent(period.parent_tip)?;
        if period.period_index != self.period_index() {
            return Err(LedgerError::CorruptRecord {
                seq: period.period_index,
                reason: format!(
                    "period index {} does not follow {}",
                    period.period_index,
                    self.period_index()
                ),
            });
        }
        self.tip = period.tip();
        self.periods.push(period);
        Ok(self.tip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(index: u64, parent: B256) -> Period {
        Period {
            period_index: index,
            parent_tip: parent,
            merkle_root: B256::repeat_byte(0x42),
            submitted_by: 0,
            signer: Address::repeat_byte(0x02),
            height: index,
            timestamp: 0,
        }
    }

    #[test]
    fn tips_chain() {
        let mut log = CheckpointLog::new();
        assert_eq!(log.state().tip, GENESIS_TIP);
        let first = log.append(period(0, GENESIS_TIP)).unwrap();
        assert_ne!(first, GENESIS_TIP);
        let second = log.append(period(1, first)).unwrap();
        assert_eq!(log.tip(), second);
        assert_eq!(log.period_index(), 2);
        assert_eq!(log.period(0).unwrap().tip(), first);
    }

    #[test]
    fn wrong_parent_leaves_log_untouched() {
        let mut log = CheckpointLog::new();
        let err = log.append(period(0, B256::repeat_byte(9))).unwrap_err();
        assert!(matches!(err, LedgerError::WrongParent { .. }));
        assert_eq!(log.tip(), GENESIS_TIP);
        assert!(log.periods().is_empty());
    }
}
