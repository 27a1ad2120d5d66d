//! Validator slot table and the stake auction.

use bridge_primitives::{Address, SlotId, U256};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Pending takeover of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// Account that placed the bid and becomes owner on activation.
    pub bidder: Address,
    /// Signer installed on activation.
    pub signer: Address,
    /// Stake offered.
    pub stake: U256,
    /// First epoch in which the bid takes effect.
    pub activation_epoch: u64,
}

/// One validator position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Position in the table.
    pub slot_id: SlotId,
    /// Economic owner.
    pub owner: Address,
    /// Address allowed to submit periods.
    pub signer: Address,
    /// Stake backing the current owner.
    pub stake: U256,
    /// Bid waiting for its activation epoch.
    pub pending: Option<Bid>,
    /// Rewards earned by submissions and not yet paid out.
    pub accrued_reward: U256,
}

impl Slot {
    fn vacant(slot_id: SlotId) -> Self {
        Self {
            slot_id,
            owner: Address::ZERO,
            signer: Address::ZERO,
            stake: U256::ZERO,
            pending: None,
            accrued_reward: U256::ZERO,
        }
    }

    /// True while the slot has no owner or no signer.
    pub fn is_empty(&self) -> bool {
        self.owner.is_zero() || self.signer.is_zero()
    }
}

/// Outcome of installing a new owner in a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Takeover {
    /// Owner that was replaced and the stake they had put up.
    pub previous: Option<(Address, U256)>,
    /// Pending bid that was discarded.
    pub displaced: Option<Bid>,
}

/// Fixed-size slot table.
#[derive(Debug, Clone)]
pub struct SlotTable {
    slots: Vec<Slot>,
}

impl SlotTable {
    /// Table of `slot_count` vacant slots.
    pub fn new(slot_count: u16) -> Self {
        Self {
            slots: (0..slot_count).map(Slot::vacant).collect(),
        }
    }

    /// Number of slots.
    pub fn slot_count(&self) -> u16 {
        // built from a u16 range
        self.slots.len() as u16
    }

    /// Returns the slot, or `InvalidSlot` when out of range.
    pub fn get(&self, slot_id: SlotId) -> Result<&Slot, LedgerError> {
        self.slots
            .get(usize::from(slot_id))
            .ok_or(LedgerError::InvalidSlot {
                slot_id,
                slot_count: self.slot_count(),
            })
    }

    fn get_mut(&mut self, slot_id: SlotId) -> Result<&mut Slot, LedgerError> {
        let slot_count = self.slot_count();
        self.slots
            .get_mut(usize::from(slot_id))
            .ok_or(LedgerError::InvalidSlot {
                slot_id,
                slot_count,
            })
    }

    /// True iff the slot exists, is non-empty and `caller` is its signer.
    pub fn is_authorized(&self, slot_id: SlotId, caller: Address) -> bool {
        self.get(slot_id)
            .map(|slot| !slot.is_empty() && slot.signer == caller)
            .unwrap_or(false)
    }

    /// Slots in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Checks that `stake` outbids both the sitting owner and any pending bid.
    pub fn check_bid(&self, slot_id: SlotId, stake: U256) -> Result<(), LedgerError> {
        let slot = self.get(slot_id)?;
        let pending = slot.pending.as_ref().map(|b| b.stake).unwrap_or_default();
        let required = slot.stake.max(pending);
        if stake <= required {
            return Err(LedgerError::BidTooLow {
                slot_id,
                offered: stake,
                required,
            });
        }
        Ok(())
    }

    /// Slots whose pending bid activates at or before `epoch`.
    pub fn due(&self, epoch: u64) -> Vec<SlotId> {
        self.slots
            .iter()
            .filter(|slot| {
                slot.pending
                    .as_ref()
                    .is_some_and(|bid| bid.activation_epoch <= epoch)
            })
            .map(|slot| slot.slot_id)
            .collect()
    }

    /// Installs an owner directly, resetting stake and dropping any pending bid.
    pub(crate) fn assign(
        &mut self,
        slot_id: SlotId,
        owner: Address,
        signer: Address,
    ) -> Result<Takeover, LedgerError> {
        let slot = self.get_mut(slot_id)?;
        let previous = (!slot.owner.is_zero()).then_some((slot.owner, slot.stake));
        let displaced = slot.pending.take();
        slot.owner = owner;
        slot.signer = signer;
        slot.stake = U256::ZERO;
        Ok(Takeover {
            previous,
            displaced,
        })
    }

    /// Records a bid, returning the bid it replaces.
    pub(crate) fn place_bid(&mut self, slot_id: SlotId, bid: Bid) -> Result<Option<Bid>, LedgerError> {
        let slot = self.get_mut(slot_id)?;
        Ok(slot.pending.replace(bid))
    }

    /// Promotes the pending bid to owner.
    pub(crate) fn activate(&mut self, slot_id: SlotId) -> Result<Takeover, LedgerError> {
        let slot = self.get_mut(slot_id)?;
        let bid = slot.pending.take().ok_or(LedgerError::EmptySlot(slot_id))?;
        let previous = (!slot.owner.is_zero()).then_some((slot.owner, slot.stake));
        slot.owner = bid.bidder;
        slot.signer = bid.signer;
        slot.stake = bid.stake;
        Ok(Takeover {
            previous,
            displaced: None,
        })
    }

    pub(crate) fn accrue(&mut self, slot_id: SlotId, amount: U256) -> Result<(), LedgerError> {
        let slot = self.get_mut(slot_id)?;
        slot.accrued_reward = slot.accrued_reward.saturating_add(amount);
        Ok(())
    }

    pub(crate) fn clear_reward(&mut self, slot_id: SlotId) -> Result<U256, LedgerError> {
        let slot = self.get_mut(slot_id)?;
        Ok(std::mem::take(&mut slot.accrued_reward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: Address = Address::repeat_byte(0x01);
    const SIGNER: Address = Address::repeat_byte(0x02);

    #[test]
    fn new_table_is_vacant() {
        let table = SlotTable::new(3);
        assert!(table.iter().all(Slot::is_empty));
        assert!(!table.is_authorized(0, Address::ZERO));
        assert!(matches!(
            table.get(3),
            Err(LedgerError::InvalidSlot {
                slot_id: 3,
                slot_count: 3
            })
        ));
    }

    #[test]
    fn assign_authorizes_signer_only() {
        let mut table = SlotTable::new(2);
        table.assign(1, OWNER, SIGNER).unwrap();
        assert!(table.is_authorized(1, SIGNER));
        assert!(!table.is_authorized(1, OWNER));
        assert!(!table.is_authorized(0, SIGNER));
    }

    #[test]
    fn bids_must_outbid_stake_and_pending() {
        let mut table = SlotTable::new(1);
        table.check_bid(0, U256::from(1)).unwrap();
        table
            .place_bid(
                0,
                Bid {
                    bidder: OWNER,
                    signer: SIGNER,
                    stake: U256::from(10),
                    activation_epoch: 1,
                },
            )
            .unwrap();
        assert!(matches!(
            table.check_bid(0, U256::from(10)),
            Err(LedgerError::BidTooLow { .. })
        ));
        assert_eq!(table.due(0), Vec::<SlotId>::new());
        assert_eq!(table.due(1), vec![0]);
        let takeover = table.activate(0).unwrap();
        assert_eq!(takeover.previous, None);
        assert_eq!(table.get(0).unwrap().stake, U256::from(10));
        assert!(table.is_authorized(0, SIGNER));
    }

    #[test]
    fn reward_stays_with_slot_across_owners() {
        let mut table = SlotTable::new(1);
        table.assign(0, OWNER, SIGNER).unwrap();
        table.accrue(0, U256::from(5)).unwrap();
        table.assign(0, SIGNER, SIGNER).unwrap();
        assert_eq!(table.clear_reward(0).unwrap(), U256::from(5));
        assert_eq!(table.get(0).unwrap().accrued_reward, U256::ZERO);
    }
}
