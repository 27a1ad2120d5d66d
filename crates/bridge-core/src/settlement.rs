//! Stake settlement policy for the slot auction.
//!
//! The ledger decides who wins a slot; how stake moves between bidders and
//! displaced owners is up to the [`StakeSettlement`] implementation. Every
//! hook is driven by a recorded event, so replaying a journal into a fresh
//! policy rebuilds the same balances.

use bridge_primitives::{Address, SlotId, U256};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::slots::Bid;

/// Failure reported by a settlement policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// Stake could not be escrowed.
    #[error("{0}")]
    Rejected(String),
}

/// Moves stake in and out of escrow as the auction progresses.
///
/// Only escrow can fail; funding, refunds and releases are bookkeeping on
/// funds the policy already holds.
pub trait StakeSettlement {
    /// Credits spendable stake to `account`.
    fn credit(&mut self, account: Address, amount: U256);

    /// Checks whether `bidder` can lock `stake`, without locking it.
    fn check_escrow(&self, bidder: Address, stake: U256) -> Result<(), SettlementError>;

    /// Locks `stake` from `bidder` for a new bid.
    fn escrow(&mut self, bidder: Address, stake: U256) -> Result<(), SettlementError>;

    /// Returns the stake of a bid that was displaced before activating.
    fn refund_bid(&mut self, bid: &Bid);

    /// Settles the stake of an owner who lost the slot.
    fn release(&mut self, slot_id: SlotId, owner: Address, stake: U256);
}

/// Settlement policy that refunds everything in full.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscrowBook {
    available: BTreeMap<Address, U256>,
    escrowed: BTreeMap<Address, U256>,
}

impl EscrowBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spendable stake of `account`.
    pub fn available(&self, account: Address) -> U256 {
        self.available.get(&account).copied().unwrap_or_default()
    }

    /// Stake of `account` currently locked in bids or slots.
    pub fn escrowed(&self, account: Address) -> U256 {
        self.escrowed.get(&account).copied().unwrap_or_default()
    }

    fn unlock(&mut self, account: Address, amount: U256) {
        let locked = self.escrowed.entry(account).or_default();
        let amount = amount.min(*locked);
        *locked -= amount;
        *self.available.entry(account).or_default() += amount;
    }
}

impl StakeSettlement for EscrowBook {
    fn credit(&mut self, account: Address, amount: U256) {
        let balance = self.available.entry(account).or_default();
        *balance = balance.saturating_add(amount);
    }

    fn check_escrow(&self, bidder: Address, stake: U256) -> Result<(), SettlementError> {
        let available = self.available(bidder);
        if available < stake {
            return Err(SettlementError::Rejected(format!(
                "{} has {} available, bid needs {}",
                bidder, available, stake
            )));
        }
        Ok(())
    }

    fn escrow(&mut self, bidder: Address, stake: U256) -> Result<(), SettlementError> {
        self.check_escrow(bidder, stake)?;
        let available = self.available(bidder);
        self.available.insert(bidder, available - stake);
        *self.escrowed.entry(bidder).or_default() += stake;
        Ok(())
    }

    fn refund_bid(&mut self, bid: &Bid) {
        self.unlock(bid.bidder, bid.stake);
    }

    fn release(&mut self, _slot_id: SlotId, owner: Address, stake: U256) {
        self.unlock(owner, stake);
    }
}
