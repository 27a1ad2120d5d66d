use bridge_primitives::{
    record_digest, Address, CanonicalizationError, Canonicalizer, SlotId, B256, U256,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checkpoint::Period;
use crate::deposits::Deposit;
use crate::governance::{GovernanceParams, ParamChange};
use crate::registry::ColorEntry;
use crate::slots::Bid;

/// Reward paid out together with a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPayment {
    /// Signer the reward was paid to.
    pub beneficiary: Address,
    /// Amount paid.
    pub amount: U256,
}

/// A state change accepted by the ledger.
///
/// Replaying the events of a journal in order rebuilds the ledger without
/// touching any external backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Initial parameters. Always the first record.
    Genesis {
        /// Parameters at genesis.
        params: GovernanceParams,
    },
    /// Asset received a color.
    TokenRegistered {
        /// New registry entry.
        entry: ColorEntry,
    },
    /// Deposit accepted.
    Deposited {
        /// The deposit, including its id.
        deposit: Deposit,
    },
    /// Slot owner installed by a privileged caller.
    SlotAssigned {
        /// Slot assigned.
        slot_id: SlotId,
        /// New owner.
        owner: Address,
        /// New signer.
        signer: Address,
    },
    /// Spendable auction stake credited to an account.
    StakeFunded {
        /// Account credited.
        account: Address,
        /// Amount credited.
        amount: U256,
    },
    /// Bid recorded for a slot.
    BidPlaced {
        /// Slot bid on.
        slot_id: SlotId,
        /// The bid.
        bid: Bid,
    },
    /// Pending bid took over its slot.
    SlotActivated {
        /// Slot taken over.
        slot_id: SlotId,
        /// Epoch in which activation happened.
        epoch: u64,
    },
    /// Period accepted.
    PeriodSubmitted {
        /// The period.
        period: Period,
        /// Tip after the period.
        tip: B256,
        /// Reward accrued into the slot by this period.
        accrued: U256,
        /// Payout made with the period, if any.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        reward: Option<RewardPayment>,
    },
    /// Governance parameter changed.
    ParamChanged {
        /// The change.
        change: ParamChange,
    },
}

impl LedgerEvent {
    /// Stable name of the event kind, as written in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEvent::Genesis { .. } => "genesis",
            LedgerEvent::TokenRegistered { .. } => "token_registered",
            LedgerEvent::Deposited { .. } => "deposited",
            LedgerEvent::SlotAssigned { .. } => "slot_assigned",
            LedgerEvent::StakeFunded { .. } => "stake_funded",
            LedgerEvent::BidPlaced { .. } => "bid_placed",
            LedgerEvent::SlotActivated { .. } => "slot_activated",
            LedgerEvent::PeriodSubmitted { .. } => "period_submitted",
            LedgerEvent::ParamChanged { .. } => "param_changed",
        }
    }

    /// Slot the event concerns, if any.
    pub fn slot_id(&self) -> Option<SlotId> {
        match self {
            LedgerEvent::SlotAssigned { slot_id, .. }
            | LedgerEvent::BidPlaced { slot_id, .. }
            | LedgerEvent::SlotActivated { slot_id, .. } => Some(*slot_id),
            LedgerEvent::PeriodSubmitted { period, .. } => Some(period.submitted_by),
            _ => None,
        }
    }
}

/// Error sealing or verifying a record.
#[derive(thiserror::Error, Debug)]
pub enum EnvelopeError {
    /// Record could not be converted to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// A journaled event chained to its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEnvelope {
    /// Position in the journal, starting at 0.
    pub seq: u64,
    /// Height of the call that produced the event.
    pub height: u64,
    /// Digest of the previous record; zero for the first.
    pub prev_digest: B256,
    /// The event.
    pub event: LedgerEvent,
    /// Digest over every other field.
    pub digest: B256,
}

impl RecordEnvelope {
    /// Builds a record and computes its digest.
    pub fn seal(
        seq: u64,
        height: u64,
        prev_digest: B256,
        event: LedgerEvent,
    ) -> Result<Self, EnvelopeError> {
        let mut envelope = Self {
            seq,
            height,
            prev_digest,
            event,
            digest: B256::ZERO,
        };
        envelope.digest = envelope.compute_digest()?;
        Ok(envelope)
    }

    /// Digest of the record as it currently stands.
    ///
    /// Formula: `sha256(b"bridge:record:v1\0" || canonical_bytes(record without digest))`
    pub fn compute_digest(&self) -> Result<B256, EnvelopeError> {
        let mut value =
            serde_json::to_value(self).map_err(|e| EnvelopeError::Serialization(e.to_string()))?;
        if let Value::Object(map) = &mut value {
            map.remove("digest");
        }
        let bytes = Canonicalizer::new().canonicalize(&value)?;
        Ok(record_digest(&bytes))
    }

    /// True when the stored digest matches the content.
    pub fn verify(&self) -> Result<bool, EnvelopeError> {
        Ok(self.compute_digest()? == self.digest)
    }
}
