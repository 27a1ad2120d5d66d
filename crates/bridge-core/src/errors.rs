use bridge_primitives::{Address, AssetKind, Color, SlotId, B256, U256};
use thiserror::Error;

use crate::settlement::SettlementError;

/// Boxed error returned by event sinks.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by ledger operations.
///
/// Every variant is a local failure of a single call; the ledger state is
/// unchanged when one of them is returned.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Asset address already has a color.
    #[error("asset {0} is already registered")]
    AlreadyRegistered(Address),
    /// Asset kind code is not recognized.
    #[error("unknown asset kind code {0}")]
    InvalidKind(u8),
    /// Every color of the kind's band has been handed out.
    #[error("color range for {kind} exhausted after {allocated} registrations")]
    ColorRangeExhausted {
        /// Kind whose band is full.
        kind: AssetKind,
        /// Number of colors already allocated.
        allocated: u32,
    },
    /// Color is not registered.
    #[error("unknown color {0}")]
    UnknownColor(Color),
    /// Deposit argument does not fit the registered asset kind.
    #[error("color {color} is registered as {registered}: {reason}")]
    ColorKindMismatch {
        /// Color of the deposit.
        color: Color,
        /// Kind registered for the color.
        registered: AssetKind,
        /// What the asset backend reported.
        reason: String,
    },
    /// Fungible deposit of zero units.
    #[error("fungible deposit of zero units for color {0}")]
    ZeroAmount(Color),
    /// External asset transfer failed.
    #[error("asset transfer rejected: {0}")]
    TransferRejected(String),
    /// Deposit id is not known.
    #[error("unknown deposit {0}")]
    UnknownDeposit(u64),
    /// Token data requested for a deposit that has none.
    #[error("deposit {deposit_id} is {kind}; token data only exists for storage-bearing deposits")]
    NotApplicable {
        /// Deposit queried.
        deposit_id: u64,
        /// Kind of the deposited asset.
        kind: AssetKind,
    },
    /// Slot id is outside the slot table.
    #[error("slot {slot_id} out of range (slot count {slot_count})")]
    InvalidSlot {
        /// Slot requested.
        slot_id: SlotId,
        /// Number of slots in the table.
        slot_count: u16,
    },
    /// Slot has no owner or signer.
    #[error("slot {0} has no owner")]
    EmptySlot(SlotId),
    /// Caller may not submit for this slot now.
    #[error("caller {caller} may not submit for slot {slot_id}; scheduled slot is {scheduled}")]
    NotAuthorizedSlot {
        /// Slot named by the caller.
        slot_id: SlotId,
        /// Caller address.
        caller: Address,
        /// Slot the epoch scheduler authorizes at the call height.
        scheduled: SlotId,
    },
    /// Submitted parent does not match the current tip.
    #[error("wrong parent tip: expected {expected}, got {got}")]
    WrongParent {
        /// Current tip.
        expected: B256,
        /// Parent named by the submission.
        got: B256,
    },
    /// Privileged entry point called by a non-privileged identity.
    #[error("caller {caller} is not permitted to call {entry_point}")]
    Unauthorized {
        /// Caller address.
        caller: Address,
        /// Entry point name.
        entry_point: &'static str,
    },
    /// Epoch length of zero.
    #[error("epoch length must be non-zero")]
    InvalidEpochLength,
    /// Slot count of zero at genesis.
    #[error("slot count must be non-zero")]
    InvalidSlotCount,
    /// Bid does not outbid the current stake or pending bid.
    #[error("bid of {offered} for slot {slot_id} does not exceed {required}")]
    BidTooLow {
        /// Slot bid on.
        slot_id: SlotId,
        /// Stake offered.
        offered: U256,
        /// Stake that must be exceeded.
        required: U256,
    },
    /// Period submitted before the parent-block interval elapsed.
    #[error("period submitted at height {height}; next allowed at {next_allowed}")]
    TooEarly {
        /// Height of the submission.
        height: u64,
        /// First height at which a period is accepted.
        next_allowed: u64,
    },
    /// Call height is below a height already recorded.
    #[error("call height {height} is below the last recorded height {last_height}")]
    HeightRegressed {
        /// Height of the call.
        height: u64,
        /// Highest height in the journal.
        last_height: u64,
    },
    /// Stake settlement policy refused the operation.
    #[error("stake settlement failed: {0}")]
    Settlement(#[from] SettlementError),
    /// Record could not be sealed or persisted.
    #[error("storage error: {0}")]
    Storage(#[source] SinkError),
    /// Persisted record is inconsistent with the replayed state.
    #[error("corrupt record {seq}: {reason}")]
    CorruptRecord {
        /// Sequence number of the record.
        seq: u64,
        /// What was inconsistent.
        reason: String,
    },
}
