//! State machine of the side-chain bridge ledger.
//!
//! This crate provides:
//! - The color registry and the per-kind deposit ledger
//! - The validator slot table, its stake auction and the epoch scheduler
//! - The checkpoint log that advances the chain tip
//! - Governance parameters and caller checks
//! - Sealed, digest-chained records of every accepted operation
//!
//! Core invariants:
//! - One [`Ledger`] value owns all state and is mutated through `&mut self`
//! - A failed call leaves the ledger exactly as it was
//! - Record digests are `H(domain_separator || canonical_bytes(record))` and
//!   chain each record to its predecessor
//! - Replaying the records rebuilds the same state without external calls
//!
#![deny(missing_docs)]

/// External asset backend and its in-memory implementation.
pub mod assets;
/// Checkpoint log and periods.
pub mod checkpoint;
/// Caller identity and height of an operation.
pub mod context;
/// Deposit table.
pub mod deposits;
/// Epoch scheduler.
pub mod epoch;
/// Error types for ledger operations.
pub mod errors;
/// Ledger events and sealed record envelopes.
pub mod events;
/// Governance parameters.
pub mod governance;
/// The ledger state machine.
pub mod ledger;
/// Color registry.
pub mod registry;
/// Stake settlement policy for the slot auction.
pub mod settlement;
/// Record sinks.
pub mod sink;
/// Validator slot table.
pub mod slots;

pub use assets::{AssetBackend, InMemoryAssets, TransferError};
pub use checkpoint::{AwaitingPeriod, CheckpointLog, Period};
pub use context::CallContext;
pub use deposits::{Deposit, DepositLedger};
pub use epoch::EpochScheduler;
pub use errors::{LedgerError, SinkError};
pub use events::{EnvelopeError, LedgerEvent, RecordEnvelope, RewardPayment};
pub use governance::{GovernanceParams, ParamChange};
pub use ledger::Ledger;
pub use registry::{parse_kind, ColorEntry, ColorRegistry};
pub use settlement::{EscrowBook, SettlementError, StakeSettlement};
pub use sink::{EventSink, MemorySink};
pub use slots::{Bid, Slot, SlotTable, Takeover};
