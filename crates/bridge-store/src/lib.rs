//! Pluggable storage backend abstraction for bridge ledger records.
//!
//! This crate provides:
//! - `StoreWriter` and `StoreReader` traits for append-only record storage
//! - Default journal-backed implementation using `bridge-journal`
//! - Record filtering API for selective iteration
//! - View helpers over deposits and periods
//! - Opening a durable ledger from its journal
//!
//! The journal backend is the reference implementation; other backends only
//! need to implement the two traits.

#![deny(missing_docs)]

/// Durable ledger opening and creation.
pub mod durable;
/// Error types for store operations.
pub mod error;
/// Record filtering API.
pub mod filter;
/// Journal-backed storage implementation.
pub mod journal;
/// Storage backend traits.
pub mod traits;
/// View API over stored records.
pub mod view;

pub use bridge_journal::{ReadMode, WriteOptions};
pub use durable::{create_ledger, open_ledger, open_or_create, DurableLedger};
pub use error::StoreError;
pub use filter::{
    AndFilter, DepositorFilter, EventKindFilter, FilteredReader, HeightRangeFilter, OrFilter,
    RecordFilter, SlotFilter,
};
pub use journal::{JournalBackendReader, JournalBackendWriter};
pub use traits::{MemoryReader, StoreReader, StoreWriter};
pub use view::{deposits_by, find_deposit, periods_by_slot};
