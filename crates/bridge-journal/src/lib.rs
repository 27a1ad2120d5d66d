//! Append-only journal format for sealed bridge ledger records.
//!
//! This crate provides:
//! - Framed, append-only storage of record JSON (`.brj` files)
//! - Reader/writer APIs with strict and permissive modes
//! - Recovery that cuts off a torn final frame
//! - Digest-chain verification of stored records
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bridge_core::{GovernanceParams, Ledger, MemorySink};
//! use bridge_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
//! use bridge_primitives::Address;
//!
//! let ledger = Ledger::genesis(GovernanceParams::new(Address::ZERO), MemorySink::new())?;
//!
//! let mut writer = JournalWriter::open("ledger.brj", WriteOptions::default())?;
//! for record in ledger.sink().records() {
//!     writer.append_record(record)?;
//! }
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open("ledger.brj", ReadMode::Strict)?;
//! while let Some(record) = reader.read_record()? {
//!     println!("{} {}", record.seq, record.digest);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Key Types
//!
//! - [`JournalWriter`] - Append records to journal files
//! - [`JournalReader`] - Read records from journal files
//! - [`ChainVerifier`] - Check record digests and links

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Frame structure and serialization.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
/// Verification helpers for journaled records.
pub mod verification;
/// Journal writer implementation.
pub mod writer;

pub use errors::JournalError;
pub use frame::{FrameKind, JournalHeader, RecordFrame};
pub use reader::{JournalReader, ReadMode};
pub use verification::{verify_record, ChainVerifier, RecordVerdict, Verdict};
pub use writer::{JournalFile, JournalWriter, WriteOptions};
