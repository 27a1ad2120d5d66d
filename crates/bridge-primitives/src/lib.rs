//! Primitive types shared by every bridge ledger crate.
//!
//! Everything that participates in hashing or in the on-disk record format
//! lives here: the color namespace and its per-kind bands, slot identifiers,
//! the domain-separated hashes that chain periods and journal records, and the
//! canonical JSON encoder those record digests are computed over.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// Color namespace and asset kinds.
pub mod color;
/// Domain-separated digests for periods and records.
pub mod digest;
/// Slot identifiers.
pub mod identifiers;
/// Validation helpers used by primitive types.
pub mod validation;

pub use alloy_primitives::{Address, B256, U256};
pub use canonicalizer::{CanonicalizationError, Canonicalizer};
pub use color::{AssetKind, Color};
pub use digest::{period_tip, record_digest, tagged_hash, GENESIS_TIP};
pub use identifiers::SlotId;
pub use validation::ValidationError;
