//! Domain-separated SHA-256 digests.
//!
//! Every digest is `sha256(domain_separator || parts...)`. Integers are fed
//! in little-endian order.

use crate::identifiers::SlotId;
use alloy_primitives::B256;
use sha2::{Digest as Sha2Digest, Sha256};

/// Tip of the chain before any period has been accepted.
pub const GENESIS_TIP: B256 = B256::ZERO;

/// Domain separator for period tips: `b"bridge:period:v1\0"`.
const PERIOD_DOMAIN_SEPARATOR: &[u8] = b"bridge:period:v1\0";

/// Domain separator for journal records: `b"bridge:record:v1\0"`.
const RECORD_DOMAIN_SEPARATOR: &[u8] = b"bridge:record:v1\0";

/// Hashes `parts` under the given domain separator.
pub fn tagged_hash(domain: &[u8], parts: &[&[u8]]) -> B256 {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    for part in parts {
        hasher.update(part);
    }
    let bytes: [u8; 32] = hasher.finalize().into();
    B256::from(bytes)
}

/// Computes the tip that results from accepting a period.
///
/// Formula: `sha256(b"bridge:period:v1\0" || index_le || parent || root || slot_le)`
pub fn period_tip(period_index: u64, parent_tip: &B256, merkle_root: &B256, slot: SlotId) -> B256 {
    tagged_hash(
        PERIOD_DOMAIN_SEPARATOR,
        &[
            &period_index.to_le_bytes(),
            parent_tip.as_slice(),
            merkle_root.as_slice(),
            &slot.to_le_bytes(),
        ],
    )
}

/// Computes the digest of a journal record from its canonical bytes.
pub fn record_digest(canonical_bytes: &[u8]) -> B256 {
    tagged_hash(RECORD_DOMAIN_SEPARATOR, &[canonical_bytes])
}
