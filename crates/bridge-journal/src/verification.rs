//! Digest-chain verification for journaled records.

use bridge_core::RecordEnvelope;
use bridge_primitives::B256;
use std::fmt;

/// Outcome of checking a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Digest matches and the record links to its predecessor.
    Ok,
    /// Stored digest does not match the record content.
    DigestMismatch,
    /// `prev_digest` is not the digest of the previous record.
    BrokenLink,
    /// Sequence number is not one past the previous record.
    OutOfSequence,
    /// Record could not be canonicalized.
    Invalid,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Ok => "ok",
            Verdict::DigestMismatch => "digest-mismatch",
            Verdict::BrokenLink => "broken-link",
            Verdict::OutOfSequence => "out-of-sequence",
            Verdict::Invalid => "invalid",
        };
        f.write_str(text)
    }
}

/// Verdict for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordVerdict {
    /// Sequence number stored in the record.
    pub seq: u64,
    /// Event kind of the record.
    pub kind: &'static str,
    /// Result of the check.
    pub verdict: Verdict,
}

/// Checks a record's digest against its content.
pub fn verify_record(record: &RecordEnvelope) -> Verdict {
    match record.verify() {
        Ok(true) => Verdict::Ok,
        Ok(false) => Verdict::DigestMismatch,
        Err(_) => Verdict::Invalid,
    }
}

/// Walks a record sequence and checks digests and chaining.
///
/// Links are checked against the stored digest of the previous record, so a
/// single tampered record is reported once rather than poisoning the rest.
#[derive(Debug, Clone)]
pub struct ChainVerifier {
    expected_seq: u64,
    prev_digest: B256,
}

impl Default for ChainVerifier {
    fn default() -> Self {
        Self {
            expected_seq: 0,
            prev_digest: B256::ZERO,
        }
    }
}

impl ChainVerifier {
    /// Verifier expecting a journal that starts at sequence 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the next record.
    pub fn check(&mut self, record: &RecordEnvelope) -> RecordVerdict {
        let verdict = if record.seq != self.expected_seq {
            Verdict::OutOfSequence
        } else if record.prev_digest != self.prev_digest {
            Verdict::BrokenLink
        } else {
            verify_record(record)
        };
        self.expected_seq = record.seq.saturating_add(1);
        self.prev_digest = record.digest;
        RecordVerdict {
            seq: record.seq,
            kind: record.event.kind(),
            verdict,
        }
    }

    /// Checks every record and returns one verdict each.
    pub fn check_all<'a, I>(records: I) -> Vec<RecordVerdict>
    where
        I: IntoIterator<Item = &'a RecordEnvelope>,
    {
        let mut verifier = Self::new();
        records.into_iter().map(|r| verifier.check(r)).collect()
    }
}
