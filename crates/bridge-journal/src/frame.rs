//! On-disk layout: a 16-byte file header followed by length-prefixed frames.
//!
//! ```text
//! header: magic "BRJ1" | version u16 LE | flags u16 LE (0) | reserved [0; 8]
//! frame:  kind u8 | reserved [0; 3] | len u32 LE | payload[len]
//! ```

use crate::errors::JournalError;

/// Journal file magic bytes: `b"BRJ1"`.
pub const MAGIC: &[u8; 4] = b"BRJ1";

/// Current journal format version: `0x0001`.
pub const VERSION: u16 = 0x0001;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Largest payload a frame may carry: 16 MiB.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// Frame kind byte of a ledger record.
pub const FRAME_KIND_LEDGER_RECORD: u8 = 0x01;

/// Journal file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalHeader {
    /// Format version.
    pub version: u16,
}

impl JournalHeader {
    /// Header for the current format version.
    pub fn new() -> Self {
        Self { version: VERSION }
    }

    /// Serializes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(MAGIC);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes
    }

    /// Parses and validates a header.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, JournalError> {
        let bytes: &[u8; HEADER_SIZE] = bytes
            .get(..HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                JournalError::InvalidHeader(format!("header too short: {} bytes", bytes.len()))
            })?;

        if &bytes[0..4] != MAGIC {
            return Err(JournalError::InvalidHeader(format!(
                "invalid magic: {:?}, expected {:?}",
                &bytes[0..4],
                MAGIC
            )));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(JournalError::InvalidHeader(format!(
                "unsupported version: 0x{:04x}, expected 0x{:04x}",
                version, VERSION
            )));
        }
        let flags = u16::from_le_bytes([bytes[6], bytes[7]]);
        if flags != 0 {
            return Err(JournalError::InvalidHeader(format!(
                "non-zero flags: 0x{:04x}",
                flags
            )));
        }
        if bytes[8..16].iter().any(|b| *b != 0) {
            return Err(JournalError::InvalidHeader(
                "non-zero reserved bytes".to_string(),
            ));
        }
        Ok(Self { version })
    }
}

impl Default for JournalHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Record frame kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// UTF-8 JSON of one sealed ledger record.
    LedgerRecord,
    /// Kind this version does not understand; readers skip it.
    Unknown(u8),
}

impl FrameKind {
    /// Kind for a byte value.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            FRAME_KIND_LEDGER_RECORD => FrameKind::LedgerRecord,
            _ => FrameKind::Unknown(byte),
        }
    }

    /// Byte value of this kind.
    pub fn to_byte(self) -> u8 {
        match self {
            FrameKind::LedgerRecord => FRAME_KIND_LEDGER_RECORD,
            FrameKind::Unknown(b) => b,
        }
    }
}

/// Frame header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFrame {
    /// Frame kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
}

impl RecordFrame {
    /// Frame header for a payload of `len` bytes.
    pub fn new(kind: FrameKind, len: usize) -> Result<Self, JournalError> {
        let too_large = || JournalError::PayloadTooLarge {
            size: len,
            max: MAX_PAYLOAD_SIZE,
        };
        let wire_len = u32::try_from(len).map_err(|_| too_large())?;
        if wire_len > MAX_PAYLOAD_SIZE {
            return Err(too_large());
        }
        Ok(Self {
            kind,
            len: wire_len,
        })
    }

    /// Serializes the frame header.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut bytes = [0u8; FRAME_HEADER_SIZE];
        bytes[0] = self.kind.to_byte();
        bytes[4..8].copy_from_slice(&self.len.to_le_bytes());
        bytes
    }

    /// Parses a frame header that starts at byte `offset` of the file.
    pub fn from_bytes_at(bytes: &[u8; FRAME_HEADER_SIZE], offset: u64) -> Result<Self, JournalError> {
        if bytes[1..4] != [0u8; 3] {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: "non-zero reserved bytes".to_string(),
            });
        }
        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if len > MAX_PAYLOAD_SIZE {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: format!("payload size {} exceeds maximum {}", len, MAX_PAYLOAD_SIZE),
            });
        }
        Ok(Self {
            kind: FrameKind::from_byte(bytes[0]),
            len,
        })
    }

    /// Bytes the frame occupies on disk, header included.
    pub fn total_len(&self) -> u64 {
        FRAME_HEADER_SIZE as u64 + u64::from(self.len)
    }
}
