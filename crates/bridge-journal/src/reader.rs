//! Journal reader implementation.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, FRAME_HEADER_SIZE, HEADER_SIZE};
use bridge_core::RecordEnvelope;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

/// Read mode for handling truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Strict mode: truncated frames are errors.
    Strict,
    /// Permissive mode: truncation is treated as end-of-file.
    Permissive,
}

/// Sequential reader over a `.brj` journal.
///
/// In [`ReadMode::Permissive`] a torn final frame ends the stream;
/// [`JournalReader::valid_len`] then reports where the last complete frame
/// ended so a writer can cut the tail off.
///
/// # Example
///
/// ```rust,no_run
/// use bridge_journal::{JournalReader, ReadMode};
///
/// let mut reader = JournalReader::open("ledger.brj", ReadMode::Strict)?;
/// while let Some(record) = reader.read_record()? {
///     println!("{} {}", record.seq, record.event.kind());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct JournalReader {
    file: BufReader<File>,
    mode: ReadMode,
    position: u64,
    file_len: u64,
    torn: bool,
}

impl JournalReader {
    /// Opens a journal and validates its header.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if the file cannot be opened or the header is
    /// missing or invalid.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        if file_len < HEADER_SIZE as u64 {
            return Err(JournalError::NotAJournal(file_len));
        }
        let mut file = BufReader::new(file);
        file.seek(io::SeekFrom::Start(0))?;
        let mut header = [0u8; HEADER_SIZE];
        file.read_exact(&mut header)?;
        JournalHeader::from_bytes(&header)?;
        Ok(Self {
            file,
            mode,
            position: HEADER_SIZE as u64,
            file_len,
            torn: false,
        })
    }

    /// Offset of the next frame.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Length of the file up to the end of the last complete frame read.
    pub fn valid_len(&self) -> u64 {
        self.position
    }

    /// True once a truncated frame has been met in permissive mode.
    pub fn is_torn(&self) -> bool {
        self.torn
    }

    fn truncated(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        match self.mode {
            ReadMode::Permissive => {
                self.torn = true;
                Ok(None)
            }
            ReadMode::Strict => Err(JournalError::TruncatedFrame {
                offset: self.position,
            }),
        }
    }

    /// Reads the next frame of any kind.
    ///
    /// Returns `Ok(None)` at end-of-file, or at a torn frame in permissive mode.
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        if self.torn || self.position >= self.file_len {
            return Ok(None);
        }
        if self.file_len - self.position < FRAME_HEADER_SIZE as u64 {
            return self.truncated();
        }
        let mut header = [0u8; FRAME_HEADER_SIZE];
        self.file.read_exact(&mut header)?;
        let frame = RecordFrame::from_bytes_at(&header, self.position)?;
        if self.file_len - self.position < frame.total_len() {
            return self.truncated();
        }
        let mut payload = vec![0u8; frame.len as usize];
        self.file.read_exact(&mut payload)?;
        self.position += frame.total_len();
        Ok(Some((frame.kind, payload)))
    }

    /// Reads the next ledger record, skipping frames of unknown kind.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if a frame is malformed, a payload does not
    /// decode as a record, or the file is truncated in strict mode.
    pub fn read_record(&mut self) -> Result<Option<RecordEnvelope>, JournalError> {
        loop {
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::LedgerRecord, payload)) => {
                    let text = std::str::from_utf8(&payload)?;
                    return Ok(Some(serde_json::from_str(text)?));
                }
                Some((FrameKind::Unknown(_), _)) => continue,
            }
        }
    }

    /// Reads every remaining record.
    pub fn read_all(&mut self) -> Result<Vec<RecordEnvelope>, JournalError> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }
        Ok(records)
    }
}

impl Iterator for JournalReader {
    type Item = Result<RecordEnvelope, JournalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}
