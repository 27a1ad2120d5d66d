//! Journal writer implementation.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, HEADER_SIZE};
use crate::reader::{JournalReader, ReadMode};
use bridge_core::RecordEnvelope;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{error, warn};

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create the file if it doesn't exist (default: true).
    pub create: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
        }
    }
}

/// Storage a [`JournalWriter`] appends to.
///
/// Implemented for [`File`]; other implementations exist for tests.
pub trait JournalFile: Read + Write + Seek {
    /// Current length of the underlying storage.
    fn file_len(&mut self) -> io::Result<u64>;
    /// Truncates or extends the storage to `len` bytes.
    fn set_len(&mut self, len: u64) -> io::Result<()>;
    /// Forces written data down to the device.
    fn sync_all(&mut self) -> io::Result<()>;
}

impl JournalFile for File {
    fn file_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }

    fn sync_all(&mut self) -> io::Result<()> {
        File::sync_all(self)
    }
}

/// Append-only writer for `.brj` journals.
///
/// Every append writes one complete frame and flushes it; with
/// [`WriteOptions::sync`] the file is also fsynced. A failed append is cut
/// back off the file. If that cut fails too, the writer refuses every later
/// append with [`JournalError::Poisoned`].
///
/// # Example
///
/// ```rust,no_run
/// use bridge_journal::{JournalWriter, WriteOptions};
///
/// let writer = JournalWriter::open("ledger.brj", WriteOptions::default())?;
/// writer.finish()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct JournalWriter<F: JournalFile = File> {
    file: F,
    sync: bool,
    poisoned: Option<u64>,
}

impl JournalWriter<File> {
    /// Opens a journal for appending, writing the header into an empty file.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if the file cannot be opened, or if it is
    /// non-empty and does not start with a valid header.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let file = OpenOptions::new()
            .create(options.create)
            .read(true)
            .write(true)
            .open(path)?;
        Self::from_file(file, &options)
    }

    /// Opens a journal after cutting off a torn final frame.
    ///
    /// Returns the writer and the number of bytes dropped.
    pub fn recover<P: AsRef<Path>>(
        path: P,
        options: WriteOptions,
    ) -> Result<(Self, u64), JournalError> {
        let path = path.as_ref();
        let exists = path.exists() && std::fs::metadata(path)?.len() > 0;
        if !exists {
            return Ok((Self::open(path, options)?, 0));
        }
        let valid = {
            let mut reader = JournalReader::open(path, ReadMode::Permissive)?;
            while reader.read_frame()?.is_some() {}
            reader.valid_len()
        };
        let total = std::fs::metadata(path)?.len();
        if total > valid {
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(valid)?;
            file.sync_all()?;
            warn!(path = %path.display(), dropped = total - valid, "truncated torn journal tail");
        }
        Ok((Self::open(path, options)?, total - valid))
    }
}

impl<F: JournalFile> JournalWriter<F> {
    /// Wraps already opened storage, writing the header if it is empty.
    pub fn from_file(mut file: F, options: &WriteOptions) -> Result<Self, JournalError> {
        let len = file.file_len()?;
        if len == 0 {
            file.write_all(&JournalHeader::new().to_bytes())?;
        } else if len < HEADER_SIZE as u64 {
            return Err(JournalError::NotAJournal(len));
        } else {
            let mut header = [0u8; HEADER_SIZE];
            file.seek(SeekFrom::Start(0))?;
            file.read_exact(&mut header)?;
            JournalHeader::from_bytes(&header)?;
            file.seek(SeekFrom::End(0))?;
        }
        let mut writer = Self {
            file,
            sync: options.sync,
            poisoned: None,
        };
        writer.flush()?;
        Ok(writer)
    }

    fn flush(&mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Appends one sealed record.
    pub fn append_record(&mut self, record: &RecordEnvelope) -> Result<(), JournalError> {
        let payload = serde_json::to_vec(record)?;
        self.append_raw(FrameKind::LedgerRecord, &payload)
    }

    /// Appends a frame with the given kind and payload.
    ///
    /// On error the file is left as it was before the call.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        if let Some(offset) = self.poisoned {
            return Err(JournalError::Poisoned { offset });
        }
        let frame = RecordFrame::new(kind, payload.len())?;
        let mut bytes = Vec::with_capacity(frame.total_len() as usize);
        bytes.extend_from_slice(&frame.to_bytes());
        bytes.extend_from_slice(payload);
        let start = self.file.stream_position()?;
        if let Err(err) = self.write_frame(&bytes) {
            self.roll_back(start);
            return Err(err);
        }
        Ok(())
    }

    fn write_frame(&mut self, bytes: &[u8]) -> Result<(), JournalError> {
        self.file.write_all(bytes)?;
        self.flush()
    }

    fn roll_back(&mut self, start: u64) {
        let restored = self
            .file
            .set_len(start)
            .and_then(|()| self.file.seek(SeekFrom::Start(start)))
            .and_then(|_| self.file.sync_all());
        match restored {
            Ok(()) => warn!(offset = start, "rolled back failed journal append"),
            Err(err) => {
                error!(offset = start, %err, "could not roll back failed journal append");
                self.poisoned = Some(start);
            }
        }
    }

    /// Flushes and closes the journal.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.flush()
    }
}

impl<F: JournalFile> Drop for JournalWriter<F> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::{CallContext, GovernanceParams, Ledger, MemorySink};
    use bridge_primitives::{Address, AssetKind};
    use std::io::Cursor;

    const GATEWAY: Address = Address::repeat_byte(0x99);

    /// In-memory journal that can be told to fail writes or truncation.
    #[derive(Debug, Default)]
    struct FlakyFile {
        data: Cursor<Vec<u8>>,
        write_budget: Option<usize>,
        fail_truncate: bool,
    }

    impl Read for FlakyFile {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.data.read(buf)
        }
    }

    impl Write for FlakyFile {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            match self.write_budget {
                Some(0) => Err(io::Error::new(io::ErrorKind::Other, "disk full")),
                Some(budget) => {
                    let n = budget.min(buf.len());
                    self.write_budget = Some(budget - n);
                    self.data.write(&buf[..n])
                }
                None => self.data.write(buf),
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for FlakyFile {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.data.seek(pos)
        }
    }

    impl JournalFile for FlakyFile {
        fn file_len(&mut self) -> io::Result<u64> {
            Ok(self.data.get_ref().len() as u64)
        }

        fn set_len(&mut self, len: u64) -> io::Result<()> {
            if self.fail_truncate {
                return Err(io::Error::new(io::ErrorKind::Other, "read-only"));
            }
            self.data.get_mut().resize(len as usize, 0);
            Ok(())
        }

        fn sync_all(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn records() -> Vec<RecordEnvelope> {
        let mut ledger =
            Ledger::genesis(GovernanceParams::new(GATEWAY), MemorySink::new()).unwrap();
        let ctx = CallContext::new(GATEWAY, 0);
        ledger
            .register_token(&ctx, Address::repeat_byte(1), AssetKind::Fungible)
            .unwrap();
        ledger
            .register_token(&ctx, Address::repeat_byte(2), AssetKind::Fungible)
            .unwrap();
        ledger.into_sink().into_records()
    }

    fn bytes_of(writer: &JournalWriter<FlakyFile>) -> Vec<u8> {
        writer.file.data.get_ref().clone()
    }

    #[test]
    fn short_write_is_rolled_back() {
        let records = records();
        let mut writer = JournalWriter::from_file(FlakyFile::default(), &WriteOptions::default())
            .unwrap();
        writer.append_record(&records[0]).unwrap();
        let before = bytes_of(&writer);

        writer.file.write_budget = Some(5);
        assert!(matches!(
            writer.append_record(&records[1]),
            Err(JournalError::Io(_))
        ));
        assert_eq!(bytes_of(&writer), before);

        writer.file.write_budget = None;
        writer.append_record(&records[1]).unwrap();
        writer.append_record(&records[2]).unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ledger.brj");
        std::fs::write(&path, bytes_of(&writer)).unwrap();
        let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
        assert_eq!(reader.read_all().unwrap(), records);
    }

    #[test]
    fn failed_roll_back_poisons_writer() {
        let records = records();
        let mut writer = JournalWriter::from_file(FlakyFile::default(), &WriteOptions::default())
            .unwrap();
        writer.append_record(&records[0]).unwrap();

        writer.file.write_budget = Some(3);
        writer.file.fail_truncate = true;
        assert!(writer.append_record(&records[1]).is_err());

        writer.file.write_budget = None;
        writer.file.fail_truncate = false;
        assert!(matches!(
            writer.append_record(&records[1]),
            Err(JournalError::Poisoned { offset }) if offset > HEADER_SIZE as u64
        ));
    }
}
