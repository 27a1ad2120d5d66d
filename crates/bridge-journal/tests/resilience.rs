use bridge_core::{CallContext, GovernanceParams, Ledger, MemorySink, RecordEnvelope};
use bridge_journal::frame::MAX_PAYLOAD_SIZE;
use bridge_journal::{
    ChainVerifier, FrameKind, JournalError, JournalReader, JournalWriter, ReadMode, Verdict,
    WriteOptions,
};
use bridge_primitives::{Address, AssetKind};
use std::fs;
use std::io::{Seek, SeekFrom, Write};
use tempfile::TempDir;

const GATEWAY: Address = Address::repeat_byte(0x99);

fn make_records() -> Vec<RecordEnvelope> {
    let mut ledger = Ledger::genesis(GovernanceParams::new(GATEWAY), MemorySink::new()).unwrap();
    let ctx = CallContext::new(GATEWAY, 0);
    ledger
        .register_token(&ctx, Address::repeat_byte(1), AssetKind::Fungible)
        .unwrap();
    ledger
        .register_token(&ctx, Address::repeat_byte(2), AssetKind::NonFungible)
        .unwrap();
    ledger.into_sink().into_records()
}

fn write_journal(path: &std::path::Path, records: &[RecordEnvelope]) {
    let mut writer = JournalWriter::open(path, WriteOptions::default()).unwrap();
    for record in records {
        writer.append_record(record).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn test_payload_size_limit() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.brj");
    let oversized = vec![0u8; MAX_PAYLOAD_SIZE as usize + 1];

    let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
    match writer.append_raw(FrameKind::LedgerRecord, &oversized) {
        Err(JournalError::PayloadTooLarge { size, max }) => {
            assert_eq!(size, MAX_PAYLOAD_SIZE as usize + 1);
            assert_eq!(max, MAX_PAYLOAD_SIZE);
        }
        other => panic!("expected PayloadTooLarge, got {:?}", other.map(|_| ())),
    }
    writer.finish().unwrap();
    assert_eq!(fs::metadata(&journal_path).unwrap().len(), 16);
}

#[test]
fn test_reserved_bytes_must_be_zero() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.brj");
    write_journal(&journal_path, &make_records());

    let mut file = fs::OpenOptions::new()
        .write(true)
        .open(&journal_path)
        .unwrap();
    file.seek(SeekFrom::Start(16 + 1)).unwrap();
    file.write_all(&[0x01]).unwrap();
    drop(file);

    let mut reader = JournalReader::open(&journal_path, ReadMode::Permissive).unwrap();
    assert!(matches!(
        reader.read_frame(),
        Err(JournalError::InvalidFrame { offset: 16, .. })
    ));
}

#[test]
fn test_torn_tail_is_recovered() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.brj");
    let records = make_records();
    write_journal(&journal_path, &records[..2]);

    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    reader.read_all().unwrap();
    let complete = reader.valid_len();
    drop(reader);

    // half of the third frame reaches the disk
    {
        let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
        writer.append_record(&records[2]).unwrap();
    }
    let full = fs::metadata(&journal_path).unwrap().len();
    let file = fs::OpenOptions::new()
        .write(true)
        .open(&journal_path)
        .unwrap();
    file.set_len(complete + (full - complete) / 2).unwrap();
    drop(file);

    let mut strict = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert_eq!(strict.read_record().unwrap().unwrap(), records[0]);
    assert_eq!(strict.read_record().unwrap().unwrap(), records[1]);
    assert!(matches!(
        strict.read_record(),
        Err(JournalError::TruncatedFrame { .. })
    ));

    let (mut writer, dropped) =
        JournalWriter::recover(&journal_path, WriteOptions::default()).unwrap();
    assert_eq!(dropped, (full - complete) / 2);
    writer.append_record(&records[2]).unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_all().unwrap(), records);
}

#[test]
fn test_recover_on_clean_or_missing_journal() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.brj");
    let (writer, dropped) = JournalWriter::recover(&journal_path, WriteOptions::default()).unwrap();
    assert_eq!(dropped, 0);
    writer.finish().unwrap();

    write_journal(&journal_path, &make_records());
    let before = fs::metadata(&journal_path).unwrap().len();
    let (_, dropped) = JournalWriter::recover(&journal_path, WriteOptions::default()).unwrap();
    assert_eq!(dropped, 0);
    assert_eq!(fs::metadata(&journal_path).unwrap().len(), before);
}

#[test]
fn test_unknown_frame_kind_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.brj");
    let records = make_records();
    {
        let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
        writer.append_record(&records[0]).unwrap();
        writer
            .append_raw(FrameKind::Unknown(0xff), b"unknown123")
            .unwrap();
        writer.append_record(&records[1]).unwrap();
        writer.finish().unwrap();
    }

    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_all().unwrap(), records[..2].to_vec());
}

#[test]
fn test_flipped_byte_is_detected() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.brj");
    let records = make_records();
    write_journal(&journal_path, &records);

    // flip one hex digit inside the second record's asset address
    let mut bytes = fs::read(&journal_path).unwrap();
    let needle = b"0x0101010101";
    let at = bytes
        .windows(needle.len())
        .position(|w| w == needle)
        .unwrap();
    bytes[at + 2] = b'2';
    fs::write(&journal_path, &bytes).unwrap();

    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    let read = reader.read_all().unwrap();
    let verdicts = ChainVerifier::check_all(&read);
    let bad: Vec<_> = verdicts
        .iter()
        .filter(|v| v.verdict != Verdict::Ok)
        .map(|v| (v.seq, v.verdict))
        .collect();
    assert_eq!(bad, vec![(1, Verdict::DigestMismatch)]);
}
