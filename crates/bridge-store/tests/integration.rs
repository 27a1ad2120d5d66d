use bridge_core::{CallContext, GovernanceParams, InMemoryAssets, LedgerError};
use bridge_primitives::{Address, AssetKind, B256, U256};
use bridge_store::{
    create_ledger, deposits_by, find_deposit, open_ledger, open_or_create, periods_by_slot,
    AndFilter, DepositorFilter, DurableLedger, EventKindFilter, FilteredReader,
    HeightRangeFilter, JournalBackendReader, JournalBackendWriter, MemoryReader, OrFilter,
    ReadMode, SlotFilter, StoreError, StoreReader, StoreWriter, WriteOptions,
};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const GATEWAY: Address = Address::repeat_byte(0x99);
const VAULT: Address = Address::repeat_byte(0xff);
const ALICE: Address = Address::repeat_byte(0xa1);
const BOB: Address = Address::repeat_byte(0xb0);
const VALIDATOR: Address = Address::repeat_byte(0x0a);
const COIN: Address = Address::repeat_byte(0xc1);

fn params() -> GovernanceParams {
    GovernanceParams {
        epoch_length: 10,
        slot_count: 4,
        ..GovernanceParams::new(GATEWAY)
    }
}

fn deposit(ledger: &mut DurableLedger, assets: &mut InMemoryAssets, who: Address, amount: u64) {
    let color = ledger.color_of(&COIN).unwrap();
    assets.mint(COIN, who, U256::from(amount));
    assets.approve(COIN, who, U256::from(amount));
    ledger
        .deposit(
            &CallContext::new(who, 2),
            assets,
            who,
            U256::from(amount),
            color,
        )
        .unwrap();
}

/// Genesis, one token, three deposits, one slot and two periods.
fn populate(path: &Path) -> DurableLedger {
    let mut ledger = create_ledger(path, params(), WriteOptions::default()).unwrap();
    let mut assets = InMemoryAssets::new(VAULT);
    ledger
        .register_token(&CallContext::new(GATEWAY, 1), COIN, AssetKind::Fungible)
        .unwrap();
    deposit(&mut ledger, &mut assets, ALICE, 300);
    deposit(&mut ledger, &mut assets, BOB, 50);
    deposit(&mut ledger, &mut assets, ALICE, 7);
    ledger
        .set_slot(&CallContext::new(GATEWAY, 3), 0, VALIDATOR, VALIDATOR)
        .unwrap();
    let tip = ledger.tip_hash();
    let tip = ledger
        .submit_period(
            &CallContext::new(VALIDATOR, 4),
            0,
            tip,
            B256::repeat_byte(1),
        )
        .unwrap();
    ledger
        .submit_period(
            &CallContext::new(VALIDATOR, 5),
            0,
            tip,
            B256::repeat_byte(2),
        )
        .unwrap();
    ledger
}

fn reader(path: &Path) -> JournalBackendReader {
    JournalBackendReader::open(path, ReadMode::Strict).unwrap()
}

#[test]
fn test_reopen_restores_state() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.brj");
    let ledger = populate(&path);
    let tip = ledger.tip_hash();
    let seq = ledger.next_seq();
    let deposits: Vec<_> = ledger.deposits().cloned().collect();
    let slots: Vec<_> = ledger.slots().cloned().collect();
    drop(ledger);

    let reopened = open_ledger(&path, WriteOptions::default()).unwrap();
    assert_eq!(reopened.tip_hash(), tip);
    assert_eq!(reopened.next_seq(), seq);
    assert_eq!(reopened.period_index(), 2);
    assert_eq!(reopened.deposits().cloned().collect::<Vec<_>>(), deposits);
    assert_eq!(reopened.slots().cloned().collect::<Vec<_>>(), slots);
    assert_eq!(reopened.params(), &params());
}

#[test]
fn test_escrow_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.brj");
    let mut ledger = populate(&path);
    let gateway = CallContext::new(GATEWAY, 5);
    ledger.fund_stake(&gateway, ALICE, U256::from(40)).unwrap();
    ledger.fund_stake(&gateway, BOB, U256::from(40)).unwrap();
    ledger
        .bid(&CallContext::new(ALICE, 5), 1, ALICE, U256::from(15))
        .unwrap();
    ledger.advance(10).unwrap();
    drop(ledger);

    let mut ledger = open_ledger(&path, WriteOptions::default()).unwrap();
    assert_eq!(ledger.slot(1).unwrap().owner, ALICE);
    assert_eq!(ledger.settlement().escrowed(ALICE), U256::from(15));
    assert_eq!(ledger.settlement().available(ALICE), U256::from(25));

    ledger
        .bid(&CallContext::new(BOB, 10), 1, BOB, U256::from(16))
        .unwrap();
    ledger.advance(20).unwrap();
    drop(ledger);

    let ledger = open_ledger(&path, WriteOptions::default()).unwrap();
    assert_eq!(ledger.slot(1).unwrap().owner, BOB);
    assert_eq!(ledger.settlement().available(ALICE), U256::from(40));
    assert_eq!(ledger.settlement().escrowed(BOB), U256::from(16));
}

#[test]
fn test_appends_continue_after_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.brj");
    drop(populate(&path));

    let mut ledger = open_ledger(&path, WriteOptions::default()).unwrap();
    let tip = ledger.tip_hash();
    ledger
        .submit_period(&CallContext::new(VALIDATOR, 6), 0, tip, B256::repeat_byte(3))
        .unwrap();
    let tip = ledger.tip_hash();
    drop(ledger);

    let ledger = open_ledger(&path, WriteOptions::default()).unwrap();
    assert_eq!(ledger.tip_hash(), tip);
    assert_eq!(ledger.period_index(), 3);
}

#[test]
fn test_create_and_open_guards() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.brj");

    assert!(matches!(
        open_ledger(&path, WriteOptions::default()),
        Err(StoreError::NoLedger(_))
    ));

    drop(create_ledger(&path, params(), WriteOptions::default()).unwrap());
    assert!(matches!(
        create_ledger(&path, params(), WriteOptions::default()),
        Err(StoreError::AlreadyInitialized(_))
    ));

    let ledger = open_or_create(&path, params(), WriteOptions::default()).unwrap();
    assert_eq!(ledger.next_seq(), 1);
}

#[test]
fn test_empty_journal_is_no_ledger() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.brj");
    JournalBackendWriter::open(&path, WriteOptions::default())
        .unwrap()
        .finish()
        .unwrap();
    assert!(matches!(
        open_ledger(&path, WriteOptions::default()),
        Err(StoreError::NoLedger(_))
    ));
    let ledger = open_or_create(&path, params(), WriteOptions::default()).unwrap();
    assert_eq!(ledger.gateway(), GATEWAY);
}

#[test]
fn test_torn_tail_dropped_on_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.brj");
    let ledger = populate(&path);
    let tip = ledger.tip_hash();
    drop(ledger);
    let clean_len = fs::metadata(&path).unwrap().len();

    // frame header promising 255 bytes followed by a single byte
    let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[0x01, 0, 0, 0, 0xff, 0, 0, 0, b'{']).unwrap();
    drop(file);

    let mut ledger = open_ledger(&path, WriteOptions::default()).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), clean_len);
    assert_eq!(ledger.tip_hash(), tip);
    ledger
        .submit_period(&CallContext::new(VALIDATOR, 7), 0, tip, B256::repeat_byte(9))
        .unwrap();
    drop(ledger);

    let records = reader(&path).read_all().unwrap();
    assert_eq!(records.last().unwrap().event.kind(), "period_submitted");
    assert_eq!(open_ledger(&path, WriteOptions::default()).unwrap().period_index(), 3);
}

#[test]
fn test_tampered_record_fails_replay() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.brj");
    drop(populate(&path));

    let mut records = reader(&path).read_all().unwrap();
    records[2].height += 1;
    let forged = temp_dir.path().join("forged.brj");
    let mut writer = JournalBackendWriter::open(&forged, WriteOptions::default()).unwrap();
    for record in &records {
        writer.append(record).unwrap();
    }
    writer.finish().unwrap();

    match open_ledger(&forged, WriteOptions::default()) {
        Err(StoreError::Ledger(LedgerError::CorruptRecord { seq, .. })) => assert_eq!(seq, 2),
        other => panic!("expected corrupt record, got {:?}", other.map(|l| l.next_seq())),
    }
}

#[test]
fn test_views() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.brj");
    drop(populate(&path));

    let alice = deposits_by(&mut reader(&path), ALICE).unwrap();
    assert_eq!(
        alice.iter().map(|d| d.deposit_id).collect::<Vec<_>>(),
        vec![0, 2]
    );
    assert_eq!(alice[0].value, U256::from(300));

    let periods = periods_by_slot(&mut reader(&path), 0).unwrap();
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[1].parent_tip, periods[0].tip());
    assert!(periods_by_slot(&mut reader(&path), 1).unwrap().is_empty());

    let bob = find_deposit(&mut reader(&path), 1).unwrap().unwrap();
    assert_eq!(bob.depositor, BOB);
    assert!(find_deposit(&mut reader(&path), 99).unwrap().is_none());
}

#[test]
fn test_filtered_reader() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.brj");
    drop(populate(&path));

    let kind = EventKindFilter {
        kind: "deposited".to_string(),
    };
    let deposits = FilteredReader::new(reader(&path), kind).read_all().unwrap();
    assert_eq!(deposits.len(), 3);

    let bob_or_slot = OrFilter {
        filters: vec![
            Box::new(DepositorFilter { depositor: BOB }),
            Box::new(SlotFilter { slot_id: 0 }),
        ],
    };
    let kinds: Vec<_> = FilteredReader::new(reader(&path), bob_or_slot)
        .read_all()
        .unwrap()
        .iter()
        .map(|r| r.event.kind())
        .collect();
    assert_eq!(
        kinds,
        vec!["deposited", "slot_assigned", "period_submitted", "period_submitted"]
    );

    let late_periods = AndFilter {
        filters: vec![
            Box::new(EventKindFilter {
                kind: "period_submitted".to_string(),
            }),
            Box::new(HeightRangeFilter {
                from: Some(5),
                to: None,
            }),
        ],
    };
    let records = reader(&path).read_all().unwrap();
    let late = FilteredReader::new(MemoryReader::new(records), late_periods)
        .read_all()
        .unwrap();
    assert_eq!(late.len(), 1);
    assert_eq!(late[0].height, 5);
}
