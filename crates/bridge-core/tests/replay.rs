use bridge_core::{
    CallContext, EventSink, GovernanceParams, InMemoryAssets, Ledger, LedgerError, LedgerEvent,
    MemorySink, ParamChange, RecordEnvelope, SinkError,
};
use bridge_primitives::{Address, AssetKind, B256, GENESIS_TIP, U256};

const GATEWAY: Address = Address::repeat_byte(0x99);
const VAULT: Address = Address::repeat_byte(0xff);
const ALICE: Address = Address::repeat_byte(0x01);
const VALIDATOR: Address = Address::repeat_byte(0x0a);
const COIN: Address = Address::repeat_byte(0xc1);
const STORAGE: Address = Address::repeat_byte(0xc3);

fn params() -> GovernanceParams {
    GovernanceParams {
        epoch_length: 4,
        slot_count: 2,
        period_reward: U256::from(2),
        ..GovernanceParams::new(GATEWAY)
    }
}

fn gateway(height: u64) -> CallContext {
    CallContext::new(GATEWAY, height)
}

/// Drives a ledger through every kind of record.
fn populated() -> Ledger<MemorySink> {
    let mut ledger = Ledger::genesis(params(), MemorySink::new()).unwrap();
    let mut assets = InMemoryAssets::new(VAULT);
    assets.mint(COIN, ALICE, U256::from(500));
    assets.approve(COIN, ALICE, U256::from(500));
    assets.mint_storage_token(STORAGE, ALICE, U256::from(9), B256::repeat_byte(0x5a));
    assets.approve_token(STORAGE, ALICE, U256::from(9));
    assets.fund_rewards(U256::from(100));

    let coin = ledger
        .register_token(&gateway(0), COIN, AssetKind::Fungible)
        .unwrap();
    let nst = ledger
        .register_token(&gateway(0), STORAGE, AssetKind::NonFungibleWithStorage)
        .unwrap();
    let alice = CallContext::new(ALICE, 1);
    ledger
        .deposit(&alice, &mut assets, ALICE, U256::from(300), coin)
        .unwrap();
    ledger
        .deposit(&alice, &mut assets, ALICE, U256::from(9), nst)
        .unwrap();

    ledger.set_slot(&gateway(1), 0, VALIDATOR, VALIDATOR).unwrap();
    let validator = CallContext::new(VALIDATOR, 2).at(1_700_000_000);
    let tip = ledger
        .submit_period(&validator, 0, GENESIS_TIP, B256::repeat_byte(1))
        .unwrap();
    ledger
        .submit_period_for_reward(&validator, &mut assets, 0, tip, B256::repeat_byte(2))
        .unwrap();

    ledger.fund_stake(&gateway(2), ALICE, U256::from(50)).unwrap();
    ledger
        .bid(&CallContext::new(ALICE, 3), 1, ALICE, U256::from(5))
        .unwrap();
    ledger.set_epoch_length(&gateway(4), 8).unwrap();
    ledger
}

#[test]
fn replay_rebuilds_identical_state() {
    let original = populated();
    let records = original.sink().records().to_vec();
    assert!(matches!(records[0].event, LedgerEvent::Genesis { .. }));

    let replayed = Ledger::replay(records.clone(), MemorySink::new()).unwrap();
    assert_eq!(replayed.tip_hash(), original.tip_hash());
    assert_eq!(replayed.period_index(), 2);
    assert_eq!(replayed.periods(), original.periods());
    assert_eq!(
        replayed.deposits().collect::<Vec<_>>(),
        original.deposits().collect::<Vec<_>>()
    );
    assert_eq!(
        replayed.slots().collect::<Vec<_>>(),
        original.slots().collect::<Vec<_>>()
    );
    assert_eq!(replayed.params(), original.params());
    assert_eq!(replayed.token_data(1).unwrap(), B256::repeat_byte(0x5a));
    assert_eq!(replayed.next_seq(), records.len() as u64);
    assert_eq!(replayed.last_digest(), original.last_digest());
    assert!(replayed.sink().records().is_empty());
}

#[test]
fn replayed_ledger_keeps_chaining() {
    let original = populated();
    let records = original.sink().records().to_vec();
    let mut replayed = Ledger::replay(records.clone(), MemorySink::new()).unwrap();
    replayed
        .register_token(&gateway(5), Address::repeat_byte(0xee), AssetKind::NonFungible)
        .unwrap();
    let appended = &replayed.sink().records()[0];
    assert_eq!(appended.seq, records.len() as u64);
    assert_eq!(appended.prev_digest, records.last().unwrap().digest);
}

#[test]
fn tampered_record_is_rejected() {
    let mut records = populated().sink().records().to_vec();
    if let LedgerEvent::Deposited { deposit } = &mut records[3].event {
        deposit.value = U256::from(301);
    } else {
        panic!("record 3 should be the first deposit");
    }
    let err = Ledger::replay(records, MemorySink::new()).unwrap_err();
    assert!(matches!(err, LedgerError::CorruptRecord { seq: 3, .. }));
}

#[test]
fn resealed_record_breaks_the_chain() {
    let mut records = populated().sink().records().to_vec();
    let forged = RecordEnvelope::seal(2, 0, B256::ZERO, records[2].event.clone()).unwrap();
    records[2] = forged;
    let err = Ledger::replay(records, MemorySink::new()).unwrap_err();
    assert!(matches!(err, LedgerError::CorruptRecord { seq: 2, .. }));
}

#[test]
fn replay_requires_genesis_first() {
    let records = populated().sink().records()[1..].to_vec();
    let err = Ledger::replay(records, MemorySink::new()).unwrap_err();
    assert!(matches!(err, LedgerError::CorruptRecord { .. }));

    let err = Ledger::replay(Vec::new(), MemorySink::new()).unwrap_err();
    assert!(matches!(err, LedgerError::CorruptRecord { seq: 0, .. }));
}

struct FailingSink {
    accept: usize,
    seen: usize,
}

impl EventSink for FailingSink {
    fn record(&mut self, _envelope: &RecordEnvelope) -> Result<(), SinkError> {
        if self.seen >= self.accept {
            return Err("disk full".into());
        }
        self.seen += 1;
        Ok(())
    }
}

#[test]
fn storage_failure_leaves_state_untouched() {
    let sink = FailingSink { accept: 2, seen: 0 };
    let mut ledger = Ledger::genesis(params(), sink).unwrap();
    let mut assets = InMemoryAssets::new(VAULT);
    assets.mint(COIN, ALICE, U256::from(10));
    assets.approve(COIN, ALICE, U256::from(10));
    let coin = ledger
        .register_token(&gateway(0), COIN, AssetKind::Fungible)
        .unwrap();

    let before = ledger.next_seq();
    let err = ledger
        .deposit(
            &CallContext::new(ALICE, 1),
            &mut assets,
            ALICE,
            U256::from(10),
            coin,
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::Storage(_)));
    assert_eq!(ledger.deposit_count(), 0);
    assert_eq!(ledger.custodied(coin), U256::ZERO);
    assert_eq!(ledger.next_seq(), before);
    // the pull already happened on the asset side
    assert_eq!(assets.balance_of(COIN, VAULT), U256::from(10));
}

#[test]
fn escrow_survives_replay_and_is_refunded_on_takeover() {
    let first = Address::repeat_byte(0xb1);
    let second = Address::repeat_byte(0xb2);
    let mut ledger = Ledger::genesis(params(), MemorySink::new()).unwrap();
    ledger.fund_stake(&gateway(0), first, U256::from(50)).unwrap();
    ledger.fund_stake(&gateway(0), second, U256::from(50)).unwrap();
    ledger
        .bid(&CallContext::new(first, 0), 1, first, U256::from(10))
        .unwrap();
    ledger.advance(4).unwrap();
    assert_eq!(ledger.slot(1).unwrap().owner, first);
    assert_eq!(ledger.settlement().escrowed(first), U256::from(10));

    let records = ledger.sink().records().to_vec();
    let mut replayed = Ledger::replay(records, MemorySink::new()).unwrap();
    assert_eq!(replayed.settlement(), ledger.settlement());
    assert_eq!(replayed.settlement().escrowed(first), U256::from(10));
    assert_eq!(replayed.settlement().available(first), U256::from(40));

    replayed
        .bid(&CallContext::new(second, 4), 1, second, U256::from(20))
        .unwrap();
    replayed.advance(8).unwrap();
    assert_eq!(replayed.slot(1).unwrap().owner, second);
    assert_eq!(replayed.settlement().escrowed(first), U256::ZERO);
    assert_eq!(replayed.settlement().available(first), U256::from(50));
    assert_eq!(replayed.settlement().escrowed(second), U256::from(20));
}

#[test]
fn replay_rejects_heights_that_go_backwards() {
    let genesis = RecordEnvelope::seal(
        0,
        5,
        B256::ZERO,
        LedgerEvent::Genesis { params: params() },
    )
    .unwrap();
    let change = RecordEnvelope::seal(
        1,
        3,
        genesis.digest,
        LedgerEvent::ParamChanged {
            change: ParamChange::MinGasPrice(U256::from(1)),
        },
    )
    .unwrap();
    let err = Ledger::replay(vec![genesis, change], MemorySink::new()).unwrap_err();
    assert!(matches!(err, LedgerError::CorruptRecord { seq: 1, .. }));
}
