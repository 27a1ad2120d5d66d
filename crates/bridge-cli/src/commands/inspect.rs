//! Inspect command implementation.

use crate::config::BridgeConfig;
use crate::output;
use bridge_core::{Ledger, MemorySink};
use bridge_primitives::{Address, SlotId};
use bridge_store::{
    find_deposit, periods_by_slot, JournalBackendReader, ReadMode, StoreReader,
};
use serde_json::{json, Value};
use std::path::Path;

/// What to show; the ledger summary when nothing is selected.
pub struct InspectArgs {
    pub account: Option<Address>,
    pub deposit: Option<u64>,
    pub slot: Option<SlotId>,
    pub period: Option<u64>,
}

fn reader(path: &Path) -> Result<JournalBackendReader, Box<dyn std::error::Error>> {
    let reader = JournalBackendReader::open(path, ReadMode::Permissive)
        .map_err(|e| format!("Failed to open journal: {}", e))?;
    Ok(reader)
}

pub fn run(config: &BridgeConfig, args: InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.journal_path();

    if let Some(deposit_id) = args.deposit {
        let deposit = match find_deposit(&mut reader(&path)?, deposit_id)? {
            Some(d) => d,
            None => {
                eprintln!("Deposit {} not found", deposit_id);
                std::process::exit(1);
            }
        };
        println!("{}", serde_json::to_string_pretty(&deposit)?);
        return Ok(());
    }

    // replay in memory so inspection never touches the journal
    let records = reader(&path)?.read_all()?;
    let ledger = Ledger::replay(records, MemorySink::new())?;

    let view: Value = if let Some(account) = args.account {
        let book = ledger.settlement();
        json!({
            "account": account,
            "available": book.available(account),
            "escrowed": book.escrowed(account),
        })
    } else if let Some(slot_id) = args.slot {
        let slot = ledger.slot(slot_id)?;
        let periods = periods_by_slot(&mut reader(&path)?, slot_id)?;
        json!({
            "slot": slot,
            "periods": periods.iter().map(|p| p.period_index).collect::<Vec<_>>(),
            "period_count": periods.len(),
        })
    } else if let Some(index) = args.period {
        match ledger.period(index) {
            Some(period) => json!({ "period": period, "tip": period.tip() }),
            None => {
                eprintln!("Period {} not found", index);
                std::process::exit(1);
            }
        }
    } else {
        let state = ledger.state();
        json!({
            "tip": ledger.tip_hash(),
            "period_index": ledger.period_index(),
            "awaiting": { "period_index": state.period_index, "tip": state.tip },
            "next_seq": ledger.next_seq(),
            "last_height": ledger.last_height(),
            "params": ledger.params(),
            "tokens": ledger.tokens().collect::<Vec<_>>(),
            "slots": ledger.slots().collect::<Vec<_>>(),
            "deposit_count": ledger.deposit_count(),
        })
    };

    println!("{}", output::format_json(&view));
    Ok(())
}
