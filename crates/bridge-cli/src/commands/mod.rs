//! One module per subcommand.

pub mod fund_stake;
pub mod init;
pub mod inspect;
pub mod list;
pub mod register_token;
pub mod set_param;
pub mod set_slot;
pub mod submit_period;
pub mod verify;

use crate::config::BridgeConfig;
use bridge_core::CallContext;
use bridge_primitives::Address;
use bridge_store::{open_ledger, DurableLedger, WriteOptions};

/// Write options derived from the config.
pub fn write_options(config: &BridgeConfig) -> WriteOptions {
    WriteOptions {
        sync: config.journal.sync,
        ..WriteOptions::default()
    }
}

/// Opens the configured ledger for a mutating command.
pub fn open(config: &BridgeConfig) -> Result<DurableLedger, Box<dyn std::error::Error>> {
    let path = config.journal_path();
    let ledger = open_ledger(&path, write_options(config))
        .map_err(|e| format!("Failed to open ledger at {}: {}", path.display(), e))?;
    Ok(ledger)
}

/// Call context at `height`, defaulting to the last recorded height.
pub fn call_context(ledger: &DurableLedger, caller: Address, height: Option<u64>) -> CallContext {
    let height = height.unwrap_or_else(|| ledger.last_height());
    let timestamp = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
    CallContext::new(caller, height).at(timestamp)
}
