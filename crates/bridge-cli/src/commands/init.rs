//! Init command implementation.

use crate::commands::write_options;
use crate::config::BridgeConfig;
use bridge_primitives::Address;
use bridge_store::create_ledger;
use std::fs;

pub fn run(config: &BridgeConfig, gateway: Option<Address>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config.clone();
    if gateway.is_some() {
        config.genesis.gateway = gateway;
    }
    let params = config.genesis_params()?;
    fs::create_dir_all(&config.datadir)?;
    let path = config.journal_path();
    let ledger = create_ledger(&path, params, write_options(&config))?;

    println!("Initialized ledger at {}", path.display());
    println!("gateway:      {}", ledger.gateway());
    println!("slot_count:   {}", ledger.params().slot_count);
    println!("epoch_length: {}", ledger.epoch_length());
    println!("tip:          {}", ledger.tip_hash());
    Ok(())
}
