//! Set-slot command implementation.

use crate::commands::{call_context, open};
use crate::config::BridgeConfig;
use bridge_primitives::{Address, SlotId};

pub fn run(
    config: &BridgeConfig,
    slot_id: SlotId,
    owner: Address,
    signer: Address,
    height: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = open(config)?;
    let ctx = call_context(&ledger, ledger.gateway(), height);
    ledger.set_slot(&ctx, slot_id, owner, signer)?;
    println!("slot {} owner={} signer={}", slot_id, owner, signer);
    Ok(())
}
