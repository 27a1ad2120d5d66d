//! Submit-period command implementation.

use crate::commands::{call_context, open};
use crate::config::BridgeConfig;
use bridge_primitives::{Address, SlotId, B256};

pub fn run(
    config: &BridgeConfig,
    slot_id: SlotId,
    merkle_root: B256,
    prev_tip: Option<B256>,
    signer: Option<Address>,
    height: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = open(config)?;
    let signer = match signer {
        Some(s) => s,
        None => ledger.slot(slot_id)?.signer,
    };
    let prev_tip = prev_tip.unwrap_or_else(|| ledger.tip_hash());
    let ctx = call_context(&ledger, signer, height);
    let tip = ledger.submit_period(&ctx, slot_id, prev_tip, merkle_root)?;
    println!("{}", tip);
    Ok(())
}
