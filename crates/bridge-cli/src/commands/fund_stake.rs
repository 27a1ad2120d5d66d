//! Fund-stake command implementation.

use crate::commands::{call_context, open};
use crate::config::{parse_amount, BridgeConfig};
use bridge_primitives::Address;

pub fn run(
    config: &BridgeConfig,
    account: Address,
    amount: String,
    height: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let amount = parse_amount("amount", &amount)?;
    let mut ledger = open(config)?;
    let ctx = call_context(&ledger, ledger.gateway(), height);
    ledger.fund_stake(&ctx, account, amount)?;
    println!("{}", ledger.settlement().available(account));
    Ok(())
}
