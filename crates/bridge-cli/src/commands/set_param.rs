//! Set-param command implementation.

use crate::commands::{call_context, open};
use crate::config::{parse_amount, BridgeConfig};
use bridge_core::ParamChange;
use bridge_primitives::Address;
use std::str::FromStr;

/// Builds a parameter change from its name and textual value.
pub fn parse_change(name: &str, value: &str) -> Result<ParamChange, Box<dyn std::error::Error>> {
    let change = match name {
        "min_gas_price" => ParamChange::MinGasPrice(parse_amount("min_gas_price", value)?),
        "period_reward" => ParamChange::PeriodReward(parse_amount("period_reward", value)?),
        "operator" => ParamChange::Operator(
            Address::from_str(value).map_err(|e| format!("Invalid operator address: {}", e))?,
        ),
        "epoch_length" => ParamChange::EpochLength(
            value
                .parse()
                .map_err(|e| format!("Invalid epoch_length: {}", e))?,
        ),
        "parent_block_interval" => ParamChange::ParentBlockInterval(
            value
                .parse()
                .map_err(|e| format!("Invalid parent_block_interval: {}", e))?,
        ),
        other => return Err(format!("Unknown parameter: {}", other).into()),
    };
    Ok(change)
}

pub fn run(
    config: &BridgeConfig,
    name: String,
    value: String,
    height: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let change = parse_change(&name, &value)?;
    let mut ledger = open(config)?;
    let ctx = call_context(&ledger, ledger.gateway(), height);
    ledger.set_param(&ctx, change)?;
    println!("{} = {}", name, value);
    Ok(())
}
