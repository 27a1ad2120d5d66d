//! Register-token command implementation.

use crate::commands::{call_context, open};
use crate::config::BridgeConfig;
use bridge_core::parse_kind;
use bridge_primitives::{Address, AssetKind};

/// Accepts a kind name or its wire code.
pub fn parse_asset_kind(text: &str) -> Result<AssetKind, Box<dyn std::error::Error>> {
    match text {
        "fungible" | "erc20" => Ok(AssetKind::Fungible),
        "non-fungible" | "nft" => Ok(AssetKind::NonFungible),
        "non-fungible-storage" | "nst" => Ok(AssetKind::NonFungibleWithStorage),
        other => {
            let code: u8 = other
                .parse()
                .map_err(|_| format!("Unknown asset kind: {}", other))?;
            Ok(parse_kind(code)?)
        }
    }
}

pub fn run(
    config: &BridgeConfig,
    asset: Address,
    kind: String,
    height: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind = parse_asset_kind(&kind)?;
    let mut ledger = open(config)?;
    let ctx = call_context(&ledger, ledger.gateway(), height);
    let color = ledger.register_token(&ctx, asset, kind)?;
    println!("{}", color);
    Ok(())
}
