//! Bridge CLI - operator interface for the side-chain bridge ledger.
//!
//! The CLI acts as the governance gateway: privileged commands are issued
//! with the gateway recorded at genesis as caller.

use bridge_primitives::{Address, SlotId, B256};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;
mod output;

use commands::{
    fund_stake, init, inspect, list, register_token, set_param, set_slot, submit_period, verify,
};
use config::BridgeConfig;

#[derive(Parser)]
#[command(name = "bridge")]
#[command(about = "Side-chain bridge ledger operator CLI")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Data directory holding the journal (overrides the config)
    #[arg(long, global = true)]
    datadir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a ledger and record its genesis
    Init {
        /// Gateway address (overrides genesis.gateway)
        #[arg(long)]
        gateway: Option<Address>,
    },
    /// List records in the journal
    List {
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
        /// Only records of this kind (e.g. deposited, period_submitted)
        #[arg(long)]
        kind: Option<String>,
        /// Only records concerning this slot
        #[arg(long)]
        slot: Option<SlotId>,
        /// Only deposits credited to this address
        #[arg(long)]
        depositor: Option<Address>,
        /// Lowest height to include
        #[arg(long)]
        from_height: Option<u64>,
        /// Highest height to include
        #[arg(long)]
        to_height: Option<u64>,
        /// Stop after N records (default: unlimited)
        #[arg(long)]
        max_records: Option<u64>,
    },
    /// Show ledger state, an account's stake, a deposit, a slot or a period
    Inspect {
        /// Account whose auction stake to show
        #[arg(long, conflicts_with_all = ["deposit", "slot", "period"])]
        account: Option<Address>,
        /// Deposit id
        #[arg(long, conflicts_with_all = ["slot", "period"])]
        deposit: Option<u64>,
        /// Slot id
        #[arg(long, conflicts_with = "period")]
        slot: Option<SlotId>,
        /// Period index
        #[arg(long)]
        period: Option<u64>,
    },
    /// Verify record digests and chaining
    Verify {
        /// Exit with error code if any verification fails
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register an asset and print its color
    RegisterToken {
        /// Asset contract address
        asset: Address,
        /// fungible | non-fungible | non-fungible-storage, or wire code 0-2
        #[arg(long)]
        kind: String,
        /// Chain height of the call (default: last recorded height)
        #[arg(long)]
        height: Option<u64>,
    },
    /// Credit auction stake to an account and print its available stake
    FundStake {
        /// Account to credit
        account: Address,
        /// Amount, decimal or 0x hex
        amount: String,
        /// Chain height of the call (default: last recorded height)
        #[arg(long)]
        height: Option<u64>,
    },
    /// Install an owner and signer in a slot
    SetSlot {
        /// Slot id
        slot_id: SlotId,
        /// Owner address
        owner: Address,
        /// Signer address
        signer: Address,
        /// Chain height of the call (default: last recorded height)
        #[arg(long)]
        height: Option<u64>,
    },
    /// Change a governance parameter
    SetParam {
        /// min_gas_price | operator | epoch_length | period_reward | parent_block_interval
        name: String,
        /// New value
        value: String,
        /// Chain height of the call (default: last recorded height)
        #[arg(long)]
        height: Option<u64>,
    },
    /// Submit a period through a slot and print the new tip
    SubmitPeriod {
        /// Slot id
        slot_id: SlotId,
        /// Merkle root of the period
        merkle_root: B256,
        /// Tip the period builds on (default: current tip)
        #[arg(long)]
        prev_tip: Option<B256>,
        /// Submitting signer (default: the slot's signer)
        #[arg(long)]
        signer: Option<Address>,
        /// Chain height of the call (default: last recorded height)
        #[arg(long)]
        height: Option<u64>,
    },
}

fn load_config(cli: &Cli) -> Result<BridgeConfig, Box<dyn std::error::Error>> {
    let mut config = BridgeConfig::load(cli.config.as_deref())?;
    if let Some(datadir) = &cli.datadir {
        config.datadir = datadir.clone();
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(&config.logging.filter);

    let result = match cli.command {
        Commands::Init { gateway } => init::run(&config, gateway),
        Commands::List {
            json,
            kind,
            slot,
            depositor,
            from_height,
            to_height,
            max_records,
        } => list::run(
            &config,
            list::ListArgs {
                json,
                kind,
                slot,
                depositor,
                from_height,
                to_height,
                max_records,
            },
        ),
        Commands::Inspect {
            account,
            deposit,
            slot,
            period,
        } => inspect::run(
            &config,
            inspect::InspectArgs {
                account,
                deposit,
                slot,
                period,
            },
        ),
        Commands::Verify { strict, json } => verify::run(&config, strict, json),
        Commands::RegisterToken {
            asset,
            kind,
            height,
        } => register_token::run(&config, asset, kind, height),
        Commands::FundStake {
            account,
            amount,
            height,
        } => fund_stake::run(&config, account, amount, height),
        Commands::SetSlot {
            slot_id,
            owner,
            signer,
            height,
        } => set_slot::run(&config, slot_id, owner, signer, height),
        Commands::SetParam {
            name,
            value,
            height,
        } => set_param::run(&config, name, value, height),
        Commands::SubmitPeriod {
            slot_id,
            merkle_root,
            prev_tip,
            signer,
            height,
        } => submit_period::run(&config, slot_id, merkle_root, prev_tip, signer, height),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
