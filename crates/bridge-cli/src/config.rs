//! Operator configuration read from a TOML file.

use bridge_core::governance::{DEFAULT_EPOCH_LENGTH, DEFAULT_SLOT_COUNT};
use bridge_core::GovernanceParams;
use bridge_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Default value for `datadir` in [`BridgeConfig`].
const DEFAULT_DATADIR: &str = "bridge-data";

/// Default log filter directive.
const DEFAULT_LOG_FILTER: &str = "info";

/// File name of the journal inside the data directory.
pub const JOURNAL_FILE: &str = "ledger.brj";

/// Errors loading or interpreting the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {}: {}", .path.display(), .source)]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Config file is not valid TOML for [`BridgeConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A numeric string field does not parse as an unsigned integer.
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// Genesis needs a gateway address.
    #[error("genesis.gateway is not set")]
    MissingGateway,
}

/// Top-level operator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Directory holding the ledger journal.
    #[serde(default = "default_datadir")]
    pub datadir: PathBuf,

    /// Journal write behavior.
    #[serde(default)]
    pub journal: JournalConfig,

    /// Parameters written into the genesis record by `init`.
    #[serde(default)]
    pub genesis: GenesisConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Fsync after every appended record.
    #[serde(default)]
    pub sync: bool,
}

/// Genesis parameters. Amounts are decimal or `0x` hex strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisConfig {
    pub gateway: Option<Address>,

    #[serde(default)]
    pub operator: Option<Address>,

    #[serde(default = "default_amount")]
    pub min_gas_price: String,

    #[serde(default = "default_epoch_length")]
    pub epoch_length: u32,

    #[serde(default = "default_slot_count")]
    pub slot_count: u16,

    #[serde(default = "default_amount")]
    pub period_reward: String,

    #[serde(default)]
    pub parent_block_interval: u64,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            gateway: None,
            operator: None,
            min_gas_price: default_amount(),
            epoch_length: DEFAULT_EPOCH_LENGTH,
            slot_count: DEFAULT_SLOT_COUNT,
            period_reward: default_amount(),
            parent_block_interval: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            datadir: default_datadir(),
            journal: JournalConfig::default(),
            genesis: GenesisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_datadir() -> PathBuf {
    DEFAULT_DATADIR.into()
}

fn default_amount() -> String {
    "0".to_string()
}

fn default_epoch_length() -> u32 {
    DEFAULT_EPOCH_LENGTH
}

fn default_slot_count() -> u16 {
    DEFAULT_SLOT_COUNT
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Parses a decimal or `0x`-prefixed amount.
pub fn parse_amount(field: &'static str, value: &str) -> Result<U256, ConfigError> {
    U256::from_str(value.trim()).map_err(|_| ConfigError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

impl BridgeConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the file at `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text)
            }
        }
    }

    /// Location of the ledger journal.
    pub fn journal_path(&self) -> PathBuf {
        self.datadir.join(JOURNAL_FILE)
    }

    /// Genesis parameters described by this configuration.
    pub fn genesis_params(&self) -> Result<GovernanceParams, ConfigError> {
        let genesis = &self.genesis;
        let gateway = genesis.gateway.ok_or(ConfigError::MissingGateway)?;
        Ok(GovernanceParams {
            gateway,
            operator: genesis.operator.unwrap_or(Address::ZERO),
            min_gas_price: parse_amount("genesis.min_gas_price", &genesis.min_gas_price)?,
            epoch_length: genesis.epoch_length,
            slot_count: genesis.slot_count,
            period_reward: parse_amount("genesis.period_reward", &genesis.period_reward)?,
            parent_block_interval: genesis.parent_block_interval,
        })
    }
}
