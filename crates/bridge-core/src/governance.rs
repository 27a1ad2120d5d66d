//! Scalar governance parameters and caller checks for privileged calls.

use bridge_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::LedgerError;

/// Default number of validator slots.
pub const DEFAULT_SLOT_COUNT: u16 = 8;

/// Default epoch length in heights.
pub const DEFAULT_EPOCH_LENGTH: u32 = 32;

/// Ledger parameters. `gateway` and `slot_count` are fixed at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Only identity allowed to call privileged entry points.
    pub gateway: Address,
    /// Operator allowed to manage slots alongside the gateway.
    pub operator: Address,
    /// Minimum gas price advertised to the side chain.
    pub min_gas_price: U256,
    /// Heights per epoch; never zero.
    pub epoch_length: u32,
    /// Number of validator slots; never zero.
    pub slot_count: u16,
    /// Reward accrued by each accepted period.
    pub period_reward: U256,
    /// Minimum heights between two periods; zero disables pacing.
    pub parent_block_interval: u64,
}

impl GovernanceParams {
    /// Default parameters governed by `gateway`.
    pub fn new(gateway: Address) -> Self {
        Self {
            gateway,
            operator: Address::ZERO,
            min_gas_price: U256::ZERO,
            epoch_length: DEFAULT_EPOCH_LENGTH,
            slot_count: DEFAULT_SLOT_COUNT,
            period_reward: U256::ZERO,
            parent_block_interval: 0,
        }
    }

    /// Rejects parameter sets the scheduler cannot work with.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.epoch_length == 0 {
            return Err(LedgerError::InvalidEpochLength);
        }
        if self.slot_count == 0 {
            return Err(LedgerError::InvalidSlotCount);
        }
        Ok(())
    }

    /// Fails with `Unauthorized` unless `caller` is the gateway.
    pub fn require_gateway(
        &self,
        caller: Address,
        entry_point: &'static str,
    ) -> Result<(), LedgerError> {
        if caller != self.gateway {
            warn!(%caller, entry_point, "privileged call rejected");
            return Err(LedgerError::Unauthorized {
                caller,
                entry_point,
            });
        }
        Ok(())
    }

    /// Fails with `Unauthorized` unless `caller` is the gateway or operator.
    pub fn require_slot_admin(
        &self,
        caller: Address,
        entry_point: &'static str,
    ) -> Result<(), LedgerError> {
        if caller == self.gateway || (!self.operator.is_zero() && caller == self.operator) {
            return Ok(());
        }
        warn!(%caller, entry_point, "privileged call rejected");
        Err(LedgerError::Unauthorized {
            caller,
            entry_point,
        })
    }

    /// Checks a change without applying it.
    pub fn check(&self, change: &ParamChange) -> Result<(), LedgerError> {
        match change {
            ParamChange::EpochLength(0) => Err(LedgerError::InvalidEpochLength),
            _ => Ok(()),
        }
    }

    pub(crate) fn apply(&mut self, change: &ParamChange) {
        match change {
            ParamChange::MinGasPrice(value) => self.min_gas_price = *value,
            ParamChange::Operator(value) => self.operator = *value,
            ParamChange::EpochLength(value) => self.epoch_length = *value,
            ParamChange::PeriodReward(value) => self.period_reward = *value,
            ParamChange::ParentBlockInterval(value) => self.parent_block_interval = *value,
        }
    }
}

/// A gateway-issued parameter change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "param", content = "value", rename_all = "snake_case")]
pub enum ParamChange {
    /// New minimum gas price.
    MinGasPrice(U256),
    /// New operator address.
    Operator(Address),
    /// New epoch length.
    EpochLength(u32),
    /// New per-period reward.
    PeriodReward(U256),
    /// New parent-block interval.
    ParentBlockInterval(u64),
}

impl ParamChange {
    /// Entry point name used in errors and logs.
    pub fn entry_point(&self) -> &'static str {
        match self {
            ParamChange::MinGasPrice(_) => "set_min_gas_price",
            ParamChange::Operator(_) => "set_operator",
            ParamChange::EpochLength(_) => "set_epoch_length",
            ParamChange::PeriodReward(_) => "set_period_reward",
            ParamChange::ParentBlockInterval(_) => "set_parent_block_interval",
        }
    }
}
