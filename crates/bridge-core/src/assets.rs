//! Seam to the external asset system.
//!
//! The ledger never moves assets itself; it asks an [`AssetBackend`] to do so
//! and treats each call as succeed-or-fail atomically.

use bridge_primitives::{Address, B256, U256};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Failure reported by an asset backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Holder, approval or balance check failed.
    #[error("{0}")]
    Rejected(String),
    /// Token id does not exist on the asset.
    #[error("token {token_id} does not exist on {asset}")]
    NoSuchToken {
        /// Asset queried.
        asset: Address,
        /// Missing token id.
        token_id: U256,
    },
    /// Asset has no mutable storage commitment.
    #[error("asset {0} carries no storage commitment")]
    NoStorage(Address),
}

/// External asset mechanism used by deposits and reward payouts.
pub trait AssetBackend {
    /// Moves `amount` units of a fungible asset from `from` into custody.
    fn pull_fungible(
        &mut self,
        asset: Address,
        from: Address,
        amount: U256,
    ) -> Result<(), TransferError>;

    /// Takes custody of a single token held or approved by `from`.
    fn take_token(
        &mut self,
        asset: Address,
        from: Address,
        token_id: U256,
    ) -> Result<(), TransferError>;

    /// Reads the current storage commitment of a storage-bearing token.
    fn storage_root(&self, asset: Address, token_id: U256) -> Result<B256, TransferError>;

    /// Pays a checkpoint reward to `to`.
    fn pay_reward(&mut self, to: Address, amount: U256) -> Result<(), TransferError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TokenRecord {
    owner: Address,
    approved: Option<Address>,
}

/// Asset system kept entirely in memory.
///
/// Models allowance-based fungible pulls, approval-based token custody, NST
/// storage roots and a funded reward pool. Used by tests and by simulations
/// that have no real asset chain behind them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssets {
    custodian: Address,
    balances: BTreeMap<(Address, Address), U256>,
    allowances: BTreeMap<(Address, Address), U256>,
    tokens: BTreeMap<(Address, U256), TokenRecord>,
    storage_assets: BTreeSet<Address>,
    storage_roots: BTreeMap<(Address, U256), B256>,
    reward_pool: U256,
    rewards_paid: BTreeMap<Address, U256>,
}

impl InMemoryAssets {
    /// Creates an empty asset system whose custody account is `custodian`.
    pub fn new(custodian: Address) -> Self {
        Self {
            custodian,
            ..Self::default()
        }
    }

    /// Address holding everything the ledger takes custody of.
    pub fn custodian(&self) -> Address {
        self.custodian
    }

    /// Credits `amount` of a fungible asset to `to`.
    pub fn mint(&mut self, asset: Address, to: Address, amount: U256) {
        *self.balances.entry((asset, to)).or_default() += amount;
    }

    /// Sets how much of `owner`'s balance the custodian may pull.
    pub fn approve(&mut self, asset: Address, owner: Address, amount: U256) {
        self.allowances.insert((asset, owner), amount);
    }

    /// Fungible balance of `holder`.
    pub fn balance_of(&self, asset: Address, holder: Address) -> U256 {
        self.balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or_default()
    }

    /// Creates a token owned by `to`.
    pub fn mint_token(&mut self, asset: Address, to: Address, token_id: U256) {
        self.tokens.insert(
            (asset, token_id),
            TokenRecord {
                owner: to,
                approved: None,
            },
        );
    }

    /// Creates a storage-bearing token with an initial commitment.
    pub fn mint_storage_token(&mut self, asset: Address, to: Address, token_id: U256, root: B256) {
        self.storage_assets.insert(asset);
        self.mint_token(asset, to, token_id);
        self.storage_roots.insert((asset, token_id), root);
    }

    /// Replaces the storage commitment of a token.
    pub fn set_storage_root(&mut self, asset: Address, token_id: U256, root: B256) {
        self.storage_roots.insert((asset, token_id), root);
    }

    /// Lets the custodian take `token_id` from `owner`.
    pub fn approve_token(&mut self, asset: Address, owner: Address, token_id: U256) -> bool {
        match self.tokens.get_mut(&(asset, token_id)) {
            Some(record) if record.owner == owner => {
                record.approved = Some(self.custodian);
                true
            }
            _ => false,
        }
    }

    /// Current owner of a token.
    pub fn owner_of(&self, asset: Address, token_id: U256) -> Option<Address> {
        self.tokens.get(&(asset, token_id)).map(|r| r.owner)
    }

    /// Adds funds to the reward pool.
    pub fn fund_rewards(&mut self, amount: U256) {
        self.reward_pool += amount;
    }

    /// Total rewards paid to `to`.
    pub fn rewards_of(&self, to: Address) -> U256 {
        self.rewards_paid.get(&to).copied().unwrap_or_default()
    }
}

impl AssetBackend for InMemoryAssets {
    fn pull_fungible(
        &mut self,
        asset: Address,
        from: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        let allowance = self
            .allowances
            .get(&(asset, from))
            .copied()
            .unwrap_or_default();
        if allowance < amount {
            return Err(TransferError::Rejected(format!(
                "allowance {} below {}",
                allowance, amount
            )));
        }
        let balance = self.balance_of(asset, from);
        if balance < amount {
            return Err(TransferError::Rejected(format!(
                "balance {} below {}",
                balance, amount
            )));
        }
        self.allowances.insert((asset, from), allowance - amount);
        self.balances.insert((asset, from), balance - amount);
        *self.balances.entry((asset, self.custodian)).or_default() += amount;
        Ok(())
    }

    fn take_token(
        &mut self,
        asset: Address,
        from: Address,
        token_id: U256,
    ) -> Result<(), TransferError> {
        let custodian = self.custodian;
        let record = self
            .tokens
            .get_mut(&(asset, token_id))
            .ok_or(TransferError::NoSuchToken { asset, token_id })?;
        if record.owner != from {
            return Err(TransferError::Rejected(format!(
                "{} does not hold token {}",
                from, token_id
            )));
        }
        if record.approved != Some(custodian) {
            return Err(TransferError::Rejected(format!(
                "token {} not approved for custody",
                token_id
            )));
        }
        record.owner = custodian;
        record.approved = None;
        Ok(())
    }

    fn storage_root(&self, asset: Address, token_id: U256) -> Result<B256, TransferError> {
        if !self.storage_assets.contains(&asset) {
            return Err(TransferError::NoStorage(asset));
        }
        self.storage_roots
            .get(&(asset, token_id))
            .copied()
            .ok_or(TransferError::NoSuchToken { asset, token_id })
    }

    fn pay_reward(&mut self, to: Address, amount: U256) -> Result<(), TransferError> {
        if self.reward_pool < amount {
            return Err(TransferError::Rejected(format!(
                "reward pool {} below {}",
                self.reward_pool, amount
            )));
        }
        self.reward_pool -= amount;
        *self.rewards_paid.entry(to).or_default() += amount;
        Ok(())
    }
}
