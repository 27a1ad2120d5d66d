//! Deposit bookkeeping keyed by color.

use bridge_primitives::{Address, AssetKind, Color, B256, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::assets::{AssetBackend, TransferError};
use crate::errors::LedgerError;
use crate::registry::ColorRegistry;

/// An accepted deposit. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    /// Sequential identifier, starting at 0.
    pub deposit_id: u64,
    /// Account credited on the side chain.
    pub depositor: Address,
    /// Account the asset was pulled from.
    pub funded_by: Address,
    /// Color of the deposited asset.
    pub color: Color,
    /// Amount for fungible colors, token id for the others.
    pub value: U256,
    /// Storage commitment captured at deposit time; `Some` exactly for
    /// storage-bearing tokens.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub storage_root: Option<B256>,
}

/// Table of deposits plus per-color custody totals.
#[derive(Debug, Clone, Default)]
pub struct DepositLedger {
    deposits: BTreeMap<u64, Deposit>,
    next_id: u64,
    custody: BTreeMap<Color, U256>,
}

impl DepositLedger {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a deposit, moves the asset into custody and returns the
    /// record that would be created. The table itself is not modified.
    pub fn execute<A: AssetBackend + ?Sized>(
        &self,
        registry: &ColorRegistry,
        assets: &mut A,
        funded_by: Address,
        depositor: Address,
        color: Color,
        value: U256,
    ) -> Result<Deposit, LedgerError> {
        let entry = registry.entry(color)?;
        let asset = entry.asset;
        let kind = entry.kind;
        let storage_root = match kind {
            AssetKind::Fungible => {
                if value.is_zero() {
                    return Err(LedgerError::ZeroAmount(color));
                }
                assets
                    .pull_fungible(asset, funded_by, value)
                    .map_err(|err| transfer_failure(color, kind, err))?;
                None
            }
            AssetKind::NonFungible => {
                assets
                    .take_token(asset, funded_by, value)
                    .map_err(|err| transfer_failure(color, kind, err))?;
                None
            }
            AssetKind::NonFungibleWithStorage => {
                let root = assets
                    .storage_root(asset, value)
                    .map_err(|err| transfer_failure(color, kind, err))?;
                assets
                    .take_token(asset, funded_by, value)
                    .map_err(|err| transfer_failure(color, kind, err))?;
                Some(root)
            }
        };
        Ok(Deposit {
            deposit_id: self.next_id,
            depositor,
            funded_by,
            color,
            value,
            storage_root,
        })
    }

    pub(crate) fn insert(&mut self, deposit: Deposit) -> Result<(), LedgerError> {
        if deposit.deposit_id != self.next_id {
            return Err(LedgerError::UnknownDeposit(deposit.deposit_id));
        }
        let kind = deposit
            .color
            .kind()
            .ok_or(LedgerError::UnknownColor(deposit.color))?;
        let held = self.custody.entry(deposit.color).or_default();
        match kind {
            AssetKind::Fungible => *held += deposit.value,
            AssetKind::NonFungible | AssetKind::NonFungibleWithStorage => *held += U256::from(1),
        }
        self.next_id += 1;
        self.deposits.insert(deposit.deposit_id, deposit);
        Ok(())
    }

    /// Storage commitment captured by a storage-bearing deposit.
    pub fn token_data(&self, deposit_id: u64) -> Result<B256, LedgerError> {
        let deposit = self.get(deposit_id)?;
        match deposit.storage_root {
            Some(root) => Ok(root),
            None => Err(LedgerError::NotApplicable {
                deposit_id,
                kind: deposit
                    .color
                    .kind()
                    .ok_or(LedgerError::UnknownColor(deposit.color))?,
            }),
        }
    }

    /// Looks up a deposit by id.
    pub fn get(&self, deposit_id: u64) -> Result<&Deposit, LedgerError> {
        self.deposits
            .get(&deposit_id)
            .ok_or(LedgerError::UnknownDeposit(deposit_id))
    }

    /// Id the next accepted deposit will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Number of accepted deposits.
    pub fn len(&self) -> usize {
        self.deposits.len()
    }

    /// True when no deposit has been accepted.
    pub fn is_empty(&self) -> bool {
        self.deposits.is_empty()
    }

    /// Units (fungible) or tokens (non-fungible) held under `color`.
    pub fn custodied(&self, color: Color) -> U256 {
        self.custody.get(&color).copied().unwrap_or_default()
    }

    /// Deposits in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Deposit> {
        self.deposits.values()
    }
}

fn transfer_failure(color: Color, kind: AssetKind, err: TransferError) -> LedgerError {
    match err {
        TransferError::Rejected(reason) => LedgerError::TransferRejected(reason),
        other @ (TransferError::NoSuchToken { .. } | TransferError::NoStorage(_)) => {
            LedgerError::ColorKindMismatch {
                color,
                registered: kind,
                reason: other.to_string(),
            }
        }
    }
}
