//! View API over stored records.
//!
//! Every view is a sequential scan; there is no index.

use crate::error::StoreError;
use crate::traits::StoreReader;
use bridge_core::{Deposit, LedgerEvent, Period};
use bridge_primitives::{Address, SlotId};

/// Collects every deposit credited to `depositor`, in id order.
pub fn deposits_by<R: StoreReader>(
    reader: &mut R,
    depositor: Address,
) -> Result<Vec<Deposit>, StoreError> {
    let mut deposits = Vec::new();
    while let Some(record) = reader.read_next()? {
        if let LedgerEvent::Deposited { deposit } = record.event {
            if deposit.depositor == depositor {
                deposits.push(deposit);
            }
        }
    }
    Ok(deposits)
}

/// Collects every period submitted through `slot_id`.
pub fn periods_by_slot<R: StoreReader>(
    reader: &mut R,
    slot_id: SlotId,
) -> Result<Vec<Period>, StoreError> {
    let mut periods = Vec::new();
    while let Some(record) = reader.read_next()? {
        if let LedgerEvent::PeriodSubmitted { period, .. } = record.event {
            if period.submitted_by == slot_id {
                periods.push(period);
            }
        }
    }
    Ok(periods)
}

/// Scans for the deposit with `deposit_id`.
///
/// Stops at the first match. Returns `None` if the deposit is not stored.
pub fn find_deposit<R: StoreReader>(
    reader: &mut R,
    deposit_id: u64,
) -> Result<Option<Deposit>, StoreError> {
    while let Some(record) = reader.read_next()? {
        match record.event {
            LedgerEvent::Deposited { deposit } if deposit.deposit_id == deposit_id => {
                return Ok(Some(deposit));
            }
            _ => continue,
        }
    }
    Ok(None)
}
