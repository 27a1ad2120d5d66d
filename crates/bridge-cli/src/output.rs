//! Output formatting utilities.

use bridge_core::{LedgerEvent, RecordEnvelope};
use serde_json::Value;

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// One-line summary of what a record changed.
pub fn summarize(event: &LedgerEvent) -> String {
    match event {
        LedgerEvent::Genesis { params } => format!(
            "gateway={} slots={} epoch_length={}",
            params.gateway, params.slot_count, params.epoch_length
        ),
        LedgerEvent::TokenRegistered { entry } => {
            format!("color={} kind={} asset={}", entry.color, entry.kind, entry.asset)
        }
        LedgerEvent::Deposited { deposit } => format!(
            "id={} color={} value={} depositor={}",
            deposit.deposit_id, deposit.color, deposit.value, deposit.depositor
        ),
        LedgerEvent::SlotAssigned {
            slot_id, owner, ..
        } => format!("slot={} owner={}", slot_id, owner),
        LedgerEvent::StakeFunded { account, amount } => {
            format!("account={} amount={}", account, amount)
        }
        LedgerEvent::BidPlaced { slot_id, bid } => format!(
            "slot={} bidder={} stake={} epoch={}",
            slot_id, bid.bidder, bid.stake, bid.activation_epoch
        ),
        LedgerEvent::SlotActivated { slot_id, epoch } => {
            format!("slot={} epoch={}", slot_id, epoch)
        }
        LedgerEvent::PeriodSubmitted { period, tip, .. } => format!(
            "period={} slot={} tip={}",
            period.period_index, period.submitted_by, tip
        ),
        LedgerEvent::ParamChanged { change } => change.entry_point().to_string(),
    }
}

/// Formats a record as a table row.
pub fn format_table_row(record: &RecordEnvelope) -> String {
    format!(
        "{:<6} {:<8} {:<17} {:<20} {}",
        record.seq,
        record.height,
        record.event.kind(),
        truncate(&record.digest.to_string(), 20),
        summarize(&record.event)
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!(
        "{:<6} {:<8} {:<17} {:<20} {}",
        "SEQ", "HEIGHT", "KIND", "DIGEST", "DETAIL"
    );
    println!("{}", "-".repeat(100));
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
