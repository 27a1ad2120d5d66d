//! List command implementation.

use crate::config::BridgeConfig;
use crate::output;
use bridge_primitives::{Address, SlotId};
use bridge_store::{
    AndFilter, DepositorFilter, EventKindFilter, FilteredReader, HeightRangeFilter,
    JournalBackendReader, ReadMode, RecordFilter, SlotFilter, StoreReader,
};

/// Record selection for `list`.
pub struct ListArgs {
    pub json: bool,
    pub kind: Option<String>,
    pub slot: Option<SlotId>,
    pub depositor: Option<Address>,
    pub from_height: Option<u64>,
    pub to_height: Option<u64>,
    pub max_records: Option<u64>,
}

fn build_filter(args: &ListArgs) -> AndFilter {
    let mut filters: Vec<Box<dyn RecordFilter>> = Vec::new();
    if let Some(kind) = &args.kind {
        filters.push(Box::new(EventKindFilter { kind: kind.clone() }));
    }
    if let Some(slot_id) = args.slot {
        filters.push(Box::new(SlotFilter { slot_id }));
    }
    if let Some(depositor) = args.depositor {
        filters.push(Box::new(DepositorFilter { depositor }));
    }
    if args.from_height.is_some() || args.to_height.is_some() {
        filters.push(Box::new(HeightRangeFilter {
            from: args.from_height,
            to: args.to_height,
        }));
    }
    AndFilter { filters }
}

pub fn run(config: &BridgeConfig, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.journal_path();
    let reader = JournalBackendReader::open(&path, ReadMode::Strict)
        .map_err(|e| format!("Failed to open journal {}: {}", path.display(), e))?;
    let mut reader = FilteredReader::new(reader, build_filter(&args));

    if !args.json {
        output::print_table_header();
    }

    let mut count: u64 = 0;
    while let Some(record) = reader.read_next()? {
        if let Some(max) = args.max_records {
            if count >= max {
                break;
            }
        }
        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", output::format_table_row(&record));
        }
        count += 1;
    }

    Ok(())
}
