//! Verify command implementation.

use crate::config::BridgeConfig;
use crate::output::truncate;
use bridge_journal::{ChainVerifier, Verdict};
use bridge_store::{JournalBackendReader, ReadMode, StoreReader};
use serde_json::json;

pub fn run(config: &BridgeConfig, strict: bool, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.journal_path();
    let mut reader = JournalBackendReader::open(&path, ReadMode::Permissive)
        .map_err(|e| format!("Failed to open journal: {}", e))?;

    let mut verifier = ChainVerifier::new();
    let mut results = Vec::new();
    while let Some(record) = reader.read_next()? {
        let verdict = verifier.check(&record);
        results.push((record.digest.to_string(), verdict));
    }
    let torn = reader.is_torn();
    let all_ok = !torn && results.iter().all(|(_, v)| v.verdict == Verdict::Ok);

    if json_output {
        let json_results: Vec<_> = results
            .iter()
            .map(|(digest, v)| {
                json!({
                    "seq": v.seq,
                    "kind": v.kind,
                    "digest": digest,
                    "verdict": v.verdict.to_string(),
                })
            })
            .collect();
        let report = json!({
            "records": json_results,
            "torn_tail": torn,
            "ok": all_ok,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{:<6} {:<17} {:<24} {}", "SEQ", "KIND", "DIGEST", "VERDICT");
        println!("{}", "-".repeat(70));
        for (digest, v) in &results {
            println!(
                "{:<6} {:<17} {:<24} {}",
                v.seq,
                v.kind,
                truncate(digest, 24),
                v.verdict
            );
        }
        if torn {
            println!("journal ends in a torn frame");
        }
    }

    if strict && !all_ok {
        std::process::exit(1);
    }

    Ok(())
}
