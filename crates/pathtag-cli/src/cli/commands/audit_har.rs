//! `pathtag audit-har <path>` – report how captured signed-URL responses would be annotated.

use anyhow::Result;
use pathtag_core::config::PathtagConfig;
use pathtag_core::har::{self, AuditedExchange, ExchangeOutcome};
use pathtag_core::signed_urls::{EntryOutcome, EntryStatus, SignedUrlAnnotator};
use std::path::Path;

pub fn run_audit_har(cfg: &PathtagConfig, path: &Path) -> Result<()> {
    let annotator = SignedUrlAnnotator::from_config(cfg);
    let report = har::audit_har(path, &annotator)?;
    if report.is_empty() {
        println!(
            "No requests to {} found in {}.",
            annotator.endpoint_path(),
            path.display()
        );
        return Ok(());
    }
    for exchange in &report {
        print_exchange(exchange);
    }
    Ok(())
}

fn print_exchange(exchange: &AuditedExchange) {
    println!(
        "entry {} HTTP {} {}",
        exchange.entry_index, exchange.status, exchange.request_url
    );
    match &exchange.outcome {
        ExchangeOutcome::Rewritten(rw) => {
            println!("  alignment: {:?}", rw.alignment);
            for entry in &rw.entries {
                print_entry(entry);
            }
        }
        ExchangeOutcome::NotObserved => println!("  request has no uris array"),
        ExchangeOutcome::NoResponseBody => println!("  response body not captured as text"),
        ExchangeOutcome::Failed(reason) => println!("  not annotated: {reason}"),
    }
}

fn print_entry(entry: &EntryOutcome) {
    let label = match &entry.status {
        EntryStatus::Annotated(_) => "annotated",
        EntryStatus::Unchanged => "unchanged",
        EntryStatus::MissingUrl => "no-url",
        EntryStatus::MissingIdentifier => "no-identifier",
        EntryStatus::UnresolvablePath => "bad-identifier",
    };
    println!(
        "  [{}] {:<14} {}",
        entry.index,
        label,
        entry.identifier.as_deref().unwrap_or("-")
    );
    println!("       {}", entry.url.as_deref().unwrap_or("-"));
    if let EntryStatus::Annotated(new_url) = &entry.status {
        println!("    -> {new_url}");
    }
}
