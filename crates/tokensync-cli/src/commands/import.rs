//! Import command implementation

use std::fs;
use std::path::Path;

use colored::Colorize;
use serde_json::json;

use tokensync_core::{ImportReport, SyncEngine};
use tokensync_model::TokenDocument;
use tokensync_store::MemoryVariableStore;

use crate::error::{CliError, Result};

/// Import `document` into the snapshot store at `store_path`
pub async fn run_import(document: &Path, store_path: &Path, json: bool) -> Result<()> {
    let bytes = fs::read(document).map_err(|e| {
        CliError::user(format!("Cannot read {}: {}", document.display(), e))
    })?;
    let tokens = TokenDocument::from_slice(&bytes)?;

    let store = MemoryVariableStore::load(store_path)?;
    let report = SyncEngine::new(&store).import(&tokens).await?;
    store.save(store_path).await?;

    if json {
        let output = json!({
            "groups": report.groups,
            "diagnostics": report
                .diagnostics
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&report, document);
    }
    Ok(())
}

fn print_report(report: &ImportReport, document: &Path) {
    println!(
        "{} {}",
        "Imported".green().bold(),
        document.display().to_string().yellow()
    );

    for group in &report.groups {
        println!(
            "  {} {} created, {} updated, {} aliases, {} fallbacks, {} skipped",
            group.name.cyan(),
            group.created,
            group.updated,
            group.aliases_linked,
            group.fallbacks,
            group.skipped
        );
        if !group.stale.is_empty() {
            println!(
                "    {} not in document: {}",
                "stale".yellow(),
                group.stale.join(", ")
            );
        }
    }

    if !report.diagnostics.is_empty() {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for diagnostic in &report.diagnostics {
            println!("  {} {}", "!".yellow(), diagnostic);
        }
    }
}
