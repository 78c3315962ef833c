//! Diff command implementation
//!
//! Previews what export would change in the output file without writing it.

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use tokensync_core::{DiffGate, GateDecision, SemanticChange, SyncEngine};
use tokensync_store::MemoryVariableStore;

use super::export::read_optional;
use crate::error::Result;

/// Run the diff command
pub async fn run_diff(store_path: &Path, output: &Path, json: bool) -> Result<()> {
    let store = MemoryVariableStore::load(store_path)?;
    let export = SyncEngine::new(&store).export().await?;
    let previous = read_optional(output)?;

    let decision = DiffGate::evaluate(previous.as_deref(), &export.content);
    let changes: &[SemanticChange] = match &decision {
        GateDecision::Unchanged => &[],
        GateDecision::Changed(change) => &change.changes,
    };

    if json {
        let json_output = json!({
            "has_changes": decision.is_changed(),
            "changes": changes.iter().map(change_json).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    } else {
        print_diff_output(&decision, changes, output);
    }
    Ok(())
}

fn change_json(change: &SemanticChange) -> serde_json::Value {
    match change {
        SemanticChange::Added { path, value } => {
            json!({ "action": "added", "path": path, "value": value })
        }
        SemanticChange::Removed { path, value } => {
            json!({ "action": "removed", "path": path, "value": value })
        }
        SemanticChange::Modified { path, old, new } => {
            json!({ "action": "modified", "path": path, "old": old, "new": new })
        }
    }
}

/// Print human-readable diff-style output
fn print_diff_output(decision: &GateDecision, changes: &[SemanticChange], output: &Path) {
    if !decision.is_changed() {
        println!(
            "{} No changes. {} is in sync.",
            "OK".green().bold(),
            output.display()
        );
        return;
    }

    println!("{} {}", "Diff".blue().bold(), output.display().to_string().yellow());
    println!();

    if changes.is_empty() {
        println!("  {} formatting only", "~".yellow());
        return;
    }

    for change in changes {
        match change {
            SemanticChange::Added { path, .. } => println!("  {} {}", "+".green(), path),
            SemanticChange::Removed { path, .. } => println!("  {} {}", "-".red(), path),
            SemanticChange::Modified { path, old, new } => println!(
                "  {} {}: {} -> {}",
                "~".yellow(),
                path,
                token_value(old),
                token_value(new)
            ),
        }
    }
}

/// The `$value` of a token, or the whole JSON for anything else
fn token_value(value: &serde_json::Value) -> String {
    value
        .get(tokensync_model::VALUE_KEY)
        .unwrap_or(value)
        .to_string()
}
