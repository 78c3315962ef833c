//! Export command implementation

use std::fs;
use std::path::Path;

use colored::Colorize;

use tokensync_core::{DiffGate, GateDecision, SyncEngine};
use tokensync_store::MemoryVariableStore;

use crate::error::Result;

/// Read a file that may not exist yet
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Export the snapshot store, printing the document or writing it to
/// `output` when its content changed
pub async fn run_export(store_path: &Path, output: Option<&Path>) -> Result<()> {
    let store = MemoryVariableStore::load(store_path)?;
    let export = SyncEngine::new(&store).export().await?;

    let Some(output) = output else {
        println!("{}", export.content);
        return Ok(());
    };

    let previous = read_optional(output)?;
    match DiffGate::evaluate(previous.as_deref(), &export.content) {
        GateDecision::Unchanged => {
            println!(
                "{} {} is up to date",
                "OK".green().bold(),
                output.display()
            );
        }
        GateDecision::Changed(change) => {
            if let Some(parent) = output.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(output, &export.content)?;
            println!(
                "{} {} ({} token changes)",
                "Wrote".green().bold(),
                output.display(),
                change.changes.len()
            );
        }
    }
    Ok(())
}
