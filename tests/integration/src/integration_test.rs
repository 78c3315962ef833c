//! End-to-end integration test for the import/export cycle
//!
//! Exercises the complete flow: document parse -> import into a persisted
//! store -> export -> re-import of the export.

use std::fs;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokensync_core::{DiffGate, GateDecision, SyncEngine};
use tokensync_model::{TokenDocument, VariableValue};
use tokensync_store::{MemoryVariableStore, VariableStore};

/// A design system spread over three groups, with forward and
/// cross-group references
fn design_system() -> Value {
    json!({
        "Core": {
            "$description": "raw palette",
            "blue": {
                "500": { "$type": "color", "$value": "#3366ff" },
                "600": { "$type": "color", "$value": "hsl(225, 100%, 45%)" }
            },
            "radius": {
                "sm": { "$type": "borderRadius", "$value": "2px" },
                "md": { "$type": "borderRadius", "$value": 4 }
            },
            "font": {
                "body": { "$type": "fontFamily", "$value": ["Inter", "Helvetica", "sans-serif"] }
            }
        },
        "Brand": {
            "primary": { "$type": "color", "$value": "{Core.blue.500}" },
            "primary-hover": { "$type": "color", "$value": "{Core.blue.600}" },
            "corner": { "$type": "borderRadius", "$value": "{Core.radius.md}" }
        },
        "Alpha": {
            "action": { "$type": "color", "$value": "{Brand.primary}" },
            "scrim": { "$type": "color", "$value": "rgba(0, 0, 0, 0.4)" }
        }
    })
}

#[tokio::test]
async fn test_full_cycle_through_persisted_store() {
    let temp = TempDir::new().unwrap();
    let snapshot = temp.path().join("variables.json");
    let document = TokenDocument::from_value(&design_system()).unwrap();

    // Import and persist
    let store = MemoryVariableStore::load(&snapshot).unwrap();
    let report = SyncEngine::new(&store).import(&document).await.unwrap();
    assert!(report.is_clean(), "{:?}", report.diagnostics);
    assert_eq!(report.created(), 10);
    assert_eq!(report.aliases_linked(), 4);
    store.save(&snapshot).await.unwrap();

    // Reload and export
    let reloaded = MemoryVariableStore::load(&snapshot).unwrap();
    let export = SyncEngine::new(&reloaded).export().await.unwrap();
    let exported: Value = serde_json::from_str(&export.content).unwrap();

    assert_eq!(
        exported["Alpha"]["action"],
        json!({ "$type": "color", "$value": "{Brand.primary}" })
    );
    assert_eq!(
        exported["Brand"]["corner"],
        json!({ "$type": "number", "$value": "{Core.radius.md}" })
    );
    assert_eq!(
        exported["Core"]["font"]["body"]["$value"],
        "Inter, Helvetica, sans-serif"
    );
    assert_eq!(exported["Core"]["radius"]["sm"]["$value"], 2);
    assert_eq!(
        exported["Alpha"]["scrim"]["$value"],
        "rgba(0, 0, 0, 0.4000)"
    );
    assert!(exported["Core"].get("$description").is_none());
}

#[tokio::test]
async fn test_export_reimports_into_identical_store() {
    let store = MemoryVariableStore::new();
    let engine = SyncEngine::new(&store);
    engine
        .import(&TokenDocument::from_value(&design_system()).unwrap())
        .await
        .unwrap();
    let first = engine.export().await.unwrap();

    // Importing the export creates nothing, and exporting again is
    // byte-identical
    let before = store.variable_count().await;
    let report = engine
        .import(&TokenDocument::from_json_str(&first.content).unwrap())
        .await
        .unwrap();
    assert_eq!(report.created(), 0);
    assert!(report.is_clean(), "{:?}", report.diagnostics);

    let second = engine.export().await.unwrap();
    assert_eq!(first.content, second.content);
    assert_eq!(
        DiffGate::evaluate(Some(&first.content), &second.content),
        GateDecision::Unchanged
    );
    assert_eq!(store.variable_count().await, before);
}

#[tokio::test]
async fn test_export_into_fresh_store_reproduces_graph_shape() {
    let source = MemoryVariableStore::new();
    SyncEngine::new(&source)
        .import(&TokenDocument::from_value(&design_system()).unwrap())
        .await
        .unwrap();
    let exported = SyncEngine::new(&source).export().await.unwrap().content;

    let target = MemoryVariableStore::new();
    let engine = SyncEngine::new(&target);
    engine
        .import(&TokenDocument::from_json_str(&exported).unwrap())
        .await
        .unwrap();

    assert_eq!(engine.export().await.unwrap().content, exported);
    assert_eq!(target.variable_count().await, source.variable_count().await);

    let action = target.find("Alpha", "action").await.unwrap();
    let Some(VariableValue::Alias(id)) = action.values.values().next() else {
        panic!("Alpha/action should be an alias");
    };
    let primary = target.variable(id).await.unwrap().unwrap();
    assert_eq!(primary.name, "primary");
}

#[tokio::test]
async fn test_document_file_on_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tokens.json");
    fs::write(&path, serde_json::to_string_pretty(&design_system()).unwrap()).unwrap();

    let store = MemoryVariableStore::new();
    let report = SyncEngine::new(&store)
        .import_slice(&fs::read(&path).unwrap())
        .await
        .unwrap();

    assert_eq!(
        report.groups.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
        vec!["Alpha", "Brand", "Core"]
    );
    assert_eq!(store.groups().await.unwrap().len(), 3);
}
