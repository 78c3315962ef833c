//! Pull and push against an in-memory remote, with progress reported over
//! a channel.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokensync_core::{Error, Progress, PushOutcome, RemoteSettings, SyncEngine};
use tokensync_store::{MemoryRemote, MemoryVariableStore};
use tokio::sync::mpsc;

fn settings() -> RemoteSettings {
    RemoteSettings {
        path: "design/tokens.json".to_string(),
        export_branch: "tokens/sync".to_string(),
        pull_request_title: "Sync tokens".to_string(),
        labels: vec!["design".to_string(), "automated".to_string()],
        ..RemoteSettings::default()
    }
}

fn seeded_remote(document: &Value) -> MemoryRemote {
    MemoryRemote::new("main").with_file(
        "main",
        "design/tokens.json",
        serde_json::to_string_pretty(document).unwrap().into_bytes(),
    )
}

fn drain(mut rx: mpsc::UnboundedReceiver<Progress>) -> Vec<Progress> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pull_edit_push_round_trip() {
    let remote = seeded_remote(&json!({
        "Palette": {
            "ink": { "$type": "color", "$value": "#111111" },
            "paper": { "$type": "color", "$value": "#fafafa" }
        },
        "Theme": {
            "text": { "$type": "color", "$value": "{Palette.ink}" }
        }
    }));
    let store = MemoryVariableStore::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = SyncEngine::new(&store).with_progress(&tx);
    let settings = settings();

    let report = engine.pull(&remote, &settings).await.unwrap();
    assert_eq!(report.created(), 3);
    assert_eq!(report.aliases_linked(), 1);

    // Repoint the alias and push
    engine
        .import_slice(br#"{ "Theme": { "text": { "$type": "color", "$value": "{Palette.paper}" } } }"#)
        .await
        .unwrap();
    let outcome = engine.push(&remote, &settings).await.unwrap();

    let PushOutcome::Written {
        changes,
        pull_request,
        ..
    } = &outcome
    else {
        panic!("expected a write, got {outcome:?}");
    };
    assert_eq!(
        changes.iter().map(|c| c.path()).collect::<Vec<_>>(),
        vec!["Theme.text"]
    );
    assert_eq!(*pull_request, Some(1));

    let written = remote
        .file("tokens/sync", "design/tokens.json")
        .await
        .unwrap();
    let written: Value = serde_json::from_slice(&written).unwrap();
    assert_eq!(written["Theme"]["text"]["$value"], "{Palette.paper}");

    let pulls = remote.pull_requests().await;
    assert_eq!(pulls.len(), 1);
    assert_eq!(pulls[0].title, "Sync tokens");
    assert_eq!(pulls[0].head, "tokens/sync");
    assert_eq!(
        pulls[0].labels,
        vec!["design".to_string(), "automated".to_string()]
    );

    drop(engine);
    let events = drain(rx);
    assert!(matches!(events.first(), Some(Progress::Log(_))));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Progress::ImportComplete(_)))
            .count(),
        2
    );
    assert_eq!(events.last(), Some(&Progress::ExportComplete(outcome)));
    assert!(events.iter().any(|e| matches!(
        e,
        Progress::Log(message) if message == "Creating branch tokens/sync"
    )));
}

#[tokio::test]
async fn test_push_skips_when_export_branch_has_no_document() {
    let remote = MemoryRemote::new("main");
    let store = MemoryVariableStore::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = SyncEngine::new(&store).with_progress(&tx);
    engine
        .import_slice(br##"{ "G": { "c": { "$type": "color", "$value": "#123456" } } }"##)
        .await
        .unwrap();

    let outcome = engine.push(&remote, &settings()).await.unwrap();

    assert_eq!(outcome, PushOutcome::TargetMissing);
    assert!(remote.file("tokens/sync", "design/tokens.json").await.is_none());
    assert!(remote.pull_requests().await.is_empty());

    drop(engine);
    assert_eq!(
        drain(rx).last(),
        Some(&Progress::ExportComplete(PushOutcome::TargetMissing))
    );
}

#[tokio::test]
async fn test_pull_without_document_fails() {
    let remote = MemoryRemote::new("main");
    let store = MemoryVariableStore::new();

    let err = SyncEngine::new(&store)
        .pull(&remote, &settings())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DocumentNotFound { ref path, .. } if path == "design/tokens.json"));
}

#[tokio::test]
async fn test_push_without_base_branch_fails() {
    let remote = MemoryRemote::new("trunk");
    let store = MemoryVariableStore::new();

    let err = SyncEngine::new(&store)
        .push(&remote, &settings())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BaseBranchMissing { ref branch } if branch == "main"));
}

#[tokio::test]
async fn test_progress_survives_dropped_receiver() {
    let remote = seeded_remote(&json!({
        "G": { "n": { "$type": "number", "$value": 8 } }
    }));
    let store = MemoryVariableStore::new();
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);

    let report = SyncEngine::new(&store)
        .with_progress(&tx)
        .pull(&remote, &settings())
        .await
        .unwrap();
    assert_eq!(report.created(), 1);
}
