//! Integration tests for the in-memory stores.

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokensync_color::Rgba;
use tokensync_model::{VariableKind, VariableValue};
use tokensync_store::{
    DocumentRemote, Error, MemoryRemote, MemoryVariableStore, PullRequestRequest, VariableStore,
    WriteRequest,
};

// ==========================================================================
// Variable store snapshots
// ==========================================================================

#[tokio::test]
async fn test_snapshot_round_trip_through_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state").join("variables.json");

    let store = MemoryVariableStore::new();
    let group = store.create_group("Primitives").await.unwrap();
    let mode = group.modes[0].id.clone();
    let red = store
        .create_variable(&group.id, "color/red", VariableKind::Color)
        .await
        .unwrap();
    store
        .set_value(&red.id, &mode, VariableValue::Color(Rgba::opaque(1.0, 0.0, 0.0)))
        .await
        .unwrap();
    store.save(&path).await.unwrap();

    let loaded = MemoryVariableStore::load(&path).unwrap();
    assert_eq!(loaded.snapshot().await, store.snapshot().await);
    assert_eq!(
        loaded.find("Primitives", "color/red").await.unwrap().kind,
        VariableKind::Color
    );
}

#[tokio::test]
async fn test_missing_snapshot_starts_empty() {
    let temp = TempDir::new().unwrap();
    let store = MemoryVariableStore::load(&temp.path().join("absent.json")).unwrap();
    assert!(store.groups().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_snapshot_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("variables.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        MemoryVariableStore::load(&path),
        Err(Error::Json(_))
    ));
}

// ==========================================================================
// Document remote
// ==========================================================================

fn seeded_remote() -> MemoryRemote {
    MemoryRemote::new("main").with_file("main", "tokens.json", b"{}".to_vec())
}

#[tokio::test]
async fn test_fetch_returns_base64_with_sha() {
    let remote = seeded_remote();
    let content = remote
        .fetch_content("tokens.json", "main")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(content.encoding, "base64");
    assert_eq!(content.decode().unwrap(), b"{}");
    assert!(!content.sha.is_empty());
}

#[tokio::test]
async fn test_fetch_missing_file_is_none() {
    let remote = seeded_remote();
    assert!(
        remote
            .fetch_content("other.json", "main")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_create_branch_from_head() {
    let remote = seeded_remote();
    let head = remote.branch_sha("main").await.unwrap().unwrap();

    assert!(!remote.branch_exists("tokens/update").await.unwrap());
    remote.create_branch("tokens/update", &head).await.unwrap();
    assert!(remote.branch_exists("tokens/update").await.unwrap());
    assert_eq!(
        remote.file("tokens/update", "tokens.json").await.unwrap(),
        b"{}"
    );

    let err = remote
        .create_branch("tokens/update", &head)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_create_branch_from_unknown_revision() {
    let remote = seeded_remote();
    let err = remote.create_branch("x", "deadbeef").await.unwrap_err();
    assert!(matches!(err, Error::RevisionNotFound { .. }));
}

#[tokio::test]
async fn test_write_with_current_sha_succeeds_and_stale_sha_conflicts() {
    let remote = seeded_remote();
    let current = remote
        .fetch_content("tokens.json", "main")
        .await
        .unwrap()
        .unwrap();

    let request = WriteRequest {
        path: "tokens.json".to_string(),
        branch: "main".to_string(),
        message: "Design token update".to_string(),
        content: b"{\"a\":1}".to_vec(),
        sha: Some(current.sha.clone()),
    };
    let new_sha = remote.write_content(request.clone()).await.unwrap();
    assert_ne!(new_sha, current.sha);
    assert_eq!(
        remote.file("main", "tokens.json").await.unwrap(),
        b"{\"a\":1}"
    );

    let err = remote.write_content(request).await.unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
}

#[tokio::test]
async fn test_pull_request_and_labels() {
    let remote = seeded_remote();
    let head = remote.branch_sha("main").await.unwrap().unwrap();
    remote.create_branch("tokens/update", &head).await.unwrap();

    let request = PullRequestRequest {
        title: "Design token update".to_string(),
        body: "Automated".to_string(),
        head: "tokens/update".to_string(),
        base: "main".to_string(),
    };
    let pull = remote.create_pull_request(request.clone()).await.unwrap();
    assert_eq!(pull.number, 1);

    remote
        .add_labels(pull.number, &["Type: Design Token".to_string()])
        .await
        .unwrap();
    assert_eq!(
        remote.pull_requests().await[0].labels,
        vec!["Type: Design Token".to_string()]
    );

    let err = remote.create_pull_request(request).await.unwrap_err();
    assert!(matches!(err, Error::PullRequestExists { .. }));
}

#[tokio::test]
async fn test_encoding_override_is_reported() {
    let remote = seeded_remote().with_encoding("none");
    let content = remote
        .fetch_content("tokens.json", "main")
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(
        content.decode(),
        Err(Error::UnexpectedEncoding { .. })
    ));
}
