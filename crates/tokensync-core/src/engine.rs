//! SyncEngine implementation
//!
//! The SyncEngine moves design tokens between a token document and a
//! variable store, and between the store and a remote repository.

use tokensync_model::TokenDocument;
use tokensync_store::{
    DocumentRemote, Error as StoreError, PullRequestRequest, VariableStore, WriteRequest,
};
use tracing::{info, warn};

use crate::collections::CollectionManager;
use crate::context::ResolutionContext;
use crate::diagnostics::Diagnostic;
use crate::diff_gate::{DiffGate, GateDecision};
use crate::export::{Export, Exporter};
use crate::materializer::materialize;
use crate::progress::{NullProgress, Progress, ProgressSink};
use crate::report::{ImportReport, PushOutcome};
use crate::resolver::close_pending;
use crate::settings::RemoteSettings;
use crate::walker::{duplicate_keys, flatten};
use crate::{Error, Result};

static NULL_PROGRESS: NullProgress = NullProgress;

/// Engine for synchronizing design tokens
///
/// The SyncEngine provides four operations:
/// - **import**: Write a token document into the variable store
/// - **export**: Render the variable store as a token document
/// - **pull**: Fetch a token document from a remote and import it
/// - **push**: Export and propose the result on a remote branch
///
/// Runs are sequential; nothing is rolled back when a run fails midway.
pub struct SyncEngine<'a, S: VariableStore + ?Sized> {
    store: &'a S,
    progress: &'a dyn ProgressSink,
}

impl<'a, S: VariableStore + ?Sized> SyncEngine<'a, S> {
    /// Create an engine over a store, discarding progress events
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            progress: &NULL_PROGRESS,
        }
    }

    /// Report progress to `sink`
    pub fn with_progress(mut self, sink: &'a dyn ProgressSink) -> Self {
        self.progress = sink;
        self
    }

    /// Import a token document.
    ///
    /// Groups are matched by name (created if absent) and every token is
    /// upserted by its flat key. Aliases are linked once all groups are
    /// written, so references may point forward and across groups.
    /// Existing variables the document does not mention are left alone.
    ///
    /// # Errors
    ///
    /// Fails only on store errors. Problems with individual tokens are
    /// absorbed and listed in the report's diagnostics.
    pub async fn import(&self, document: &TokenDocument) -> Result<ImportReport> {
        info!(groups = document.groups.len(), "Importing token document");
        let mut collections = CollectionManager::load(self.store).await?;
        let mut ctx = ResolutionContext::new();

        for group in &document.groups {
            self.progress
                .log(format!("Importing collection \"{}\"", group.name));
            let index = collections
                .open(self.store, &group.name, &mut ctx.diagnostics)
                .await?;
            ctx.insert_group(index);

            let tokens = flatten(&group.root);
            for key in duplicate_keys(&tokens) {
                ctx.diagnostics.push(Diagnostic::DuplicateFlatKey {
                    group: group.name.clone(),
                    key,
                });
            }
            for token in &tokens {
                materialize(self.store, &mut ctx, &group.name, token).await?;
            }
        }

        close_pending(self.store, &collections, &mut ctx).await?;

        let report = ctx.into_report();
        for diagnostic in &report.diagnostics {
            self.progress.log(diagnostic.to_string());
        }
        info!(
            created = report.created(),
            updated = report.updated(),
            aliases = report.aliases_linked(),
            fallbacks = report.fallbacks(),
            skipped = report.skipped(),
            "Import complete"
        );
        self.progress.emit(Progress::ImportComplete(report.clone()));
        Ok(report)
    }

    /// Import a document from JSON bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the bytes are not a token document.
    pub async fn import_slice(&self, bytes: &[u8]) -> Result<ImportReport> {
        let document = TokenDocument::from_slice(bytes)?;
        self.import(&document).await
    }

    /// Export every group in the store
    pub async fn export(&self) -> Result<Export> {
        let export = Exporter::new(self.store).export().await?;
        for diagnostic in &export.diagnostics {
            self.progress.log(diagnostic.to_string());
        }
        info!(groups = export.document.groups.len(), "Export complete");
        Ok(export)
    }

    /// Fetch the token document from the source branch and import it
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentNotFound`] if the file is absent, and decode
    /// errors if it is not base64-encoded JSON.
    pub async fn pull<R: DocumentRemote + ?Sized>(
        &self,
        remote: &R,
        settings: &RemoteSettings,
    ) -> Result<ImportReport> {
        self.progress.log(format!(
            "Fetching {} from {}",
            settings.path, settings.source_branch
        ));
        let content = remote
            .fetch_content(&settings.path, &settings.source_branch)
            .await?
            .ok_or_else(|| Error::DocumentNotFound {
                path: settings.path.clone(),
                reference: settings.source_branch.clone(),
            })?;

        let bytes = content.decode()?;
        self.import_slice(&bytes).await
    }

    /// Export and propose the result on the export branch.
    ///
    /// The export branch is created from the base branch when absent. The
    /// document is written only when it differs from what the branch holds,
    /// and a pull request is opened for the write. An already open pull
    /// request for the branch is not an error.
    ///
    /// # Errors
    ///
    /// Any remote failure other than an existing pull request aborts the
    /// push. A stale file revision surfaces as a conflict (see
    /// [`Error::is_conflict`]).
    pub async fn push<R: DocumentRemote + ?Sized>(
        &self,
        remote: &R,
        settings: &RemoteSettings,
    ) -> Result<PushOutcome> {
        let export = self.export().await?;

        self.progress.log("Getting base branch revision".to_string());
        let base_sha = remote
            .branch_sha(&settings.base_branch)
            .await?
            .ok_or_else(|| Error::BaseBranchMissing {
                branch: settings.base_branch.clone(),
            })?;

        self.progress.log("Checking export branch".to_string());
        if !remote.branch_exists(&settings.export_branch).await? {
            self.progress
                .log(format!("Creating branch {}", settings.export_branch));
            remote
                .create_branch(&settings.export_branch, &base_sha)
                .await?;
        }

        self.progress.log("Checking existing file".to_string());
        let Some(existing) = remote
            .fetch_content(&settings.path, &settings.export_branch)
            .await?
        else {
            warn!(path = %settings.path, "No token document on the export branch, nothing written");
            self.progress.log(format!(
                "{} does not exist on {}, skipping",
                settings.path, settings.export_branch
            ));
            return self.finish_push(PushOutcome::TargetMissing);
        };

        let previous = String::from_utf8(existing.decode()?)?;
        let change = match DiffGate::evaluate(Some(&previous), &export.content) {
            GateDecision::Unchanged => {
                self.progress.log("No changes to push".to_string());
                return self.finish_push(PushOutcome::Unchanged);
            }
            GateDecision::Changed(change) => change,
        };
        info!(
            changes = change.changes.len(),
            similarity = change.similarity,
            "Export differs from remote"
        );

        self.progress.log("Committing file update".to_string());
        let sha = remote
            .write_content(WriteRequest {
                path: settings.path.clone(),
                branch: settings.export_branch.clone(),
                message: settings.commit_message.clone(),
                content: export.content.into_bytes(),
                sha: Some(existing.sha),
            })
            .await?;

        self.progress.log("Creating pull request".to_string());
        let pull_request = match remote
            .create_pull_request(PullRequestRequest {
                title: settings.pull_request_title.clone(),
                body: settings.pull_request_body.clone(),
                head: settings.export_branch.clone(),
                base: settings.base_branch.clone(),
            })
            .await
        {
            Ok(pull) => {
                self.progress
                    .log(format!("Created pull request #{}", pull.number));
                if !settings.labels.is_empty() {
                    remote.add_labels(pull.number, &settings.labels).await?;
                    self.progress
                        .log(format!("Added labels: {}", settings.labels.join(", ")));
                }
                Some(pull.number)
            }
            Err(StoreError::PullRequestExists { head, base }) => {
                info!(%head, %base, "Pull request already open");
                self.progress
                    .log(format!("A pull request from {} to {} is already open", head, base));
                None
            }
            Err(e) => return Err(e.into()),
        };

        self.finish_push(PushOutcome::Written {
            sha,
            changes: change.changes,
            pull_request,
        })
    }

    fn finish_push(&self, outcome: PushOutcome) -> Result<PushOutcome> {
        self.progress.emit(Progress::ExportComplete(outcome.clone()));
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokensync_model::{VariableKind, VariableValue};
    use tokensync_store::{MemoryRemote, MemoryVariableStore};

    use crate::progress::CollectProgress;

    fn document(value: serde_json::Value) -> TokenDocument {
        TokenDocument::from_value(&value).unwrap()
    }

    #[tokio::test]
    async fn test_import_forward_reference_in_same_group() {
        let store = MemoryVariableStore::new();
        let engine = SyncEngine::new(&store);

        let report = engine
            .import(&document(json!({
                "P": {
                    "a": { "$type": "color", "$value": "{b}" },
                    "b": { "$type": "color", "$value": "#00ff00" }
                }
            })))
            .await
            .unwrap();

        assert!(report.is_clean(), "{:?}", report.diagnostics);
        let a = store.find("P", "a").await.unwrap();
        let b = store.find("P", "b").await.unwrap();
        assert_eq!(a.kind, VariableKind::Color);
        assert_eq!(
            a.values.values().next(),
            Some(&VariableValue::Alias(b.id.clone()))
        );
    }

    #[tokio::test]
    async fn test_import_emits_progress() {
        let store = MemoryVariableStore::new();
        let sink = CollectProgress::new();
        let engine = SyncEngine::new(&store).with_progress(&sink);

        engine
            .import(&document(json!({ "P": { "x": { "$type": "number", "$value": 1 } } })))
            .await
            .unwrap();

        let events = sink.events();
        assert!(matches!(events.last(), Some(Progress::ImportComplete(_))));
        assert!(sink.messages()[0].contains("\"P\""));
    }

    #[tokio::test]
    async fn test_duplicate_flat_key_is_reported() {
        let store = MemoryVariableStore::new();
        let report = SyncEngine::new(&store)
            .import(&document(json!({
                "P": {
                    "a/b": { "$type": "number", "$value": 1 },
                    "a": { "b": { "$type": "number", "$value": 2 } }
                }
            })))
            .await
            .unwrap();

        assert!(report.diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::DuplicateFlatKey { key, .. } if key == "a/b"
        )));
        assert_eq!(store.variable_count().await, 1);
    }

    #[tokio::test]
    async fn test_push_target_missing_writes_nothing() {
        let store = MemoryVariableStore::new();
        let remote = MemoryRemote::new("main");
        let outcome = SyncEngine::new(&store)
            .push(&remote, &RemoteSettings::default())
            .await
            .unwrap();

        assert_eq!(outcome, PushOutcome::TargetMissing);
        assert!(remote.branch_exists("design-tokens").await.unwrap());
        assert!(remote.pull_requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_push_without_base_branch_fails() {
        let store = MemoryVariableStore::new();
        let remote = MemoryRemote::new("trunk");
        let err = SyncEngine::new(&store)
            .push(&remote, &RemoteSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BaseBranchMissing { .. }));
    }

    #[tokio::test]
    async fn test_pull_missing_document() {
        let store = MemoryVariableStore::new();
        let remote = MemoryRemote::new("main");
        let err = SyncEngine::new(&store)
            .pull(&remote, &RemoteSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound { .. }));
    }
}
