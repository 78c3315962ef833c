//! In-memory DocumentRemote

use std::collections::BTreeMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::remote::{
    BASE64_ENCODING, DocumentRemote, PullRequest, PullRequestRequest, RemoteContent, WriteRequest,
};
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
struct Branch {
    head: String,
    files: BTreeMap<String, Vec<u8>>,
}

#[derive(Debug, Default)]
struct State {
    branches: BTreeMap<String, Branch>,
    pulls: Vec<PullRequest>,
}

/// A [`DocumentRemote`] held in memory.
///
/// Branches are snapshots of a file map; file revisions are SHA-256 digests
/// of the content, and every write moves the branch head.
#[derive(Debug)]
pub struct MemoryRemote {
    state: RwLock<State>,
    encoding: String,
}

impl MemoryRemote {
    /// Create a remote with one empty branch
    pub fn new(default_branch: &str) -> Self {
        let mut branches = BTreeMap::new();
        branches.insert(
            default_branch.to_string(),
            Branch {
                head: digest(default_branch.as_bytes()),
                files: BTreeMap::new(),
            },
        );

        Self {
            state: RwLock::new(State {
                branches,
                pulls: Vec::new(),
            }),
            encoding: BASE64_ENCODING.to_string(),
        }
    }

    /// Seed a file on an existing branch, moving its head
    pub fn with_file(mut self, branch: &str, path: &str, content: impl Into<Vec<u8>>) -> Self {
        if let Some(b) = self.state.get_mut().branches.get_mut(branch) {
            let content = content.into();
            b.head = next_head(&b.head, path, &content);
            b.files.insert(path.to_string(), content);
        }
        self
    }

    /// Report a different encoding tag on every fetch
    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    /// Current content of a file on a branch
    pub async fn file(&self, branch: &str, path: &str) -> Option<Vec<u8>> {
        let state = self.state.read().await;
        state.branches.get(branch)?.files.get(path).cloned()
    }

    pub async fn pull_requests(&self) -> Vec<PullRequest> {
        self.state.read().await.pulls.clone()
    }
}

#[async_trait]
impl DocumentRemote for MemoryRemote {
    async fn fetch_content(&self, path: &str, reference: &str) -> Result<Option<RemoteContent>> {
        let state = self.state.read().await;
        let branch = state
            .branches
            .get(reference)
            .or_else(|| state.branches.values().find(|b| b.head == reference))
            .ok_or_else(|| Error::BranchNotFound {
                name: reference.to_string(),
            })?;

        Ok(branch.files.get(path).map(|bytes| {
            let mut content = RemoteContent::from_bytes(path, bytes, digest(bytes));
            content.encoding = self.encoding.clone();
            content
        }))
    }

    async fn branch_sha(&self, branch: &str) -> Result<Option<String>> {
        let state = self.state.read().await;
        Ok(state.branches.get(branch).map(|b| b.head.clone()))
    }

    async fn create_branch(&self, name: &str, from_sha: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.branches.contains_key(name) {
            return Err(Error::BranchExists {
                name: name.to_string(),
            });
        }

        let base = state
            .branches
            .values()
            .find(|b| b.head == from_sha)
            .cloned()
            .ok_or_else(|| Error::RevisionNotFound {
                sha: from_sha.to_string(),
            })?;

        state.branches.insert(name.to_string(), base);
        Ok(())
    }

    async fn write_content(&self, request: WriteRequest) -> Result<String> {
        let mut state = self.state.write().await;
        let branch = state
            .branches
            .get_mut(&request.branch)
            .ok_or_else(|| Error::BranchNotFound {
                name: request.branch.clone(),
            })?;

        let actual = branch.files.get(&request.path).map(|bytes| digest(bytes));
        if actual != request.sha {
            return Err(Error::Conflict {
                path: request.path,
                expected: request.sha,
                actual,
            });
        }

        let sha = digest(&request.content);
        branch.head = next_head(&branch.head, &request.path, &request.content);
        branch.files.insert(request.path, request.content);
        Ok(sha)
    }

    async fn create_pull_request(&self, request: PullRequestRequest) -> Result<PullRequest> {
        let mut state = self.state.write().await;

        for name in [&request.head, &request.base] {
            if !state.branches.contains_key(name) {
                return Err(Error::BranchNotFound { name: name.clone() });
            }
        }

        if state
            .pulls
            .iter()
            .any(|p| p.head == request.head && p.base == request.base)
        {
            return Err(Error::PullRequestExists {
                head: request.head,
                base: request.base,
            });
        }

        let pull = PullRequest {
            number: state.pulls.len() as u64 + 1,
            title: request.title,
            head: request.head,
            base: request.base,
            labels: Vec::new(),
        };
        state.pulls.push(pull.clone());
        Ok(pull)
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        let mut state = self.state.write().await;
        let pull = state
            .pulls
            .iter_mut()
            .find(|p| p.number == number)
            .ok_or(Error::PullRequestNotFound { number })?;

        for label in labels {
            if !pull.labels.contains(label) {
                pull.labels.push(label.clone());
            }
        }
        Ok(())
    }
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn next_head(parent: &str, path: &str, content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(parent.as_bytes());
    hasher.update(path.as_bytes());
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
