//! DocumentRemote trait and request/response types

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::{Error, Result};

/// The only content encoding accepted from a remote
pub const BASE64_ENCODING: &str = "base64";

/// File content as returned by a remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteContent {
    pub path: String,
    /// Encoding tag of `content`
    pub encoding: String,
    /// Encoded payload, possibly wrapped across lines
    pub content: String,
    /// Revision of the file, used as the concurrency token on write
    pub sha: String,
}

impl RemoteContent {
    /// Wrap raw bytes as base64 content, broken into 60-column lines
    pub fn from_bytes(path: impl Into<String>, bytes: &[u8], sha: impl Into<String>) -> Self {
        let encoded = STANDARD.encode(bytes);
        let wrapped = encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            path: path.into(),
            encoding: BASE64_ENCODING.to_string(),
            content: wrapped,
            sha: sha.into(),
        }
    }

    /// Decode the payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedEncoding`] for anything but base64, and
    /// [`Error::Base64`] if the payload does not decode.
    pub fn decode(&self) -> Result<Vec<u8>> {
        if self.encoding != BASE64_ENCODING {
            return Err(Error::UnexpectedEncoding {
                path: self.path.clone(),
                encoding: self.encoding.clone(),
            });
        }

        let compact: String = self.content.chars().filter(|c| *c != '\n').collect();
        Ok(STANDARD.decode(compact)?)
    }
}

/// A conditional file write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub path: String,
    pub branch: String,
    pub message: String,
    pub content: Vec<u8>,
    /// Revision the write is based on; `None` creates a new file
    pub sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub head: String,
    pub base: String,
    pub labels: Vec<String>,
}

/// The repository that stores the token document.
///
/// Operations are sequenced by the caller and never retried here.
#[async_trait]
pub trait DocumentRemote: Send + Sync {
    /// Read a file at a branch or revision; `None` if it does not exist
    async fn fetch_content(&self, path: &str, reference: &str) -> Result<Option<RemoteContent>>;

    /// Head revision of a branch; `None` if the branch does not exist
    async fn branch_sha(&self, branch: &str) -> Result<Option<String>>;

    async fn branch_exists(&self, branch: &str) -> Result<bool> {
        Ok(self.branch_sha(branch).await?.is_some())
    }

    /// Create a branch at a base revision
    async fn create_branch(&self, name: &str, from_sha: &str) -> Result<()>;

    /// Write a file, returning its new revision.
    ///
    /// Fails with [`Error::Conflict`] when `request.sha` is stale.
    async fn write_content(&self, request: WriteRequest) -> Result<String>;

    async fn create_pull_request(&self, request: PullRequestRequest) -> Result<PullRequest>;

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()>;
}
