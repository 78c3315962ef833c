//! Remote flow settings

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "tokens.json".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_export_branch() -> String {
    "design-tokens".to_string()
}

fn default_message() -> String {
    "Design token update".to_string()
}

fn default_title() -> String {
    "Design token update".to_string()
}

fn default_body() -> String {
    "Automated design token export".to_string()
}

fn default_labels() -> Vec<String> {
    vec!["Type: Design Token".to_string()]
}

/// Where the token document lives and how updates are proposed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RemoteSettings {
    /// File path of the token document inside the repository
    #[serde(default = "default_path")]
    pub path: String,
    /// Branch read by pull
    #[serde(default = "default_branch")]
    pub source_branch: String,
    /// Branch new export branches start from and pull requests target
    #[serde(default = "default_branch")]
    pub base_branch: String,
    /// Branch push writes to
    #[serde(default = "default_export_branch")]
    pub export_branch: String,
    #[serde(default = "default_message")]
    pub commit_message: String,
    #[serde(default = "default_title")]
    pub pull_request_title: String,
    #[serde(default = "default_body")]
    pub pull_request_body: String,
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            path: default_path(),
            source_branch: default_branch(),
            base_branch: default_branch(),
            export_branch: default_export_branch(),
            commit_message: default_message(),
            pull_request_title: default_title(),
            pull_request_body: default_body(),
            labels: default_labels(),
        }
    }
}
