//! tokensync.toml loading

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CliError, Result};

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "tokensync.toml";

fn default_store() -> PathBuf {
    PathBuf::from(".tokensync/variables.json")
}

/// File locations
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilesSection {
    /// Variable store snapshot
    #[serde(default = "default_store")]
    pub store: PathBuf,
    /// Export target; export prints to stdout when unset
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            store: default_store(),
            output: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub files: FilesSection,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the config.
    ///
    /// An explicit path must exist. Otherwise `tokensync.toml` in `cwd` is
    /// read when present, and defaults are used when it is not.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(CliError::user(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = cwd.join(CONFIG_FILE);
                if !candidate.exists() {
                    tracing::debug!("No config file, using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        tracing::debug!(path = %path.display(), "Loading config");
        Self::from_toml_str(&fs::read_to_string(&path)?)
    }

    /// Store path, with a command-line override
    pub fn store(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.unwrap_or_else(|| self.files.store.clone())
    }

    /// Output path, with a command-line override
    pub fn output(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.files.output.clone())
    }
}
