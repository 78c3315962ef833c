//! Outcome reports for import and push

use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::diff_gate::SemanticChange;

/// What an import did to one group
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupReport {
    pub name: String,
    pub created: usize,
    pub updated: usize,
    /// Variables written as references to another variable
    pub aliases_linked: usize,
    /// Aliases degraded to their literal target path
    pub fallbacks: usize,
    pub skipped: usize,
    /// Existing variable names the document no longer mentions. Never pruned.
    pub stale: Vec<String>,
}

impl GroupReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Summary of an import run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub groups: Vec<GroupReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ImportReport {
    pub fn created(&self) -> usize {
        self.groups.iter().map(|g| g.created).sum()
    }

    pub fn updated(&self) -> usize {
        self.groups.iter().map(|g| g.updated).sum()
    }

    pub fn aliases_linked(&self) -> usize {
        self.groups.iter().map(|g| g.aliases_linked).sum()
    }

    pub fn fallbacks(&self) -> usize {
        self.groups.iter().map(|g| g.fallbacks).sum()
    }

    pub fn skipped(&self) -> usize {
        self.groups.iter().map(|g| g.skipped).sum()
    }

    pub fn group(&self, name: &str) -> Option<&GroupReport> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// No diagnostics were raised
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Result of a push
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// Export matched the remote file; nothing was written
    Unchanged,
    /// The export branch has no file at the configured path; nothing was written
    TargetMissing,
    /// The file was updated on the export branch
    Written {
        sha: String,
        changes: Vec<SemanticChange>,
        /// `None` when a pull request for the branch was already open
        pull_request: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_sum_over_groups() {
        let report = ImportReport {
            groups: vec![
                GroupReport {
                    created: 2,
                    fallbacks: 1,
                    ..GroupReport::new("A")
                },
                GroupReport {
                    created: 1,
                    updated: 4,
                    ..GroupReport::new("B")
                },
            ],
            diagnostics: Vec::new(),
        };

        assert_eq!(report.created(), 3);
        assert_eq!(report.updated(), 4);
        assert_eq!(report.fallbacks(), 1);
        assert_eq!(report.group("B").unwrap().updated, 4);
        assert!(report.is_clean());
    }
}
