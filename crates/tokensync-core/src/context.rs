//! State shared across the groups of one import run

use tokensync_model::{AliasTarget, QualifiedKey, Variable, VariableKind, VariableValue};
use tokensync_store::VariableStore;

use crate::collections::GroupIndex;
use crate::diagnostics::Diagnostics;
use crate::report::{GroupReport, ImportReport};
use crate::{Error, Result};

/// An alias whose target was not written when it was first seen
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAlias {
    pub source: QualifiedKey,
    pub target: AliasTarget,
}

/// Indices of every group opened so far, plus the aliases still waiting on a
/// target.
///
/// `groups` are the document's groups and receive writes. `referenced` are
/// store groups outside the document that aliases point into; they are only
/// read.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    groups: Vec<GroupIndex>,
    referenced: Vec<GroupIndex>,
    pending: Vec<PendingAlias>,
    pub(crate) diagnostics: Diagnostics,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_group(&mut self, index: GroupIndex) {
        self.groups.push(index);
    }

    pub fn insert_referenced(&mut self, index: GroupIndex) {
        self.referenced.push(index);
    }

    pub fn group(&self, name: &str) -> Option<&GroupIndex> {
        self.groups.iter().find(|g| g.name() == name)
    }

    /// Whether `name` is a document group or an already opened referenced one
    pub fn is_open(&self, name: &str) -> bool {
        self.group(name).is_some() || self.referenced.iter().any(|g| g.name() == name)
    }

    /// The variable this run wrote under a qualified key
    pub fn written(&self, key: &QualifiedKey) -> Option<&Variable> {
        self.group(&key.group)?.written(&key.key)
    }

    /// The variable an alias may link to: what this run wrote for document
    /// groups, what the store holds for referenced groups
    pub fn target(&self, key: &QualifiedKey) -> Option<&Variable> {
        match self.group(&key.group) {
            Some(index) => index.written(&key.key),
            None => self
                .referenced
                .iter()
                .find(|g| g.name() == key.group)?
                .existing(&key.key),
        }
    }

    /// Queue an alias for the closing pass. A later registration for the
    /// same source replaces the earlier one.
    pub fn register_pending(&mut self, source: QualifiedKey, target: AliasTarget) {
        self.drop_pending(&source);
        self.pending.push(PendingAlias { source, target });
    }

    /// Forget a queued alias whose key has since been written again
    pub fn drop_pending(&mut self, source: &QualifiedKey) {
        self.pending.retain(|p| &p.source != source);
    }

    pub fn pending(&self) -> &[PendingAlias] {
        &self.pending
    }

    pub(crate) fn take_pending(&mut self) -> Vec<PendingAlias> {
        std::mem::take(&mut self.pending)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Upsert through the owning group's index
    pub async fn upsert<S: VariableStore + ?Sized>(
        &mut self,
        store: &S,
        key: &QualifiedKey,
        kind: VariableKind,
        value: VariableValue,
    ) -> Result<Option<Variable>> {
        let index = self
            .groups
            .iter_mut()
            .find(|g| g.name() == key.group)
            .ok_or_else(|| Error::UnknownGroup {
                group: key.group.clone(),
            })?;
        index
            .upsert(store, &key.key, kind, value, &mut self.diagnostics)
            .await
    }

    pub(crate) fn report_mut(&mut self, group: &str) -> Result<&mut GroupReport> {
        self.groups
            .iter_mut()
            .find(|g| g.name() == group)
            .map(|g| &mut g.report)
            .ok_or_else(|| Error::UnknownGroup {
                group: group.to_string(),
            })
    }

    pub fn into_report(self) -> ImportReport {
        ImportReport {
            groups: self.groups.into_iter().map(GroupIndex::into_report).collect(),
            diagnostics: self.diagnostics.into_vec(),
        }
    }
}
