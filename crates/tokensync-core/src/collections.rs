//! Group lookup and variable upsert

use std::collections::{BTreeSet, HashMap};

use tokensync_model::{Group, ModeId, Variable, VariableKind, VariableValue};
use tokensync_store::{Error as StoreError, VariableStore};
use tracing::{debug, info};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::report::GroupReport;
use crate::{Error, Result};

/// Resolves group names against the store's groups, enumerated once per run
#[derive(Debug)]
pub struct CollectionManager {
    groups: Vec<Group>,
}

impl CollectionManager {
    pub async fn load<S: VariableStore + ?Sized>(store: &S) -> Result<Self> {
        let groups = store.groups().await?;
        debug!(count = groups.len(), "Loaded groups");
        Ok(Self { groups })
    }

    /// Match a group by name, creating it if absent, and prefetch its
    /// variables.
    ///
    /// When several groups share the name the first one enumerated is used.
    pub async fn open<S: VariableStore + ?Sized>(
        &mut self,
        store: &S,
        name: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<GroupIndex> {
        let group = match self.matching(name, diagnostics) {
            Some(group) => group,
            None => {
                info!(group = %name, "Creating group");
                let created = store.create_group(name).await?;
                self.groups.push(created.clone());
                created
            }
        };
        index_group(store, group, diagnostics).await
    }

    /// Match an existing group by name without creating it
    pub async fn lookup<S: VariableStore + ?Sized>(
        &self,
        store: &S,
        name: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<GroupIndex>> {
        match self.matching(name, diagnostics) {
            Some(group) => Ok(Some(index_group(store, group, diagnostics).await?)),
            None => Ok(None),
        }
    }

    fn matching(&self, name: &str, diagnostics: &mut Diagnostics) -> Option<Group> {
        let mut matches = self.groups.iter().filter(|g| g.name == name);
        let first = matches.next()?;
        let ignored: Vec<_> = matches.map(|g| g.id.clone()).collect();
        if !ignored.is_empty() {
            diagnostics.push(Diagnostic::ConflictingIdentity {
                name: name.to_string(),
                kept: first.id.clone(),
                ignored,
            });
        }
        Some(first.clone())
    }
}

async fn index_group<S: VariableStore + ?Sized>(
    store: &S,
    group: Group,
    diagnostics: &mut Diagnostics,
) -> Result<GroupIndex> {
    let name = group.name.clone();
    if group.has_multiple_modes() {
        diagnostics.push(Diagnostic::MultipleModes {
            group: name.clone(),
            modes: group.modes.len(),
        });
    }

    let mode = group
        .default_mode()
        .map(|m| m.id.clone())
        .ok_or_else(|| Error::GroupWithoutMode {
            group: name.clone(),
        })?;

    let mut existing = HashMap::new();
    for variable in store.variables_in(&group.id).await? {
        existing.entry(variable.name.clone()).or_insert(variable);
    }
    debug!(group = %name, variables = existing.len(), "Prefetched variables");

    Ok(GroupIndex {
        group,
        mode,
        existing,
        written: HashMap::new(),
        report: GroupReport::new(&name),
    })
}

/// Per-group state for one import run.
///
/// `existing` answers "does this name already have a variable" for upserts;
/// `written` holds only what this run produced and is what aliases resolve
/// against.
#[derive(Debug)]
pub struct GroupIndex {
    group: Group,
    mode: ModeId,
    existing: HashMap<String, Variable>,
    written: HashMap<String, Variable>,
    pub(crate) report: GroupReport,
}

impl GroupIndex {
    pub fn name(&self) -> &str {
        &self.group.name
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn mode(&self) -> &ModeId {
        &self.mode
    }

    /// A variable written earlier in this run
    pub fn written(&self, key: &str) -> Option<&Variable> {
        self.written.get(key)
    }

    /// A variable the group held before this run, or wrote during it
    pub fn existing(&self, key: &str) -> Option<&Variable> {
        self.existing.get(key)
    }

    pub fn report(&self) -> &GroupReport {
        &self.report
    }

    /// Write `value` under `name`, creating the variable if needed.
    ///
    /// A variable's kind is fixed, so an existing variable of a different
    /// kind is deleted and recreated ([`Diagnostic::VariableReplaced`]). If
    /// other variables still alias it, the token is skipped with
    /// [`Diagnostic::KindMismatch`] and `None` is returned.
    pub async fn upsert<S: VariableStore + ?Sized>(
        &mut self,
        store: &S,
        name: &str,
        kind: VariableKind,
        value: VariableValue,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Variable>> {
        let mut variable = match self.existing.get(name) {
            Some(found) if found.kind != kind => {
                let previous = found.kind;
                match store.delete_variable(&found.id).await {
                    Ok(()) => {}
                    Err(StoreError::VariableInUse { referenced_by, .. }) => {
                        debug!(variable = %name, %referenced_by, "Cannot replace aliased variable");
                        diagnostics.push(Diagnostic::KindMismatch {
                            group: self.group.name.clone(),
                            key: name.to_string(),
                            existing: previous,
                            requested: kind,
                        });
                        self.report.skipped += 1;
                        return Ok(None);
                    }
                    Err(e) => return Err(e.into()),
                }

                diagnostics.push(Diagnostic::VariableReplaced {
                    group: self.group.name.clone(),
                    key: name.to_string(),
                    previous,
                    kind,
                });
                let created = store.create_variable(&self.group.id, name, kind).await?;
                self.report.created += 1;
                created
            }
            Some(found) => {
                self.report.updated += 1;
                found.clone()
            }
            None => {
                let created = store.create_variable(&self.group.id, name, kind).await?;
                self.report.created += 1;
                created
            }
        };

        store
            .set_value(&variable.id, &self.mode, value.clone())
            .await?;
        variable.values.insert(self.mode.clone(), value);

        self.existing.insert(name.to_string(), variable.clone());
        self.written.insert(name.to_string(), variable.clone());
        Ok(Some(variable))
    }

    /// Consume the index, filling in the names this run never wrote
    pub(crate) fn into_report(self) -> GroupReport {
        let written: BTreeSet<&String> = self.written.keys().collect();
        let mut report = self.report;
        report.stale = self
            .existing
            .keys()
            .filter(|name| !written.contains(name))
            .cloned()
            .collect();
        report.stale.sort();
        report
    }
}
