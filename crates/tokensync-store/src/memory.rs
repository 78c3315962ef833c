//! In-memory variable store with JSON snapshot persistence

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use tokensync_model::{
    Group, GroupId, Mode, ModeId, Variable, VariableId, VariableKind, VariableValue,
};

use crate::variables::VariableStore;
use crate::{Error, Result};

/// Name given to the single mode of a newly created group
pub const DEFAULT_MODE_NAME: &str = "Mode 1";

/// Serializable contents of a [`MemoryVariableStore`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

#[derive(Debug, Default)]
struct State {
    groups: Vec<Group>,
    variables: BTreeMap<VariableId, Variable>,
}

impl State {
    fn group_mut(&mut self, id: &GroupId) -> Result<&mut Group> {
        self.groups
            .iter_mut()
            .find(|g| &g.id == id)
            .ok_or_else(|| Error::GroupNotFound { id: id.clone() })
    }

    fn group(&self, id: &GroupId) -> Result<&Group> {
        self.groups
            .iter()
            .find(|g| &g.id == id)
            .ok_or_else(|| Error::GroupNotFound { id: id.clone() })
    }
}

/// A [`VariableStore`] held in memory.
///
/// Enforces the invariants a real host enforces: values must match the
/// variable's kind, alias targets must exist with the same kind, and modes
/// must belong to the variable's group. Duplicate group names are allowed,
/// as they are in the host tool.
#[derive(Debug, Default)]
pub struct MemoryVariableStore {
    state: RwLock<State>,
}

impl MemoryVariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let variables = snapshot
            .variables
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect();
        Self {
            state: RwLock::new(State {
                groups: snapshot.groups,
                variables,
            }),
        }
    }

    /// Load a snapshot file, or start empty if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No store snapshot, starting empty");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|source| Error::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: StoreSnapshot = serde_json::from_str(&content)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Write the current contents to a snapshot file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot().await;
        let content = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|source| Error::Snapshot {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, content).map_err(|source| Error::Snapshot {
            path: path.to_path_buf(),
            source,
        })
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read().await;
        StoreSnapshot {
            groups: state.groups.clone(),
            variables: state.variables.values().cloned().collect(),
        }
    }

    /// Add another mode to a group
    pub async fn add_mode(&self, group: &GroupId, name: &str) -> Result<Mode> {
        let mut state = self.state.write().await;
        let group = state.group_mut(group)?;
        let mode = Mode {
            id: ModeId::new(new_id()),
            name: name.to_string(),
        };
        group.modes.push(mode.clone());
        Ok(mode)
    }

    /// Find a variable by group name and variable name
    pub async fn find(&self, group_name: &str, name: &str) -> Option<Variable> {
        let state = self.state.read().await;
        let group = state.groups.iter().find(|g| g.name == group_name)?;
        state
            .variables
            .values()
            .find(|v| v.group_id == group.id && v.name == name)
            .cloned()
    }

    pub async fn variable_count(&self) -> usize {
        self.state.read().await.variables.len()
    }
}

#[async_trait]
impl VariableStore for MemoryVariableStore {
    async fn groups(&self) -> Result<Vec<Group>> {
        Ok(self.state.read().await.groups.clone())
    }

    async fn variables_in(&self, group: &GroupId) -> Result<Vec<Variable>> {
        let state = self.state.read().await;
        let group = state.group(group)?;
        Ok(group
            .variable_ids
            .iter()
            .filter_map(|id| state.variables.get(id).cloned())
            .collect())
    }

    async fn create_group(&self, name: &str) -> Result<Group> {
        let mut state = self.state.write().await;
        let group = Group {
            id: GroupId::new(new_id()),
            name: name.to_string(),
            modes: vec![Mode {
                id: ModeId::new(new_id()),
                name: DEFAULT_MODE_NAME.to_string(),
            }],
            variable_ids: Vec::new(),
        };
        state.groups.push(group.clone());
        tracing::debug!(group = %name, id = %group.id, "Created group");
        Ok(group)
    }

    async fn create_variable(
        &self,
        group: &GroupId,
        name: &str,
        kind: VariableKind,
    ) -> Result<Variable> {
        let mut state = self.state.write().await;

        let taken = state
            .variables
            .values()
            .any(|v| &v.group_id == group && v.name == name);
        if taken {
            return Err(Error::DuplicateVariable {
                group: group.clone(),
                name: name.to_string(),
            });
        }

        let variable = Variable {
            id: VariableId::new(new_id()),
            name: name.to_string(),
            group_id: group.clone(),
            kind,
            values: BTreeMap::new(),
        };

        state.group_mut(group)?.variable_ids.push(variable.id.clone());
        state
            .variables
            .insert(variable.id.clone(), variable.clone());
        Ok(variable)
    }

    async fn set_value(
        &self,
        variable: &VariableId,
        mode: &ModeId,
        value: VariableValue,
    ) -> Result<()> {
        let mut state = self.state.write().await;

        let (kind, group_id) = {
            let var = state
                .variables
                .get(variable)
                .ok_or_else(|| Error::VariableNotFound {
                    id: variable.clone(),
                })?;
            (var.kind, var.group_id.clone())
        };

        if !state.group(&group_id)?.modes.iter().any(|m| &m.id == mode) {
            return Err(Error::ModeNotFound {
                group: group_id,
                mode: mode.clone(),
            });
        }

        let found = match &value {
            VariableValue::Alias(target) => {
                if target == variable {
                    return Err(Error::SelfAlias {
                        variable: variable.clone(),
                    });
                }
                state
                    .variables
                    .get(target)
                    .ok_or_else(|| Error::VariableNotFound { id: target.clone() })?
                    .kind
            }
            literal => literal.literal_kind().unwrap_or(kind),
        };

        if found != kind {
            return Err(Error::KindMismatch {
                variable: variable.clone(),
                expected: kind,
                found,
            });
        }

        if let Some(var) = state.variables.get_mut(variable) {
            var.values.insert(mode.clone(), value);
        }
        Ok(())
    }

    async fn delete_variable(&self, id: &VariableId) -> Result<()> {
        let mut state = self.state.write().await;

        let referrer = state.variables.values().find(|v| {
            &v.id != id
                && v
                    .values
                    .values()
                    .any(|value| matches!(value, VariableValue::Alias(target) if target == id))
        });
        if let Some(referrer) = referrer {
            return Err(Error::VariableInUse {
                variable: id.clone(),
                referenced_by: referrer.id.clone(),
            });
        }

        let removed = state
            .variables
            .remove(id)
            .ok_or_else(|| Error::VariableNotFound { id: id.clone() })?;
        state
            .group_mut(&removed.group_id)?
            .variable_ids
            .retain(|v| v != id);
        tracing::debug!(variable = %removed.name, id = %id, "Deleted variable");
        Ok(())
    }

    async fn variable(&self, id: &VariableId) -> Result<Option<Variable>> {
        Ok(self.state.read().await.variables.get(id).cloned())
    }

    async fn group(&self, id: &GroupId) -> Result<Option<Group>> {
        Ok(self
            .state
            .read()
            .await
            .groups
            .iter()
            .find(|g| &g.id == id)
            .cloned())
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
