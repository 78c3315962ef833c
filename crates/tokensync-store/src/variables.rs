//! VariableStore trait

use async_trait::async_trait;
use tokensync_model::{Group, GroupId, ModeId, Variable, VariableId, VariableKind, VariableValue};

use crate::Result;

/// The host tool's variable backing store.
///
/// Calls may suspend on the store; callers issue them sequentially and
/// never assume transactional behaviour across calls.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Enumerate all groups
    async fn groups(&self) -> Result<Vec<Group>>;

    /// Enumerate the variables of one group
    async fn variables_in(&self, group: &GroupId) -> Result<Vec<Variable>>;

    /// Create a group with a single default mode
    async fn create_group(&self, name: &str) -> Result<Group>;

    /// Create a variable; its kind is fixed from here on
    async fn create_variable(
        &self,
        group: &GroupId,
        name: &str,
        kind: VariableKind,
    ) -> Result<Variable>;

    /// Set a variable's value for one mode
    async fn set_value(
        &self,
        variable: &VariableId,
        mode: &ModeId,
        value: VariableValue,
    ) -> Result<()>;

    /// Remove a variable from its group.
    ///
    /// Fails with [`Error::VariableInUse`](crate::Error::VariableInUse) while
    /// another variable aliases it.
    async fn delete_variable(&self, id: &VariableId) -> Result<()>;

    async fn variable(&self, id: &VariableId) -> Result<Option<Variable>>;

    async fn group(&self, id: &GroupId) -> Result<Option<Group>>;
}
