//! Rebuild a token document from the variable store

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tokensync_color::encode_color;
use tokensync_model::{
    AliasTarget, Group, GroupId, ModeId, PATH_SEPARATOR, TYPE_KEY, VALUE_KEY, Variable, VariableId,
    VariableValue, flat_key_to_alias_path,
};
use tokensync_store::VariableStore;
use tracing::{debug, warn};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::Result;

/// An exported document: group name to nested token tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportedDocument {
    pub groups: BTreeMap<String, Value>,
}

impl ExportedDocument {
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.groups
                .iter()
                .map(|(name, body)| (name.clone(), body.clone()))
                .collect(),
        )
    }

    /// Pretty JSON, two-space indented with sorted keys, so equal stores
    /// always produce byte-identical output
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }
}

/// An export plus the diagnostics raised while producing it
#[derive(Debug, Clone)]
pub struct Export {
    pub document: ExportedDocument,
    pub content: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Reads every group from a store and renders it as tokens
pub struct Exporter<'s, S: VariableStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: VariableStore + ?Sized> Exporter<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    pub async fn export(&self) -> Result<Export> {
        let mut diagnostics = Diagnostics::default();
        let mut document = ExportedDocument::default();

        for (group, ignored) in unique_groups(self.store.groups().await?) {
            if !ignored.is_empty() {
                diagnostics.push(Diagnostic::ConflictingIdentity {
                    name: group.name.clone(),
                    kept: group.id.clone(),
                    ignored,
                });
            }
            if group.has_multiple_modes() {
                diagnostics.push(Diagnostic::MultipleModes {
                    group: group.name.clone(),
                    modes: group.modes.len(),
                });
            }

            let body = self.export_group(&group).await?;
            document.groups.insert(group.name.clone(), body);
        }

        let content = document.to_json_string()?;
        Ok(Export {
            document,
            content,
            diagnostics: diagnostics.into_vec(),
        })
    }

    async fn export_group(&self, group: &Group) -> Result<Value> {
        let mut body = Map::new();
        let Some(mode) = group.default_mode().map(|m| m.id.clone()) else {
            warn!(group = %group.name, "Group has no modes, exporting it empty");
            return Ok(Value::Object(body));
        };

        let mut variables = self.store.variables_in(&group.id).await?;
        variables.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(group = %group.name, count = variables.len(), "Exporting group");

        for variable in &variables {
            if let Some((token_type, value)) = self.token_for(variable, &mode).await? {
                insert_token(&mut body, &variable.name, token_type, value);
            }
        }
        Ok(Value::Object(body))
    }

    /// The `$type` and `$value` for one variable, or `None` if it has no
    /// usable value in the mode
    async fn token_for(
        &self,
        variable: &Variable,
        mode: &ModeId,
    ) -> Result<Option<(&'static str, Value)>> {
        let Some(value) = variable.value_for(mode) else {
            debug!(variable = %variable.name, "No value in default mode, skipping");
            return Ok(None);
        };

        let token = match value {
            VariableValue::Color(color) => Some((
                variable.kind.token_type(),
                Value::String(encode_color(color)),
            )),
            VariableValue::Number(number) => {
                number_value(*number).map(|v| (variable.kind.token_type(), v))
            }
            VariableValue::String(text) => {
                Some((variable.kind.token_type(), Value::String(text.clone())))
            }
            VariableValue::Alias(id) => match self.alias_reference(id).await? {
                Some((token_type, reference)) => Some((token_type, Value::String(reference))),
                None => {
                    warn!(variable = %variable.name, target = %id, "Alias target missing, skipping");
                    None
                }
            },
        };
        Ok(token)
    }

    /// `{group.path.to.token}` for an alias target, with the target's type
    async fn alias_reference(
        &self,
        id: &VariableId,
    ) -> Result<Option<(&'static str, String)>> {
        let Some(target) = self.store.variable(id).await? else {
            return Ok(None);
        };
        let Some(group) = self.store.group(&target.group_id).await? else {
            return Ok(None);
        };

        let path = format!("{}.{}", group.name, flat_key_to_alias_path(&target.name));
        Ok(Some((
            target.kind.token_type(),
            AliasTarget::from_path(path).to_reference(),
        )))
    }
}

/// First group per name, paired with the ids of later groups sharing it
fn unique_groups(groups: Vec<Group>) -> Vec<(Group, Vec<GroupId>)> {
    let mut unique: Vec<(Group, Vec<GroupId>)> = Vec::new();
    for group in groups {
        match unique.iter_mut().find(|(kept, _)| kept.name == group.name) {
            Some((_, ignored)) => ignored.push(group.id),
            None => unique.push((group, Vec::new())),
        }
    }
    unique
}

/// Whole numbers are written as integers
fn number_value(number: f64) -> Option<Value> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if number.fract() == 0.0 && number.abs() < MAX_EXACT {
        Some(Value::from(number as i64))
    } else {
        serde_json::Number::from_f64(number).map(Value::Number)
    }
}

fn insert_token(body: &mut Map<String, Value>, name: &str, token_type: &str, value: Value) {
    let mut current = body;
    for segment in name.split(PATH_SEPARATOR) {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            unreachable!("slot was just made an object");
        };
        current = next;
    }
    current.insert(TYPE_KEY.to_string(), Value::String(token_type.to_string()));
    current.insert(VALUE_KEY.to_string(), value);
}
