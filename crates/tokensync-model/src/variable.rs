//! Variable graph types
//!
//! These mirror what a variable store holds: groups with a single mode, and
//! variables whose kind is fixed when they are created.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tokensync_color::Rgba;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Store-assigned identity of a variable
    VariableId
);
string_id!(
    /// Store-assigned identity of a group
    GroupId
);
string_id!(
    /// Store-assigned identity of a mode within a group
    ModeId
);

/// The resolved data type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableKind {
    Color,
    Number,
    String,
}

impl VariableKind {
    /// The `$type` written on export for this kind
    pub fn token_type(&self) -> &'static str {
        match self {
            VariableKind::Color => "color",
            VariableKind::Number => "number",
            VariableKind::String => "string",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Color => write!(f, "COLOR"),
            VariableKind::Number => write!(f, "NUMBER"),
            VariableKind::String => write!(f, "STRING"),
        }
    }
}

/// A value held by a variable for one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableValue {
    Color(Rgba),
    Number(f64),
    String(String),
    /// A link to another variable; the holder shares the target's kind
    Alias(VariableId),
}

impl VariableValue {
    /// The kind of a literal value, `None` for aliases
    pub fn literal_kind(&self) -> Option<VariableKind> {
        match self {
            VariableValue::Color(_) => Some(VariableKind::Color),
            VariableValue::Number(_) => Some(VariableKind::Number),
            VariableValue::String(_) => Some(VariableKind::String),
            VariableValue::Alias(_) => None,
        }
    }

    pub fn alias_target(&self) -> Option<&VariableId> {
        match self {
            VariableValue::Alias(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub id: ModeId,
    pub name: String,
}

/// A named container of variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub modes: Vec<Mode>,
    pub variable_ids: Vec<VariableId>,
}

impl Group {
    /// The mode tokens are read from and written to
    pub fn default_mode(&self) -> Option<&Mode> {
        self.modes.first()
    }

    pub fn has_multiple_modes(&self) -> bool {
        self.modes.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    /// Flat key, unique within the group
    pub name: String,
    pub group_id: GroupId,
    pub kind: VariableKind,
    #[serde(default)]
    pub values: BTreeMap<ModeId, VariableValue>,
}

impl Variable {
    pub fn value_for(&self, mode: &ModeId) -> Option<&VariableValue> {
        self.values.get(mode)
    }

    pub fn is_alias_in(&self, mode: &ModeId) -> bool {
        matches!(self.values.get(mode), Some(VariableValue::Alias(_)))
    }
}
