//! Data model for tokensync
//!
//! Two shapes meet here:
//!
//! - **Token documents**: nested JSON trees of typed design tokens, parsed once
//!   at ingestion into [`TokenNode::Leaf`] / [`TokenNode::Namespace`] variants.
//! - **Variable graphs**: flat, named [`Variable`]s grouped into single-mode
//!   [`Group`]s, as held by a variable store.
//!
//! The [`path`] module owns the conventions that connect the two: flat keys
//! joined with `/`, metadata keys marked with `$`, and `{a.b.c}` alias targets.

pub mod document;
pub mod error;
pub mod path;
pub mod token_type;
pub mod variable;

pub use document::{
    Namespace, TYPE_KEY, TokenDocument, TokenGroup, TokenLeaf, TokenNode, TokenValue, VALUE_KEY,
};
pub use error::{Error, Result};
pub use path::{
    AliasTarget, PATH_SEPARATOR, QualifiedKey, flat_key_to_alias_path, is_metadata_key,
    join_flat_key,
};
pub use token_type::TokenType;
pub use variable::{
    Group, GroupId, Mode, ModeId, Variable, VariableId, VariableKind, VariableValue,
};
