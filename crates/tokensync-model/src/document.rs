//! Token document parsing
//!
//! A token document is a JSON object whose top-level keys name groups. Each
//! group is a tree of namespaces ending in leaves:
//!
//! ```json
//! {
//!   "$themes": [],
//!   "Primitives": {
//!     "color": {
//!       "red": { "$type": "color", "$value": "#ff0000" }
//!     }
//!   },
//!   "Semantic": {
//!     "danger": { "$type": "color", "$value": "{Primitives.color.red}" }
//!   }
//! }
//! ```
//!
//! The tree is classified once, here, into [`TokenNode::Leaf`] and
//! [`TokenNode::Namespace`]; later stages never probe JSON shapes again.

use serde_json::{Map, Value};
use tokensync_color::ColorFormat;

use crate::path::{AliasTarget, is_metadata_key};
use crate::token_type::{COLOR_TYPE, TokenType};
use crate::{Error, Result};

/// Key holding a token's type
pub const TYPE_KEY: &str = "$type";
/// Key holding a token's value
pub const VALUE_KEY: &str = "$value";

/// A parsed token document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenDocument {
    pub groups: Vec<TokenGroup>,
}

/// A named top-level group of tokens
#[derive(Debug, Clone, PartialEq)]
pub struct TokenGroup {
    pub name: String,
    pub root: Namespace,
}

/// An interior node; metadata keys have already been dropped
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Namespace {
    pub children: Vec<(String, TokenNode)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Leaf(TokenLeaf),
    Namespace(Namespace),
}

/// A typed token value
#[derive(Debug, Clone, PartialEq)]
pub struct TokenLeaf {
    /// The raw `$type`
    pub token_type: String,
    pub value: TokenValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// A `{path.to.token}` reference
    Alias(AliasTarget),
    /// Any other `$value`
    Literal(Value),
}

impl TokenDocument {
    /// Parse a document from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(&value)
    }

    /// Parse a document from raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(&value)
    }

    /// Parse a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the root or any non-metadata top-level
    /// entry is not an object.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(Error::decode(format!(
                "expected an object at the document root, found {}",
                json_kind(value)
            )));
        };

        let mut groups = Vec::new();
        for (name, content) in root {
            if is_metadata_key(name) {
                tracing::debug!(key = %name, "Skipping metadata key");
                continue;
            }

            let Value::Object(map) = content else {
                return Err(Error::decode(format!(
                    "group '{}' must be an object, found {}",
                    name,
                    json_kind(content)
                )));
            };

            groups.push(TokenGroup {
                name: name.clone(),
                root: Namespace::parse(map),
            });
        }

        Ok(Self { groups })
    }

    pub fn group(&self, name: &str) -> Option<&TokenGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

impl Namespace {
    fn parse(map: &Map<String, Value>) -> Self {
        let mut children = Vec::new();

        for (key, value) in map {
            if is_metadata_key(key) {
                continue;
            }

            match value {
                Value::Object(child) => {
                    let node = match TokenLeaf::parse(child) {
                        Some(leaf) => TokenNode::Leaf(leaf),
                        None => TokenNode::Namespace(Namespace::parse(child)),
                    };
                    children.push((key.clone(), node));
                }
                other => {
                    tracing::debug!(key = %key, kind = json_kind(other), "Ignoring untyped value");
                }
            }
        }

        Self { children }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl TokenLeaf {
    /// Classify an object as a leaf.
    ///
    /// A leaf has a non-empty string `$type` and a `$value` entry. An object
    /// with a type but no value is a namespace.
    fn parse(map: &Map<String, Value>) -> Option<Self> {
        let token_type = match map.get(TYPE_KEY) {
            Some(Value::String(t)) if !t.is_empty() => t.clone(),
            _ => return None,
        };
        let raw = map.get(VALUE_KEY)?;

        let value = match raw {
            Value::String(s) if !is_float_object_color(&token_type, s) => {
                match AliasTarget::parse(s) {
                    Some(target) => TokenValue::Alias(target),
                    None => TokenValue::Literal(raw.clone()),
                }
            }
            _ => TokenValue::Literal(raw.clone()),
        };

        Some(Self { token_type, value })
    }

    pub fn kind(&self) -> TokenType {
        TokenType::classify(&self.token_type)
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.value, TokenValue::Alias(_))
    }
}

/// Colors may be written as `{ r: .., g: .., b: .. }`, which would
/// otherwise read as an alias.
fn is_float_object_color(token_type: &str, raw: &str) -> bool {
    token_type == COLOR_TYPE && ColorFormat::detect(raw.trim()) == Some(ColorFormat::FloatObject)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
