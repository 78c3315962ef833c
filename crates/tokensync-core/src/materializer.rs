//! Turn flattened tokens into variables

use serde_json::Value;
use tokensync_color::{Rgba, parse_color};
use tokensync_model::{QualifiedKey, TokenLeaf, TokenType, TokenValue, VariableKind, VariableValue};
use tokensync_store::VariableStore;
use tracing::debug;

use crate::context::ResolutionContext;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::resolver;
use crate::walker::FlatToken;
use crate::Result;

/// Materialize one token of `group`.
///
/// Alias values are linked immediately when their target was already
/// written in the same group, and deferred otherwise. Literal values are
/// dispatched on the token type.
pub async fn materialize<S: VariableStore + ?Sized>(
    store: &S,
    ctx: &mut ResolutionContext,
    group: &str,
    token: &FlatToken<'_>,
) -> Result<()> {
    let source = QualifiedKey::new(group, token.key.as_str());
    // A later definition of the same key replaces any deferred alias
    ctx.drop_pending(&source);

    match &token.leaf.value {
        TokenValue::Alias(target) => {
            let local = QualifiedKey::new(group, target.to_flat_key());
            let written = if local == source {
                None
            } else {
                ctx.written(&local).cloned()
            };

            match written {
                Some(variable) => resolver::link(store, ctx, &source, &variable).await,
                None => {
                    debug!(source = %source, target = %target, "Deferring alias");
                    ctx.register_pending(source, target.clone());
                    Ok(())
                }
            }
        }
        TokenValue::Literal(value) => {
            match literal_value(group, &token.key, token.leaf, value, &mut ctx.diagnostics) {
                Some((kind, value)) => {
                    ctx.upsert(store, &source, kind, value).await?;
                }
                None => ctx.report_mut(group)?.skipped += 1,
            }
            Ok(())
        }
    }
}

/// Map a literal to a variable kind and value, or `None` to skip the token
fn literal_value(
    group: &str,
    key: &str,
    leaf: &TokenLeaf,
    value: &Value,
    diagnostics: &mut Diagnostics,
) -> Option<(VariableKind, VariableValue)> {
    match leaf.kind() {
        TokenType::Color => Some((
            VariableKind::Color,
            VariableValue::Color(color_value(group, key, value, diagnostics)),
        )),
        TokenType::Number => match coerce_number(value) {
            Some(number) => Some((VariableKind::Number, VariableValue::Number(number))),
            None => {
                diagnostics.push(Diagnostic::UnsupportedTokenValue {
                    group: group.to_string(),
                    key: key.to_string(),
                    token_type: leaf.token_type.clone(),
                    value: value.to_string(),
                });
                None
            }
        },
        other => match value {
            Value::String(text) => Some((VariableKind::String, VariableValue::String(text.clone()))),
            Value::Array(items) if other.is_font_family() => match join_families(items) {
                Some(joined) => Some((VariableKind::String, VariableValue::String(joined))),
                None => {
                    diagnostics.push(Diagnostic::UnsupportedTokenValue {
                        group: group.to_string(),
                        key: key.to_string(),
                        token_type: leaf.token_type.clone(),
                        value: value.to_string(),
                    });
                    None
                }
            },
            _ => {
                diagnostics.push(Diagnostic::UnsupportedTokenType {
                    group: group.to_string(),
                    key: key.to_string(),
                    token_type: leaf.token_type.clone(),
                });
                None
            }
        },
    }
}

fn color_value(group: &str, key: &str, value: &Value, diagnostics: &mut Diagnostics) -> Rgba {
    let parsed = match value {
        Value::String(text) => parse_color(text).ok(),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        diagnostics.push(Diagnostic::UnsupportedColorFormat {
            group: group.to_string(),
            key: key.to_string(),
            value: match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        });
        Rgba::BLACK
    })
}

/// Accept JSON numbers, and numeric strings with an optional `px` suffix
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            let digits = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
            digits.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

fn join_families(items: &[Value]) -> Option<String> {
    let names = items
        .iter()
        .map(|item| item.as_str())
        .collect::<Option<Vec<_>>>()?;
    Some(names.join(", "))
}
