//! Alias resolution.
//!
//! Aliases whose target is already written are linked as soon as they are
//! seen. The rest wait in the [`ResolutionContext`] until every group has
//! been materialized, then [`close_pending`] settles them all in one pass.
//!
//! Each pending alias has exactly one target, so the pending set forms a
//! functional graph. [`plan`] walks it once, orders every link so its target
//! is written before it, and turns cycles and dangling references into
//! literal string fallbacks.

use std::collections::{BTreeSet, HashMap, HashSet};

use tokensync_model::{AliasTarget, QualifiedKey, Variable, VariableKind, VariableValue};
use tokensync_store::VariableStore;
use tracing::{debug, info};

use crate::collections::CollectionManager;
use crate::context::{PendingAlias, ResolutionContext};
use crate::diagnostics::Diagnostic;
use crate::Result;

/// Why an alias was stored as its literal target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    Unresolved,
    Cycle,
}

/// One write of the closing pass
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionStep {
    /// Point `source` at the variable written under `target`
    Link {
        source: QualifiedKey,
        target: QualifiedKey,
        reference: AliasTarget,
    },
    /// Store the reference path as a string
    Fallback {
        source: QualifiedKey,
        reference: AliasTarget,
        reason: FallbackReason,
    },
}

impl ResolutionStep {
    pub fn source(&self) -> &QualifiedKey {
        match self {
            ResolutionStep::Link { source, .. } | ResolutionStep::Fallback { source, .. } => source,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    /// Written this run
    Written(QualifiedKey),
    /// Another pending alias
    Pending(QualifiedKey),
    Missing,
}

/// Keys an alias may refer to, most specific first: the whole path inside
/// the referencing group, then the first segment read as a group name.
fn candidates(source_group: &str, target: &AliasTarget) -> Vec<QualifiedKey> {
    let mut keys = vec![QualifiedKey::new(source_group, target.to_flat_key())];
    if let Some((group, key)) = target.split_group() {
        keys.push(QualifiedKey::new(group, key));
    }
    keys
}

fn locate<F>(alias: &PendingAlias, pending: &HashMap<&QualifiedKey, &PendingAlias>, is_written: &F) -> Target
where
    F: Fn(&QualifiedKey) -> bool,
{
    for candidate in candidates(&alias.source.group, &alias.target) {
        if pending.contains_key(&candidate) {
            return Target::Pending(candidate);
        }
        if is_written(&candidate) {
            return Target::Written(candidate);
        }
    }
    Target::Missing
}

/// Order the closing pass.
///
/// Every pending alias yields exactly one step. A link always comes after
/// the step that writes its target, so executing the steps in order never
/// references a variable that does not exist yet.
pub fn plan<F>(pending: &[PendingAlias], is_written: F) -> Vec<ResolutionStep>
where
    F: Fn(&QualifiedKey) -> bool,
{
    let by_source: HashMap<&QualifiedKey, &PendingAlias> =
        pending.iter().map(|p| (&p.source, p)).collect();
    let targets: HashMap<&QualifiedKey, Target> = pending
        .iter()
        .map(|p| (&p.source, locate(p, &by_source, &is_written)))
        .collect();

    let mut done: HashSet<QualifiedKey> = HashSet::new();
    let mut steps = Vec::with_capacity(pending.len());

    for alias in pending {
        if done.contains(&alias.source) {
            continue;
        }

        // Follow pending targets until something already settled, a
        // non-pending target, or a node already on this path.
        let mut path: Vec<&QualifiedKey> = Vec::new();
        let mut position: HashMap<&QualifiedKey, usize> = HashMap::new();
        let mut cursor = &alias.source;
        loop {
            if done.contains(cursor) {
                break;
            }
            if let Some(&start) = position.get(cursor) {
                for member in path.drain(start..) {
                    steps.push(ResolutionStep::Fallback {
                        source: member.clone(),
                        reference: by_source[member].target.clone(),
                        reason: FallbackReason::Cycle,
                    });
                    done.insert(member.clone());
                }
                break;
            }
            position.insert(cursor, path.len());
            path.push(cursor);
            match &targets[cursor] {
                Target::Pending(next) => cursor = next,
                Target::Written(_) | Target::Missing => break,
            }
        }

        // Innermost first: each link's target is settled by now
        for member in path.into_iter().rev() {
            let reference = by_source[member].target.clone();
            let step = match &targets[member] {
                Target::Written(target) | Target::Pending(target) => ResolutionStep::Link {
                    source: member.clone(),
                    target: target.clone(),
                    reference,
                },
                Target::Missing => ResolutionStep::Fallback {
                    source: member.clone(),
                    reference,
                    reason: FallbackReason::Unresolved,
                },
            };
            steps.push(step);
            done.insert(member.clone());
        }
    }

    steps
}

/// Write `source` as a reference to `target`, taking the target's kind
pub async fn link<S: VariableStore + ?Sized>(
    store: &S,
    ctx: &mut ResolutionContext,
    source: &QualifiedKey,
    target: &Variable,
) -> Result<()> {
    debug!(source = %source, target = %target.name, "Linking alias");
    let written = ctx
        .upsert(store, source, target.kind, VariableValue::Alias(target.id.clone()))
        .await?;
    if written.is_some() {
        ctx.report_mut(&source.group)?.aliases_linked += 1;
    }
    Ok(())
}

/// Store the reference path as a string variable
pub async fn fallback<S: VariableStore + ?Sized>(
    store: &S,
    ctx: &mut ResolutionContext,
    source: &QualifiedKey,
    reference: &AliasTarget,
    reason: FallbackReason,
) -> Result<()> {
    let group = source.group.clone();
    let key = source.key.clone();
    let target = reference.as_str().to_string();
    ctx.diagnostics.push(match reason {
        FallbackReason::Unresolved => Diagnostic::UnresolvedAlias { group, key, target },
        FallbackReason::Cycle => Diagnostic::AliasCycle { group, key, target },
    });

    let written = ctx
        .upsert(
            store,
            source,
            VariableKind::String,
            VariableValue::String(reference.as_str().to_string()),
        )
        .await?;
    if written.is_some() {
        ctx.report_mut(&source.group)?.fallbacks += 1;
    }
    Ok(())
}

/// Open the store groups that pending aliases name but the document does
/// not contain, so their variables can be link targets
async fn open_referenced_groups<S: VariableStore + ?Sized>(
    store: &S,
    collections: &CollectionManager,
    ctx: &mut ResolutionContext,
    pending: &[PendingAlias],
) -> Result<()> {
    let names: BTreeSet<&str> = pending
        .iter()
        .filter_map(|p| p.target.split_group().map(|(group, _)| group))
        .collect();

    for name in names {
        if ctx.is_open(name) {
            continue;
        }
        if let Some(index) = collections
            .lookup(store, name, &mut ctx.diagnostics)
            .await?
        {
            debug!(group = %name, "Opened referenced group");
            ctx.insert_referenced(index);
        }
    }
    Ok(())
}

/// Settle every pending alias after all groups have been materialized.
///
/// Targets resolve against what this run wrote for the document's groups,
/// and against the stored variables of any other group an alias names.
pub async fn close_pending<S: VariableStore + ?Sized>(
    store: &S,
    collections: &CollectionManager,
    ctx: &mut ResolutionContext,
) -> Result<()> {
    let pending = ctx.take_pending();
    if pending.is_empty() {
        return Ok(());
    }

    open_referenced_groups(store, collections, ctx, &pending).await?;

    info!(count = pending.len(), "Resolving deferred aliases");
    let steps = plan(&pending, |key| ctx.target(key).is_some());

    for step in steps {
        match step {
            ResolutionStep::Link {
                source,
                target,
                reference,
            } => match ctx.target(&target).cloned() {
                Some(variable) => link(store, ctx, &source, &variable).await?,
                // Target was skipped on write
                None => {
                    fallback(store, ctx, &source, &reference, FallbackReason::Unresolved).await?
                }
            },
            ResolutionStep::Fallback {
                source,
                reference,
                reason,
            } => fallback(store, ctx, &source, &reference, reason).await?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn alias(group: &str, key: &str, target: &str) -> PendingAlias {
        PendingAlias {
            source: QualifiedKey::new(group, key),
            target: AliasTarget::from_path(target),
        }
    }

    fn position(steps: &[ResolutionStep], group: &str, key: &str) -> usize {
        let wanted = QualifiedKey::new(group, key);
        steps
            .iter()
            .position(|s| s.source() == &wanted)
            .unwrap()
    }

    #[test]
    fn test_chain_is_ordered_innermost_first() {
        let pending = vec![
            alias("G", "a", "b"),
            alias("G", "b", "c"),
            alias("G", "c", "base"),
        ];
        let written = QualifiedKey::new("G", "base");
        let steps = plan(&pending, |k| k == &written);

        assert_eq!(steps.len(), 3);
        assert!(position(&steps, "G", "c") < position(&steps, "G", "b"));
        assert!(position(&steps, "G", "b") < position(&steps, "G", "a"));
        assert!(steps.iter().all(|s| matches!(s, ResolutionStep::Link { .. })));
    }

    #[test]
    fn test_two_cycle_falls_back_both_members() {
        let pending = vec![alias("G", "a", "b"), alias("G", "b", "a")];
        let steps = plan(&pending, |_| false);

        assert_eq!(steps.len(), 2);
        for step in &steps {
            assert!(matches!(
                step,
                ResolutionStep::Fallback {
                    reason: FallbackReason::Cycle,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let pending = vec![alias("G", "a", "a")];
        let steps = plan(&pending, |_| false);
        assert_eq!(
            steps,
            vec![ResolutionStep::Fallback {
                source: QualifiedKey::new("G", "a"),
                reference: AliasTarget::from_path("a"),
                reason: FallbackReason::Cycle,
            }]
        );
    }

    #[test]
    fn test_tail_into_cycle_links_to_cycle_member() {
        let pending = vec![
            alias("G", "tail", "a"),
            alias("G", "a", "b"),
            alias("G", "b", "a"),
        ];
        let steps = plan(&pending, |_| false);

        assert_eq!(steps.len(), 3);
        let tail = &steps[position(&steps, "G", "tail")];
        assert!(matches!(
            tail,
            ResolutionStep::Link { target, .. } if target == &QualifiedKey::new("G", "a")
        ));
        assert!(position(&steps, "G", "a") < position(&steps, "G", "tail"));
    }

    #[test]
    fn test_missing_target_is_unresolved() {
        let pending = vec![alias("G", "a", "nowhere.to.be.found")];
        let steps = plan(&pending, |_| false);
        assert!(matches!(
            steps[0],
            ResolutionStep::Fallback {
                reason: FallbackReason::Unresolved,
                ..
            }
        ));
    }

    #[test]
    fn test_cross_group_target() {
        let pending = vec![alias("Semantic", "danger", "Primitives.color.red")];
        let written = QualifiedKey::new("Primitives", "color/red");
        let steps = plan(&pending, |k| k == &written);
        assert_eq!(
            steps,
            vec![ResolutionStep::Link {
                source: QualifiedKey::new("Semantic", "danger"),
                target: written.clone(),
                reference: AliasTarget::from_path("Primitives.color.red"),
            }]
        );
    }

    #[test]
    fn test_same_group_full_path_wins_over_group_split() {
        let pending = vec![alias("A", "x", "B.y")];
        let local = QualifiedKey::new("A", "B/y");
        let other = QualifiedKey::new("B", "y");
        let steps = plan(&pending, |k| k == &local || k == &other);
        assert!(matches!(
            &steps[0],
            ResolutionStep::Link { target, .. } if target == &local
        ));
    }

    #[test]
    fn test_cross_group_pending_chain() {
        let pending = vec![
            alias("A", "x", "B.y"),
            alias("B", "y", "A.z"),
        ];
        let written = QualifiedKey::new("A", "z");
        let steps = plan(&pending, |k| k == &written);
        assert!(position(&steps, "B", "y") < position(&steps, "A", "x"));
    }
}
