//! Stanza merging

use crate::{renumber, resolve, EditError, MatchPolicy, Result};
use manuscript_model::{DocumentTree, NodeId, SelectionPayload};
use tracing::debug;

/// Result of merging stanzas
#[derive(Debug, Clone, Copy)]
pub struct MergeResult {
    /// The surviving stanza, holding all merged lines
    pub stanza: NodeId,
    /// How many stanzas were merged into it (including itself)
    pub merged: usize,
}

/// Merge two or more stanzas into the first.
///
/// All lines from stanzas 2..N are appended, in order, to the first
/// stanza's line list; the emptied stanzas are removed; lines and stanzas
/// are renumbered gap-free. Fails with a validation error, leaving the
/// document unmodified, when fewer than two stanzas resolve.
pub fn merge_stanzas(
    tree: &mut DocumentTree,
    selection: &SelectionPayload,
    policy: &MatchPolicy,
) -> Result<MergeResult> {
    let stanzas = resolve::resolve_stanzas(tree, selection, policy);
    if stanzas.len() < 2 {
        return Err(EditError::Validation(
            "select at least 2 stanzas to merge".to_string(),
        ));
    }

    let target = stanzas[0];
    let mut affected_divisions: Vec<NodeId> = Vec::new();
    for &stanza in &stanzas {
        if let Some(parent) = tree.parent_of(stanza) {
            if tree.get_division(parent).is_some() && !affected_divisions.contains(&parent) {
                affected_divisions.push(parent);
            }
        }
    }

    debug!(count = stanzas.len(), "merging stanzas");
    for &source in &stanzas[1..] {
        tree.move_lines(source, target)?;
        tree.remove_node(source)?;
    }

    renumber::renumber_stanza_lines(tree, target);
    for division in affected_divisions {
        renumber::renumber_division_stanzas(tree, division);
    }

    Ok(MergeResult {
        stanza: target,
        merged: stanzas.len(),
    })
}
