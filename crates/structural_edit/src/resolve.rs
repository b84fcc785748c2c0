//! Selection-to-node resolution
//!
//! Stanza and line ids are frequently derived from positional numbers and
//! regenerated on render, so resolution treats id lookup as a fast path and
//! always falls back to content matching against the selection text.

use crate::MatchPolicy;
use manuscript_model::{DocumentTree, NodeId, NodeType, SelectionPayload};
use tracing::debug;

/// Resolve the stanzas a selection refers to.
///
/// Explicit element ids (checkbox selection) take precedence; each id is
/// tried as an xml:id, then as a bare display number, then matched by first
/// line content. Without ids, the selection's start/end nodes bound a
/// contiguous stanza range.
pub fn resolve_stanzas(
    tree: &DocumentTree,
    selection: &SelectionPayload,
    policy: &MatchPolicy,
) -> Vec<NodeId> {
    if !selection.element_ids.is_empty() {
        let mut out = Vec::new();
        for raw_id in &selection.element_ids {
            match resolve_stanza_id(tree, raw_id, policy) {
                Some(id) if !out.contains(&id) => out.push(id),
                Some(_) => {}
                None => debug!(id = raw_id.as_str(), "could not resolve stanza id"),
            }
        }
        return out;
    }

    if let (Some(start), Some(end)) = (selection.start_node, selection.end_node) {
        return tree.contiguous_range(start, end, NodeType::Stanza);
    }
    if let Some(start) = selection.start_node {
        return tree
            .find_ancestor_of_kind(start, NodeType::Stanza)
            .into_iter()
            .collect();
    }
    Vec::new()
}

fn resolve_stanza_id(tree: &DocumentTree, raw_id: &str, policy: &MatchPolicy) -> Option<NodeId> {
    // Fast path: stable xml:id.
    if let Some(id) = tree.find_by_xml_id(raw_id) {
        if tree.get_stanza(id).is_some() {
            return Some(id);
        }
    }
    // Render-derived ids often reduce to the display number.
    if let Ok(number) = raw_id.parse::<u32>() {
        if let Some(id) = tree
            .all_stanzas()
            .into_iter()
            .find(|&s| tree.get_stanza(s).map(|st| st.number) == Some(number))
        {
            return Some(id);
        }
    }
    // Last resort: the id turned out to be a first-line excerpt.
    tree.all_stanzas().into_iter().find(|&s| {
        tree.stanza_line_ids(s)
            .first()
            .map(|&l| policy.matches_selection(&tree.node_text(l), raw_id))
            .unwrap_or(false)
    })
}

/// Resolve the line-like element (line or heading-like) a selection points
/// at: ancestor lookup from the selection's start node first, content
/// matching across all candidates as the documented fallback.
pub fn resolve_line_like(
    tree: &DocumentTree,
    selection: &SelectionPayload,
    policy: &MatchPolicy,
) -> Option<NodeId> {
    if let Some(start) = selection.start_node {
        for kind in [NodeType::Line, NodeType::Heading] {
            if let Some(id) = tree.find_ancestor_of_kind(start, kind) {
                return Some(id);
            }
        }
    }

    let selected = selection.trimmed_text()?;
    let found = tree
        .all_line_like()
        .into_iter()
        .find(|&id| policy.matches_selection(&tree.node_text(id), selected));
    if found.is_some() {
        debug!("resolved line-like element via content matching");
    }
    found
}
