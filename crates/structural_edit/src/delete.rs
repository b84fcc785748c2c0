//! Content-matched element deletion

use crate::{renumber, EditError, MatchPolicy, Result};
use manuscript_model::{DocumentTree, HeadingKind, NodeId, SelectionPayload};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The semantic kinds deletion will consider, in match priority order.
/// The first kind whose content matches the selection wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteTarget {
    Subtitle,
    Heading,
    Dedication,
    Epigraph,
    Dateline,
    Line,
    Stanza,
}

const PRIORITY: [DeleteTarget; 7] = [
    DeleteTarget::Subtitle,
    DeleteTarget::Heading,
    DeleteTarget::Dedication,
    DeleteTarget::Epigraph,
    DeleteTarget::Dateline,
    DeleteTarget::Line,
    DeleteTarget::Stanza,
];

impl DeleteTarget {
    pub fn label(&self) -> &'static str {
        match self {
            DeleteTarget::Subtitle => "subtitle",
            DeleteTarget::Heading => "heading",
            DeleteTarget::Dedication => "dedication",
            DeleteTarget::Epigraph => "epigraph",
            DeleteTarget::Dateline => "dateline",
            DeleteTarget::Line => "line",
            DeleteTarget::Stanza => "stanza",
        }
    }
}

/// Result of deleting an element
#[derive(Debug, Clone)]
pub struct DeleteResult {
    pub target: DeleteTarget,
    /// Text content of the removed element
    pub text: String,
}

fn candidates(tree: &DocumentTree, target: DeleteTarget) -> Vec<NodeId> {
    tree.document_order()
        .into_iter()
        .filter(|&id| match target {
            DeleteTarget::Line => tree.get_line(id).is_some(),
            DeleteTarget::Stanza => tree.get_stanza(id).is_some(),
            DeleteTarget::Subtitle => heading_kind(tree, id) == Some(HeadingKind::Subtitle),
            DeleteTarget::Heading => heading_kind(tree, id) == Some(HeadingKind::Heading),
            DeleteTarget::Dedication => heading_kind(tree, id) == Some(HeadingKind::Dedication),
            DeleteTarget::Epigraph => heading_kind(tree, id) == Some(HeadingKind::Epigraph),
            DeleteTarget::Dateline => heading_kind(tree, id) == Some(HeadingKind::Dateline),
        })
        .collect()
}

fn heading_kind(tree: &DocumentTree, id: NodeId) -> Option<HeadingKind> {
    tree.get_heading(id).map(|h| h.kind)
}

/// Delete the element a selection refers to.
///
/// An explicit element id, when present, is resolved to its node and that
/// node's text replaces the selection text for matching, because
/// render-derived ids are not stable but element content is. Candidate
/// kinds are tried in a fixed priority order and the first content match
/// wins. Deleting a line renumbers its stanza's remaining lines; deleting a
/// stanza renumbers its division's remaining stanzas; deleting other kinds
/// touches no numbering.
pub fn delete_element(
    tree: &mut DocumentTree,
    selection: &SelectionPayload,
    policy: &MatchPolicy,
) -> Result<DeleteResult> {
    let mut matched_text = selection.trimmed_text().map(str::to_owned);
    if let Some(raw_id) = selection.element_ids.first() {
        if let Some(node) = tree.find_by_xml_id(raw_id) {
            let text = tree.node_text(node).trim().to_string();
            if !text.is_empty() {
                debug!(id = raw_id.as_str(), "resolved delete target id to its text");
                matched_text = Some(text);
            }
        }
    }
    let matched_text = matched_text.ok_or_else(|| {
        EditError::Validation("select some text to delete an element".to_string())
    })?;

    let mut found: Option<(DeleteTarget, NodeId)> = None;
    'search: for target in PRIORITY {
        for id in candidates(tree, target) {
            if policy.matches_for_delete(&tree.node_text(id), &matched_text) {
                found = Some((target, id));
                break 'search;
            }
        }
    }

    let Some((target, element)) = found else {
        return Err(EditError::ElementNotFound(
            "no heading, subtitle, dedication, epigraph, date, line, or stanza matches the \
             selected text"
                .to_string(),
        ));
    };

    let text = tree.node_text(element).trim().to_string();
    let parent = tree.parent_of(element);
    tree.remove_node(element)?;

    match target {
        DeleteTarget::Line => {
            if let Some(stanza) = parent.filter(|p| tree.get_stanza(*p).is_some()) {
                renumber::renumber_stanza_lines(tree, stanza);
            }
        }
        DeleteTarget::Stanza => {
            if let Some(division) = parent.filter(|p| tree.get_division(*p).is_some()) {
                renumber::renumber_division_stanzas(tree, division);
            }
        }
        _ => {}
    }

    Ok(DeleteResult { target, text })
}
