//! Normalized selection payload consumed by structural operations

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// Bounding rectangle of a selection, in the initiating view's coordinates.
/// Carried through for toolbar placement; structural operations ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The single normalized form of "what the user has selected".
///
/// Platform selection state is global, mutable from outside the
/// application, and addresses text nodes rather than semantic elements.
/// View adapters are expected to reduce it to this plain payload; "no
/// selection", "collapsed selection", and "selection outside the editable
/// region" all normalize to an empty payload. Structural operations treat
/// `start_node`/`end_node` and `element_ids` as fast paths and the selected
/// `text` as the content-matching source of truth.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionPayload {
    /// Trimmed selected text, if any
    pub text: Option<String>,
    /// Node the selection starts in, when the view could resolve one
    pub start_node: Option<NodeId>,
    /// Node the selection ends in, when the view could resolve one
    pub end_node: Option<NodeId>,
    /// Explicit element ids (xml:ids or render-derived ids), e.g. from
    /// checkbox selection of stanzas
    pub element_ids: Vec<String>,
    pub bounding_rect: Option<BoundingRect>,
}

impl SelectionPayload {
    /// Payload from selected text alone
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        Self {
            text: if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            },
            ..Default::default()
        }
    }

    /// Payload from an explicit element id list
    pub fn from_element_ids(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            element_ids: ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Payload bounded by two resolved nodes
    pub fn from_range(start: NodeId, end: NodeId) -> Self {
        Self {
            start_node: Some(start),
            end_node: Some(end),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.text = Some(trimmed.to_string());
        }
        self
    }

    /// Trimmed selection text, if present and non-empty
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// True when the payload carries nothing an operation could resolve
    pub fn is_empty(&self) -> bool {
        self.trimmed_text().is_none()
            && self.start_node.is_none()
            && self.end_node.is_none()
            && self.element_ids.is_empty()
    }
}
