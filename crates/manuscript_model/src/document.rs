//! Document root node and revision tracking

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// The root of a loaded manuscript.
///
/// A document is created once per loaded file and replaced wholesale on file
/// switch. The `revision` counter is bumped by every structural mutation and
/// is the sole key for derived caches (page maps). Serialized-text length is
/// deliberately never used as a change proxy: a merge of two equal-length
/// stanzas changes structure without changing length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: NodeId,
    /// IDs of body-level children (divisions, page breaks, headings)
    body_children: Vec<NodeId>,
    /// Monotonic revision counter, bumped on every structural mutation
    revision: u64,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            body_children: Vec::new(),
            revision: 0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the current revision
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Bump the revision after a structural change
    pub fn bump_revision(&mut self) {
        self.revision += 1;
    }

    /// Get the body-level children in document order
    pub fn body_children(&self) -> &[NodeId] {
        &self.body_children
    }

    /// Add a child to the end of the body
    pub fn add_body_child(&mut self, child_id: NodeId) {
        self.body_children.push(child_id);
        self.bump_revision();
    }

    /// Replace a child in place, preserving its position
    pub fn replace_body_child(&mut self, old: NodeId, new: NodeId) -> bool {
        if let Some(pos) = self.body_children.iter().position(|&id| id == old) {
            self.body_children[pos] = new;
            self.bump_revision();
            true
        } else {
            false
        }
    }

    /// Remove a child by ID, returning whether it was present
    pub fn remove_body_child(&mut self, child_id: NodeId) -> bool {
        if let Some(pos) = self.body_children.iter().position(|&id| id == child_id) {
            self.body_children.remove(pos);
            self.bump_revision();
            true
        } else {
            false
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
