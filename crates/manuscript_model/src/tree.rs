//! Manuscript tree storage, structural queries, and mutation primitives

use crate::{
    DocModelError, Division, Document, HeadingLike, Line, Node, NodeId, NodeType, PageBreak,
    Paragraph, Result, Stanza,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage for different node types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeStorage {
    pub divisions: HashMap<NodeId, Division>,
    pub stanzas: HashMap<NodeId, Stanza>,
    pub lines: HashMap<NodeId, Line>,
    pub headings: HashMap<NodeId, HeadingLike>,
    pub paragraphs: HashMap<NodeId, Paragraph>,
    pub page_breaks: HashMap<NodeId, PageBreak>,
}

/// The complete manuscript tree.
///
/// Owns no UI. Exposes structural queries (ancestor lookup, contiguous
/// sibling ranges, page markers) and mutation primitives; every mutation
/// bumps the document revision so derived caches can key off it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTree {
    /// The root document
    pub document: Document,
    /// Storage for all nodes
    pub nodes: NodeStorage,
}

impl DocumentTree {
    /// Create a new empty manuscript tree
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            nodes: NodeStorage::default(),
        }
    }

    /// Current structural revision (cache key for all derived data)
    pub fn revision(&self) -> u64 {
        self.document.revision()
    }

    // ========================================================================
    // Typed accessors
    // ========================================================================

    pub fn get_division(&self, id: NodeId) -> Option<&Division> {
        self.nodes.divisions.get(&id)
    }

    pub fn get_division_mut(&mut self, id: NodeId) -> Option<&mut Division> {
        self.nodes.divisions.get_mut(&id)
    }

    pub fn get_stanza(&self, id: NodeId) -> Option<&Stanza> {
        self.nodes.stanzas.get(&id)
    }

    pub fn get_stanza_mut(&mut self, id: NodeId) -> Option<&mut Stanza> {
        self.nodes.stanzas.get_mut(&id)
    }

    pub fn get_line(&self, id: NodeId) -> Option<&Line> {
        self.nodes.lines.get(&id)
    }

    pub fn get_line_mut(&mut self, id: NodeId) -> Option<&mut Line> {
        self.nodes.lines.get_mut(&id)
    }

    pub fn get_heading(&self, id: NodeId) -> Option<&HeadingLike> {
        self.nodes.headings.get(&id)
    }

    pub fn get_heading_mut(&mut self, id: NodeId) -> Option<&mut HeadingLike> {
        self.nodes.headings.get_mut(&id)
    }

    pub fn get_paragraph(&self, id: NodeId) -> Option<&Paragraph> {
        self.nodes.paragraphs.get(&id)
    }

    pub fn get_page_break(&self, id: NodeId) -> Option<&PageBreak> {
        self.nodes.page_breaks.get(&id)
    }

    /// Get the type of a node by probing the per-kind storage maps
    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        if self.nodes.divisions.contains_key(&id) {
            Some(NodeType::Division)
        } else if self.nodes.stanzas.contains_key(&id) {
            Some(NodeType::Stanza)
        } else if self.nodes.lines.contains_key(&id) {
            Some(NodeType::Line)
        } else if self.nodes.headings.contains_key(&id) {
            Some(NodeType::Heading)
        } else if self.nodes.paragraphs.contains_key(&id) {
            Some(NodeType::Paragraph)
        } else if self.nodes.page_breaks.contains_key(&id) {
            Some(NodeType::PageBreak)
        } else {
            None
        }
    }

    fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&dyn Node) -> R) -> Option<R> {
        match self.node_type(id)? {
            NodeType::Division => self.nodes.divisions.get(&id).map(|n| f(n)),
            NodeType::Stanza => self.nodes.stanzas.get(&id).map(|n| f(n)),
            NodeType::Line => self.nodes.lines.get(&id).map(|n| f(n)),
            NodeType::Heading => self.nodes.headings.get(&id).map(|n| f(n)),
            NodeType::Paragraph => self.nodes.paragraphs.get(&id).map(|n| f(n)),
            NodeType::PageBreak => self.nodes.page_breaks.get(&id).map(|n| f(n)),
        }
    }

    /// Get the parent of a node (None for body-level nodes or unknown IDs)
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.with_node(id, |n| n.parent()).flatten()
    }

    /// Get the ordered child IDs of a node
    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.with_node(id, |n| n.children().to_vec())
            .unwrap_or_default()
    }

    /// Get the facsimile reference of a node, if it carries one
    pub fn facsimile_of(&self, id: NodeId) -> Option<String> {
        self.with_node(id, |n| n.facsimile().map(str::to_owned))
            .flatten()
    }

    /// Get the `xml:id` of a node, if it carries one
    pub fn xml_id_of(&self, id: NodeId) -> Option<String> {
        match self.node_type(id)? {
            NodeType::Division => self.nodes.divisions.get(&id)?.xml_id.clone(),
            NodeType::Stanza => self.nodes.stanzas.get(&id)?.xml_id.clone(),
            NodeType::Line => self.nodes.lines.get(&id)?.xml_id.clone(),
            NodeType::Heading => self.nodes.headings.get(&id)?.xml_id.clone(),
            NodeType::Paragraph | NodeType::PageBreak => None,
        }
    }

    fn set_parent_of(&mut self, id: NodeId, parent: Option<NodeId>) {
        match self.node_type(id) {
            Some(NodeType::Division) => {
                if let Some(n) = self.nodes.divisions.get_mut(&id) {
                    n.set_parent(parent);
                }
            }
            Some(NodeType::Stanza) => {
                if let Some(n) = self.nodes.stanzas.get_mut(&id) {
                    n.set_parent(parent);
                }
            }
            Some(NodeType::Line) => {
                if let Some(n) = self.nodes.lines.get_mut(&id) {
                    n.set_parent(parent);
                }
            }
            Some(NodeType::Heading) => {
                if let Some(n) = self.nodes.headings.get_mut(&id) {
                    n.set_parent(parent);
                }
            }
            Some(NodeType::Paragraph) => {
                if let Some(n) = self.nodes.paragraphs.get_mut(&id) {
                    n.set_parent(parent);
                }
            }
            Some(NodeType::PageBreak) => {
                if let Some(n) = self.nodes.page_breaks.get_mut(&id) {
                    n.set_parent(parent);
                }
            }
            None => {}
        }
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    fn attach(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<()> {
        match parent {
            None => {
                self.set_parent_of(id, None);
                self.document.add_body_child(id);
            }
            Some(parent_id) => {
                let list = self
                    .child_list_mut(parent_id)
                    .ok_or(DocModelError::NodeNotFound(parent_id.as_uuid()))?;
                list.push(id);
                self.set_parent_of(id, Some(parent_id));
                self.document.bump_revision();
            }
        }
        Ok(())
    }

    /// Insert a division under `parent` (or at body level)
    pub fn insert_division(&mut self, division: Division, parent: Option<NodeId>) -> Result<NodeId> {
        let id = division.id();
        self.nodes.divisions.insert(id, division);
        self.attach(id, parent)?;
        Ok(id)
    }

    /// Insert a stanza under a division
    pub fn insert_stanza(&mut self, stanza: Stanza, parent: NodeId) -> Result<NodeId> {
        let id = stanza.id();
        self.nodes.stanzas.insert(id, stanza);
        self.attach(id, Some(parent))?;
        Ok(id)
    }

    /// Insert a stanza under a division at a specific child index
    pub fn insert_stanza_at(&mut self, stanza: Stanza, parent: NodeId, index: usize) -> Result<NodeId> {
        if self.child_list_mut(parent).is_none() {
            return Err(DocModelError::NodeNotFound(parent.as_uuid()));
        }
        let id = stanza.id();
        self.nodes.stanzas.insert(id, stanza);
        if let Some(list) = self.child_list_mut(parent) {
            let index = index.min(list.len());
            list.insert(index, id);
        }
        self.set_parent_of(id, Some(parent));
        self.document.bump_revision();
        Ok(id)
    }

    /// Insert a line under a stanza
    pub fn insert_line(&mut self, line: Line, parent: NodeId) -> Result<NodeId> {
        let id = line.id();
        self.nodes.lines.insert(id, line);
        self.attach(id, Some(parent))?;
        Ok(id)
    }

    /// Insert a heading-like element under `parent` (or at body level)
    pub fn insert_heading(&mut self, heading: HeadingLike, parent: Option<NodeId>) -> Result<NodeId> {
        let id = heading.id();
        self.nodes.headings.insert(id, heading);
        self.attach(id, parent)?;
        Ok(id)
    }

    /// Insert a paragraph under `parent` (or at body level)
    pub fn insert_paragraph(&mut self, paragraph: Paragraph, parent: Option<NodeId>) -> Result<NodeId> {
        let id = paragraph.id();
        self.nodes.paragraphs.insert(id, paragraph);
        self.attach(id, parent)?;
        Ok(id)
    }

    /// Insert a page break under `parent` (or at body level)
    pub fn insert_page_break(&mut self, pb: PageBreak, parent: Option<NodeId>) -> Result<NodeId> {
        let id = pb.id();
        self.nodes.page_breaks.insert(id, pb);
        self.attach(id, parent)?;
        Ok(id)
    }

    // ========================================================================
    // Structural queries
    // ========================================================================

    /// Walk upward from `start` (inclusive) to the nearest node of `kind`.
    ///
    /// Returns None if the body is reached first. Used to resolve "what
    /// element is the user's selection inside".
    pub fn find_ancestor_of_kind(&self, start: NodeId, kind: NodeType) -> Option<NodeId> {
        let mut current = Some(start);
        while let Some(id) = current {
            if self.node_type(id)? == kind {
                return Some(id);
            }
            current = self.parent_of(id);
        }
        None
    }

    /// Ordered siblings of `kind` between and including the bounds of a
    /// selection.
    ///
    /// `start` and `end` are resolved to their nearest ancestor of `kind`
    /// first. Empty if the two resolve to nodes with no shared parent of the
    /// expected kind.
    pub fn contiguous_range(&self, start: NodeId, end: NodeId, kind: NodeType) -> Vec<NodeId> {
        let Some(first) = self.find_ancestor_of_kind(start, kind) else {
            return Vec::new();
        };
        let Some(last) = self.find_ancestor_of_kind(end, kind) else {
            return Vec::new();
        };
        if first == last {
            return vec![first];
        }

        let parent = self.parent_of(first);
        if parent != self.parent_of(last) {
            return Vec::new();
        }
        let siblings = match parent {
            Some(p) => self.children_of(p),
            None => self.document.body_children().to_vec(),
        };

        let Some(a) = siblings.iter().position(|&id| id == first) else {
            return Vec::new();
        };
        let Some(b) = siblings.iter().position(|&id| id == last) else {
            return Vec::new();
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        siblings[lo..=hi]
            .iter()
            .copied()
            .filter(|&id| self.node_type(id) == Some(kind))
            .collect()
    }

    /// All node IDs in document order (depth-first over the body)
    pub fn document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.document.body_children().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let children = self.children_of(id);
            stack.extend(children.iter().rev());
        }
        out
    }

    /// IDs of the line children of a stanza, in order.
    ///
    /// A stanza's child list can hold heading-likes left behind by retag
    /// operations; numbering and merging only consider lines.
    pub fn stanza_line_ids(&self, stanza_id: NodeId) -> Vec<NodeId> {
        self.children_of(stanza_id)
            .into_iter()
            .filter(|id| self.nodes.lines.contains_key(id))
            .collect()
    }

    /// Concatenated text of a node's subtree, joined with newlines
    pub fn node_text(&self, id: NodeId) -> String {
        match self.node_type(id) {
            Some(NodeType::Line) => self
                .nodes
                .lines
                .get(&id)
                .map(|l| l.text.clone())
                .unwrap_or_default(),
            Some(NodeType::Heading) => self
                .nodes
                .headings
                .get(&id)
                .map(|h| h.text.clone())
                .unwrap_or_default(),
            Some(NodeType::Paragraph) => self
                .nodes
                .paragraphs
                .get(&id)
                .map(|p| p.text.clone())
                .unwrap_or_default(),
            Some(NodeType::Stanza) | Some(NodeType::Division) => {
                let parts: Vec<String> = self
                    .children_of(id)
                    .into_iter()
                    .map(|c| self.node_text(c))
                    .filter(|t| !t.is_empty())
                    .collect();
                parts.join("\n")
            }
            Some(NodeType::PageBreak) | None => String::new(),
        }
    }

    /// Find a node by its `xml:id`, searching in document order
    pub fn find_by_xml_id(&self, xml_id: &str) -> Option<NodeId> {
        self.document_order()
            .into_iter()
            .find(|&id| self.xml_id_of(id).as_deref() == Some(xml_id))
    }

    /// All stanza IDs in document order
    pub fn all_stanzas(&self) -> Vec<NodeId> {
        self.document_order()
            .into_iter()
            .filter(|id| self.nodes.stanzas.contains_key(id))
            .collect()
    }

    /// All line-like element IDs (lines and heading-likes) in document order
    pub fn all_line_like(&self) -> Vec<NodeId> {
        self.document_order()
            .into_iter()
            .filter(|id| {
                self.nodes.lines.contains_key(id) || self.nodes.headings.contains_key(id)
            })
            .collect()
    }

    // ========================================================================
    // Mutation primitives
    // ========================================================================

    fn child_list_mut(&mut self, parent: NodeId) -> Option<&mut Vec<NodeId>> {
        if let Some(div) = self.nodes.divisions.get_mut(&parent) {
            return Some(&mut div.children);
        }
        if let Some(stanza) = self.nodes.stanzas.get_mut(&parent) {
            return Some(&mut stanza.children);
        }
        None
    }

    fn drop_from_storage(&mut self, id: NodeId) {
        for child in self.children_of(id) {
            self.drop_from_storage(child);
        }
        self.nodes.divisions.remove(&id);
        self.nodes.stanzas.remove(&id);
        self.nodes.lines.remove(&id);
        self.nodes.headings.remove(&id);
        self.nodes.paragraphs.remove(&id);
        self.nodes.page_breaks.remove(&id);
    }

    /// Remove a node and its subtree from the tree
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        if self.node_type(id).is_none() {
            return Err(DocModelError::NodeNotFound(id.as_uuid()));
        }
        match self.parent_of(id) {
            Some(parent) => {
                if let Some(list) = self.child_list_mut(parent) {
                    list.retain(|&c| c != id);
                }
                self.document.bump_revision();
            }
            None => {
                self.document.remove_body_child(id);
            }
        }
        self.drop_from_storage(id);
        Ok(())
    }

    /// Replace `old` in its parent's child list with a new heading-like
    /// node, preserving position. The old node's subtree is dropped.
    pub fn replace_with_heading(&mut self, old: NodeId, heading: HeadingLike) -> Result<NodeId> {
        let parent = self.parent_of(old);
        // Validate the position before touching storage so a failed replace
        // leaves the tree untouched.
        let in_place = match parent {
            Some(parent_id) => self.children_of(parent_id).contains(&old),
            None => self.document.body_children().contains(&old),
        };
        if !in_place {
            return Err(DocModelError::TreeStructure(format!(
                "node {old} is not a child of its recorded parent"
            )));
        }

        let new_id = heading.id();
        self.nodes.headings.insert(new_id, heading);
        match parent {
            Some(parent_id) => {
                if let Some(list) = self.child_list_mut(parent_id) {
                    if let Some(pos) = list.iter().position(|&c| c == old) {
                        list[pos] = new_id;
                    }
                }
                self.set_parent_of(new_id, Some(parent_id));
                self.document.bump_revision();
            }
            None => {
                self.document.replace_body_child(old, new_id);
                self.set_parent_of(new_id, None);
            }
        }
        self.drop_from_storage(old);
        Ok(new_id)
    }

    /// Move all line children of `from` to the end of `to`'s child list,
    /// preserving their order
    pub fn move_lines(&mut self, from: NodeId, to: NodeId) -> Result<usize> {
        self.move_lines_from(from, to, 0)
    }

    /// Move the line children of `from` starting at line index
    /// `first_line` to the end of `to`'s child list, preserving order
    pub fn move_lines_from(&mut self, from: NodeId, to: NodeId, first_line: usize) -> Result<usize> {
        if !self.nodes.stanzas.contains_key(&from) {
            return Err(DocModelError::NodeNotFound(from.as_uuid()));
        }
        if !self.nodes.stanzas.contains_key(&to) {
            return Err(DocModelError::NodeNotFound(to.as_uuid()));
        }
        let all = self.stanza_line_ids(from);
        if first_line >= all.len() {
            return Ok(0);
        }
        let moved: Vec<NodeId> = all[first_line..].to_vec();
        if let Some(list) = self.child_list_mut(from) {
            let moved_set: Vec<NodeId> = moved.clone();
            list.retain(|c| !moved_set.contains(c));
        }
        if let Some(list) = self.child_list_mut(to) {
            list.extend(moved.iter().copied());
        }
        for &line_id in &moved {
            self.set_parent_of(line_id, Some(to));
        }
        self.document.bump_revision();
        Ok(moved.len())
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}
