//! Node types of the manuscript tree

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// Enumeration of all node types in the manuscript tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Division,
    Stanza,
    Line,
    Heading,
    Paragraph,
    PageBreak,
}

/// Kind of a structural division (`<div>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DivisionKind {
    Poem,
    Part,
    Generic,
}

/// Kind of a heading-like element.
///
/// Any of these can be produced by retagging a poem line, and all of them
/// are candidates for content-matched deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingKind {
    Heading,
    Subtitle,
    Dedication,
    Epigraph,
    Dateline,
}

/// Common interface for all manuscript nodes
pub trait Node: std::fmt::Debug {
    /// Get the unique ID of this node
    fn id(&self) -> NodeId;

    /// Get the type of this node
    fn node_type(&self) -> NodeType;

    /// Get the IDs of child nodes
    fn children(&self) -> &[NodeId] {
        &[]
    }

    /// Get the ID of the parent node (None for body-level nodes)
    fn parent(&self) -> Option<NodeId>;

    /// Set the parent node ID
    fn set_parent(&mut self, parent: Option<NodeId>);

    /// Get the direct text content of this node (if any)
    fn text_content(&self) -> Option<&str> {
        None
    }

    /// Get the facsimile reference carried by this node (if any).
    ///
    /// Facsimile references can encode a page number and then act as a
    /// secondary page-marker representation.
    fn facsimile(&self) -> Option<&str> {
        None
    }
}

/// A structural grouping (`<div type="poem">`, `<div type="part">`, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    id: NodeId,
    parent: Option<NodeId>,
    pub kind: DivisionKind,
    pub xml_id: Option<String>,
    /// Ordered children: stanzas, headings, paragraphs, page breaks,
    /// nested divisions.
    pub children: Vec<NodeId>,
    pub facsimile: Option<String>,
}

impl Division {
    pub fn new(kind: DivisionKind) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            kind,
            xml_id: None,
            children: Vec::new(),
            facsimile: None,
        }
    }

    pub fn with_xml_id(mut self, xml_id: impl Into<String>) -> Self {
        self.xml_id = Some(xml_id.into());
        self
    }
}

impl Node for Division {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Division
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn facsimile(&self) -> Option<&str> {
        self.facsimile.as_deref()
    }
}

/// An ordered group of lines (`<lg type="stanza">`).
///
/// `number` is a 1-based display index and is not stable across edits; an
/// `xml_id` that encodes the number (`poem_1_stanza_3`) is regenerated on
/// renumbering. Callers must tolerate both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stanza {
    id: NodeId,
    parent: Option<NodeId>,
    pub number: u32,
    pub xml_id: Option<String>,
    /// Ordered children. Mostly lines, but a retagged line leaves a
    /// heading-like node in place, so the list is mixed.
    pub children: Vec<NodeId>,
    pub facsimile: Option<String>,
}

impl Stanza {
    pub fn new(number: u32) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            number,
            xml_id: None,
            children: Vec::new(),
            facsimile: None,
        }
    }

    pub fn with_xml_id(mut self, xml_id: impl Into<String>) -> Self {
        self.xml_id = Some(xml_id.into());
        self
    }
}

impl Node for Stanza {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Stanza
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn facsimile(&self) -> Option<&str> {
        self.facsimile.as_deref()
    }
}

/// A single verse line (`<l>`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    id: NodeId,
    parent: Option<NodeId>,
    pub number: u32,
    pub xml_id: Option<String>,
    pub text: String,
    pub facsimile: Option<String>,
}

impl Line {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            number,
            xml_id: None,
            text: text.into(),
            facsimile: None,
        }
    }

    pub fn with_xml_id(mut self, xml_id: impl Into<String>) -> Self {
        self.xml_id = Some(xml_id.into());
        self
    }
}

impl Node for Line {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Line
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn text_content(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn facsimile(&self) -> Option<&str> {
        self.facsimile.as_deref()
    }
}

/// A heading-like element: `<head>`, `<head type="sub">`, `<dedication>`,
/// `<epigraph>`, `<dateline>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingLike {
    id: NodeId,
    parent: Option<NodeId>,
    pub kind: HeadingKind,
    pub xml_id: Option<String>,
    pub text: String,
    pub facsimile: Option<String>,
}

impl HeadingLike {
    pub fn new(kind: HeadingKind, text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            kind,
            xml_id: None,
            text: text.into(),
            facsimile: None,
        }
    }
}

impl Node for HeadingLike {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Heading
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn text_content(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn facsimile(&self) -> Option<&str> {
        self.facsimile.as_deref()
    }
}

/// A prose paragraph (`<p>`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    id: NodeId,
    parent: Option<NodeId>,
    pub text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            text: text.into(),
        }
    }
}

impl Node for Paragraph {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Paragraph
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn text_content(&self) -> Option<&str> {
        Some(&self.text)
    }
}

/// A page break marker (`<pb n="..." facs="..."/>`), marking the start of a
/// physical manuscript page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageBreak {
    id: NodeId,
    parent: Option<NodeId>,
    pub page_number: u32,
    pub facsimile: Option<String>,
}

impl PageBreak {
    pub fn new(page_number: u32) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            page_number,
            facsimile: None,
        }
    }

    pub fn with_facsimile(mut self, facsimile: impl Into<String>) -> Self {
        self.facsimile = Some(facsimile.into());
        self
    }
}

impl Node for PageBreak {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::PageBreak
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn facsimile(&self) -> Option<&str> {
        self.facsimile.as_deref()
    }
}
