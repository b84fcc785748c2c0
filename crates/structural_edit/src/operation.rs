//! Operation identifiers and outcomes

use crate::delete::DeleteTarget;
use manuscript_model::{HeadingKind, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural operations the editor dispatches by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditOperation {
    MergeStanzas,
    SplitStanza,
    TagDedication,
    TagSubtitle,
    TagEpigraph,
    TagHeading,
    DeleteElement,
}

impl EditOperation {
    /// The heading kind a tagging operation produces, if it is one.
    pub fn tag_kind(&self) -> Option<HeadingKind> {
        match self {
            EditOperation::TagDedication => Some(HeadingKind::Dedication),
            EditOperation::TagSubtitle => Some(HeadingKind::Subtitle),
            EditOperation::TagEpigraph => Some(HeadingKind::Epigraph),
            EditOperation::TagHeading => Some(HeadingKind::Heading),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EditOperation::MergeStanzas => "merge-stanzas",
            EditOperation::SplitStanza => "split-stanza",
            EditOperation::TagDedication => "tag-dedication",
            EditOperation::TagSubtitle => "tag-subtitle",
            EditOperation::TagEpigraph => "tag-epigraph",
            EditOperation::TagHeading => "tag-heading",
            EditOperation::DeleteElement => "delete-element",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "merge-stanzas" => Some(EditOperation::MergeStanzas),
            "split-stanza" => Some(EditOperation::SplitStanza),
            "tag-dedication" => Some(EditOperation::TagDedication),
            "tag-subtitle" => Some(EditOperation::TagSubtitle),
            "tag-epigraph" => Some(EditOperation::TagEpigraph),
            "tag-heading" => Some(EditOperation::TagHeading),
            "delete-element" => Some(EditOperation::DeleteElement),
            _ => None,
        }
    }
}

impl fmt::Display for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an operation did to the tree, for callers that surface feedback
/// or drive a view refresh.
#[derive(Debug, Clone)]
pub enum OperationOutcome {
    Merged {
        /// The surviving stanza
        stanza: NodeId,
        /// How many stanzas were folded into it, the survivor included
        merged: usize,
    },
    Split {
        first: NodeId,
        second: NodeId,
    },
    Tagged {
        node: NodeId,
        kind: HeadingKind,
        original_text: String,
    },
    Deleted {
        target: DeleteTarget,
        text: String,
    },
}
