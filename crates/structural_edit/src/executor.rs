//! Operation dispatch over a document tree

use crate::{
    convert, delete, merge, split, EditOperation, MatchPolicy, OperationOutcome, Result,
};
use manuscript_model::{DocumentTree, HeadingKind, SelectionPayload};
use tracing::debug;

/// Owns a document tree and applies named structural operations to it.
///
/// Every operation validates its preconditions before touching the tree,
/// so a failed call leaves the document and its revision counter exactly
/// as they were.
pub struct StructuralEditor {
    tree: DocumentTree,
    policy: MatchPolicy,
}

impl StructuralEditor {
    pub fn new(tree: DocumentTree) -> Self {
        Self {
            tree,
            policy: MatchPolicy::default(),
        }
    }

    pub fn with_policy(tree: DocumentTree, policy: MatchPolicy) -> Self {
        Self { tree, policy }
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DocumentTree {
        &mut self.tree
    }

    pub fn into_tree(self) -> DocumentTree {
        self.tree
    }

    /// Apply an operation named by its wire id, as received from a host
    /// command palette or menu.
    pub fn execute_named(
        &mut self,
        name: &str,
        selection: &SelectionPayload,
    ) -> Result<OperationOutcome> {
        let operation = EditOperation::parse(name)
            .ok_or_else(|| crate::EditError::UnknownOperation(name.to_string()))?;
        self.execute(operation, selection)
    }

    /// Apply one structural operation to the current document.
    pub fn execute(
        &mut self,
        operation: EditOperation,
        selection: &SelectionPayload,
    ) -> Result<OperationOutcome> {
        debug!(operation = %operation, "executing structural operation");
        match operation {
            EditOperation::MergeStanzas => {
                let result = merge::merge_stanzas(&mut self.tree, selection, &self.policy)?;
                Ok(OperationOutcome::Merged {
                    stanza: result.stanza,
                    merged: result.merged,
                })
            }
            EditOperation::SplitStanza => {
                let result = split::split_stanza(&mut self.tree, selection, &self.policy)?;
                Ok(OperationOutcome::Split {
                    first: result.first,
                    second: result.second,
                })
            }
            EditOperation::TagDedication
            | EditOperation::TagSubtitle
            | EditOperation::TagEpigraph
            | EditOperation::TagHeading => {
                let kind = match operation {
                    EditOperation::TagDedication => HeadingKind::Dedication,
                    EditOperation::TagSubtitle => HeadingKind::Subtitle,
                    EditOperation::TagEpigraph => HeadingKind::Epigraph,
                    _ => HeadingKind::Heading,
                };
                let result =
                    convert::convert_line_element(&mut self.tree, selection, kind, &self.policy)?;
                Ok(OperationOutcome::Tagged {
                    node: result.node,
                    kind: result.kind,
                    original_text: result.original_text,
                })
            }
            EditOperation::DeleteElement => {
                let result = delete::delete_element(&mut self.tree, selection, &self.policy)?;
                Ok(OperationOutcome::Deleted {
                    target: result.target,
                    text: result.text,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manuscript_model::{Division, DivisionKind, HeadingKind, Line, Stanza};

    fn two_stanza_poem() -> StructuralEditor {
        let mut tree = DocumentTree::new();
        let poem = tree
            .insert_division(Division::new(DivisionKind::Poem).with_xml_id("poem_1"), None)
            .unwrap();
        let s1 = tree
            .insert_stanza(Stanza::new(1).with_xml_id("poem_1_stanza_1"), poem)
            .unwrap();
        tree.insert_line(Line::new(1, "Had we but world enough and time,"), s1)
            .unwrap();
        tree.insert_line(Line::new(2, "This coyness, lady, were no crime."), s1)
            .unwrap();
        let s2 = tree
            .insert_stanza(Stanza::new(2).with_xml_id("poem_1_stanza_2"), poem)
            .unwrap();
        tree.insert_line(Line::new(1, "We would sit down, and think which way"), s2)
            .unwrap();
        tree.insert_line(Line::new(2, "To walk, and pass our long love's day."), s2)
            .unwrap();
        StructuralEditor::new(tree)
    }

    #[test]
    fn test_execute_merge_reports_outcome() {
        let mut editor = two_stanza_poem();
        let selection =
            SelectionPayload::from_element_ids(["poem_1_stanza_1", "poem_1_stanza_2"]);

        let outcome = editor
            .execute(EditOperation::MergeStanzas, &selection)
            .unwrap();
        let OperationOutcome::Merged { stanza, merged } = outcome else {
            panic!("expected a merge outcome");
        };
        assert_eq!(merged, 2);
        assert_eq!(editor.tree().stanza_line_ids(stanza).len(), 4);
    }

    #[test]
    fn test_execute_tag_then_delete() {
        let mut editor = two_stanza_poem();
        let selection = SelectionPayload::from_text("Had we but world enough and time,");

        let outcome = editor
            .execute(EditOperation::TagDedication, &selection)
            .unwrap();
        let OperationOutcome::Tagged { kind, .. } = outcome else {
            panic!("expected a tag outcome");
        };
        assert_eq!(kind, HeadingKind::Dedication);

        let outcome = editor
            .execute(EditOperation::DeleteElement, &selection)
            .unwrap();
        assert!(matches!(outcome, OperationOutcome::Deleted { .. }));
    }

    #[test]
    fn test_execute_named_rejects_unknown_operations() {
        let mut editor = two_stanza_poem();
        let selection = SelectionPayload::default();
        let err = editor
            .execute_named("tag-limerick", &selection)
            .unwrap_err();
        assert!(matches!(err, crate::EditError::UnknownOperation(_)));
    }

    #[test]
    fn test_failed_execute_leaves_revision_untouched() {
        let mut editor = two_stanza_poem();
        let revision = editor.tree().revision();
        let selection = SelectionPayload::from_element_ids(["poem_1_stanza_1"]);

        let err = editor
            .execute(EditOperation::MergeStanzas, &selection)
            .unwrap_err();
        assert!(matches!(err, crate::EditError::Validation(_)));
        assert_eq!(editor.tree().revision(), revision);
    }
}
