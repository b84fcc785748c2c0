//! Retagging line-like elements

use crate::{renumber, resolve, EditError, MatchPolicy, Result};
use manuscript_model::{
    DocumentTree, HeadingKind, HeadingLike, NodeId, NodeType, SelectionPayload,
};

/// Result of retagging a line-like element
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// The newly constructed node carrying the original text
    pub node: NodeId,
    pub kind: HeadingKind,
    pub original_text: String,
}

/// Convert a line or heading-like element to a different semantic kind.
///
/// The element is resolved from the selection (ancestor lookup, then
/// content matching); the replacement carries the element's trimmed text.
/// Remaining lines are renumbered only when the replaced element was a
/// poem line.
pub fn convert_line_element(
    tree: &mut DocumentTree,
    selection: &SelectionPayload,
    target_kind: HeadingKind,
    policy: &MatchPolicy,
) -> Result<ConvertResult> {
    let element = resolve::resolve_line_like(tree, selection, policy).ok_or_else(|| {
        EditError::ElementNotFound(
            "select a poem line or heading to convert".to_string(),
        )
    })?;

    let was_line = tree.node_type(element) == Some(NodeType::Line);
    let parent_stanza = tree.find_ancestor_of_kind(element, NodeType::Stanza);
    let original_text = tree.node_text(element).trim().to_string();

    let node = tree.replace_with_heading(
        element,
        HeadingLike::new(target_kind, original_text.clone()),
    )?;

    if was_line {
        if let Some(stanza) = parent_stanza {
            renumber::renumber_stanza_lines(tree, stanza);
        }
    }

    Ok(ConvertResult {
        node,
        kind: target_kind,
        original_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use manuscript_model::{Division, DivisionKind, Line, Stanza};

    fn poem() -> (DocumentTree, NodeId) {
        let mut tree = DocumentTree::new();
        let poem = tree
            .insert_division(Division::new(DivisionKind::Poem).with_xml_id("poem_1"), None)
            .unwrap();
        let stanza = tree.insert_stanza(Stanza::new(1), poem).unwrap();
        for (n, text) in [
            (1u32, "Annihilating all that's made"),
            (2, "To a green thought in a green shade;"),
            (3, "Here at the fountain's sliding foot,"),
        ] {
            tree.insert_line(Line::new(n, text), stanza).unwrap();
        }
        (tree, stanza)
    }

    #[test]
    fn test_convert_line_to_heading_preserves_text() {
        let (mut tree, stanza) = poem();
        let line = tree.stanza_line_ids(stanza)[0];
        let selection = SelectionPayload {
            start_node: Some(line),
            ..Default::default()
        };

        let result = convert_line_element(
            &mut tree,
            &selection,
            HeadingKind::Heading,
            &MatchPolicy::default(),
        )
        .unwrap();

        assert_eq!(result.original_text, "Annihilating all that's made");
        assert_eq!(tree.node_text(result.node), result.original_text);
        assert_eq!(
            tree.get_heading(result.node).unwrap().kind,
            HeadingKind::Heading
        );
    }

    #[test]
    fn test_convert_line_renumbers_remaining_lines() {
        let (mut tree, stanza) = poem();
        let line = tree.stanza_line_ids(stanza)[0];
        let selection = SelectionPayload {
            start_node: Some(line),
            ..Default::default()
        };

        convert_line_element(
            &mut tree,
            &selection,
            HeadingKind::Dedication,
            &MatchPolicy::default(),
        )
        .unwrap();

        let numbers: Vec<u32> = tree
            .stanza_line_ids(stanza)
            .into_iter()
            .filter_map(|id| tree.get_line(id).map(|l| l.number))
            .collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_convert_heading_does_not_renumber() {
        let (mut tree, stanza) = poem();
        let line = tree.stanza_line_ids(stanza)[1];
        let selection = SelectionPayload {
            start_node: Some(line),
            ..Default::default()
        };
        // First retag line 2 into a subtitle.
        convert_line_element(
            &mut tree,
            &selection,
            HeadingKind::Subtitle,
            &MatchPolicy::default(),
        )
        .unwrap();

        // Retagging the subtitle again must not disturb line numbering.
        let numbers_before: Vec<u32> = tree
            .stanza_line_ids(stanza)
            .into_iter()
            .filter_map(|id| tree.get_line(id).map(|l| l.number))
            .collect();
        let selection =
            SelectionPayload::from_text("To a green thought in a green shade;");
        convert_line_element(
            &mut tree,
            &selection,
            HeadingKind::Epigraph,
            &MatchPolicy::default(),
        )
        .unwrap();
        let numbers_after: Vec<u32> = tree
            .stanza_line_ids(stanza)
            .into_iter()
            .filter_map(|id| tree.get_line(id).map(|l| l.number))
            .collect();
        assert_eq!(numbers_before, numbers_after);
    }

    #[test]
    fn test_convert_resolves_via_content_fallback() {
        let (mut tree, _) = poem();
        let selection = SelectionPayload::from_text("Here at the fountain's sliding foot,");

        let result = convert_line_element(
            &mut tree,
            &selection,
            HeadingKind::Dateline,
            &MatchPolicy::default(),
        )
        .unwrap();
        assert_eq!(result.kind, HeadingKind::Dateline);
    }

    #[test]
    fn test_convert_unresolvable_selection_fails() {
        let (mut tree, _) = poem();
        let revision = tree.revision();
        let selection = SelectionPayload::from_text("no such words in the poem");

        let err = convert_line_element(
            &mut tree,
            &selection,
            HeadingKind::Heading,
            &MatchPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EditError::ElementNotFound(_)));
        assert_eq!(tree.revision(), revision);
    }
}
