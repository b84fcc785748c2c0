//! Stanza splitting

use crate::{renumber, resolve, EditError, MatchPolicy, Result};
use manuscript_model::{DocumentTree, NodeId, NodeType, SelectionPayload, Stanza};

/// Result of splitting a stanza
#[derive(Debug, Clone, Copy)]
pub struct SplitResult {
    /// The original stanza, now holding lines before the boundary
    pub first: NodeId,
    /// The newly created stanza holding the remaining lines
    pub second: NodeId,
}

/// Split a stanza before line index `at_line` (0-based).
///
/// Both halves must end up non-empty, so `at_line` must be strictly
/// between 0 and the line count. This makes splitting the exact content
/// inverse of a merge at the same boundary.
pub fn split_stanza_at(
    tree: &mut DocumentTree,
    stanza: NodeId,
    at_line: usize,
) -> Result<SplitResult> {
    let lines = tree.stanza_line_ids(stanza);
    if lines.is_empty() {
        return Err(EditError::Validation("cannot split an empty stanza".to_string()));
    }
    if at_line == 0 || at_line >= lines.len() {
        return Err(EditError::Validation(format!(
            "split index {at_line} must leave both stanzas non-empty (1..{})",
            lines.len() - 1
        )));
    }
    let parent = tree
        .parent_of(stanza)
        .filter(|p| tree.get_division(*p).is_some())
        .ok_or_else(|| {
            EditError::Validation("stanza has no containing division".to_string())
        })?;
    let index = tree
        .children_of(parent)
        .iter()
        .position(|&c| c == stanza)
        .ok_or_else(|| EditError::Validation("stanza detached from division".to_string()))?;

    // Placeholder number and id; the renumber pass assigns the real ones.
    let mut second = Stanza::new(0);
    if tree.get_stanza(stanza).and_then(|s| s.xml_id.as_ref()).is_some() {
        if let Some(div_id) = tree.get_division(parent).and_then(|d| d.xml_id.clone()) {
            second.xml_id = Some(format!("{div_id}_stanza_0"));
        }
    }
    let second_id = tree.insert_stanza_at(second, parent, index + 1)?;
    tree.move_lines_from(stanza, second_id, at_line)?;

    renumber::renumber_stanza_lines(tree, stanza);
    renumber::renumber_stanza_lines(tree, second_id);
    renumber::renumber_division_stanzas(tree, parent);

    Ok(SplitResult {
        first: stanza,
        second: second_id,
    })
}

/// Split the stanza containing the selected line, with the selected line
/// becoming the first line of the new stanza.
pub fn split_stanza(
    tree: &mut DocumentTree,
    selection: &SelectionPayload,
    policy: &MatchPolicy,
) -> Result<SplitResult> {
    let element = resolve::resolve_line_like(tree, selection, policy).ok_or_else(|| {
        EditError::ElementNotFound("select a poem line to split its stanza at".to_string())
    })?;
    if tree.node_type(element) != Some(NodeType::Line) {
        return Err(EditError::ElementNotFound(
            "stanzas can only be split at a poem line".to_string(),
        ));
    }
    let stanza = tree
        .find_ancestor_of_kind(element, NodeType::Stanza)
        .ok_or_else(|| {
            EditError::ElementNotFound("selected line is not inside a stanza".to_string())
        })?;
    let at_line = tree
        .stanza_line_ids(stanza)
        .iter()
        .position(|&l| l == element)
        .unwrap_or(0);
    split_stanza_at(tree, stanza, at_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_stanzas;
    use manuscript_model::{Division, DivisionKind, Line};

    fn poem_with_stanzas(line_counts: &[usize]) -> (DocumentTree, NodeId, Vec<NodeId>) {
        let mut tree = DocumentTree::new();
        let poem = tree
            .insert_division(Division::new(DivisionKind::Poem).with_xml_id("poem_1"), None)
            .unwrap();
        let mut stanzas = Vec::new();
        for (i, &count) in line_counts.iter().enumerate() {
            let n = i as u32 + 1;
            let stanza = tree
                .insert_stanza(
                    Stanza::new(n).with_xml_id(format!("poem_1_stanza_{n}")),
                    poem,
                )
                .unwrap();
            for l in 1..=count {
                tree.insert_line(
                    Line::new(l as u32, format!("stanza {n} line {l}")),
                    stanza,
                )
                .unwrap();
            }
            stanzas.push(stanza);
        }
        (tree, poem, stanzas)
    }

    fn stanza_texts(tree: &DocumentTree, stanza: NodeId) -> Vec<String> {
        tree.stanza_line_ids(stanza)
            .into_iter()
            .map(|id| tree.node_text(id))
            .collect()
    }

    #[test]
    fn test_split_divides_lines() {
        let (mut tree, poem, stanzas) = poem_with_stanzas(&[5]);
        let result = split_stanza_at(&mut tree, stanzas[0], 2).unwrap();

        assert_eq!(stanza_texts(&tree, result.first).len(), 2);
        assert_eq!(stanza_texts(&tree, result.second).len(), 3);
        assert_eq!(tree.get_stanza(result.second).unwrap().number, 2);
        assert_eq!(
            tree.get_stanza(result.second).unwrap().xml_id.as_deref(),
            Some("poem_1_stanza_2")
        );
        assert_eq!(tree.children_of(poem).len(), 2);
    }

    #[test]
    fn test_split_rejects_boundary_indices() {
        let (mut tree, _, stanzas) = poem_with_stanzas(&[3]);
        for bad in [0usize, 3, 7] {
            let err = split_stanza_at(&mut tree, stanzas[0], bad).unwrap_err();
            assert!(matches!(err, EditError::Validation(_)));
        }
        assert_eq!(stanza_texts(&tree, stanzas[0]).len(), 3);
    }

    #[test]
    fn test_merge_then_split_recovers_content() {
        let (mut tree, _, _) = poem_with_stanzas(&[3, 2]);
        let policy = MatchPolicy::default();

        let merged = merge_stanzas(
            &mut tree,
            &SelectionPayload::from_element_ids(["poem_1_stanza_1", "poem_1_stanza_2"]),
            &policy,
        )
        .unwrap();
        let split = split_stanza_at(&mut tree, merged.stanza, 3).unwrap();

        assert_eq!(
            stanza_texts(&tree, split.first),
            vec!["stanza 1 line 1", "stanza 1 line 2", "stanza 1 line 3"]
        );
        assert_eq!(
            stanza_texts(&tree, split.second),
            vec!["stanza 2 line 1", "stanza 2 line 2"]
        );
    }

    #[test]
    fn test_split_via_selected_line() {
        let (mut tree, _, stanzas) = poem_with_stanzas(&[4]);
        let boundary_line = tree.stanza_line_ids(stanzas[0])[2];
        let selection = SelectionPayload {
            start_node: Some(boundary_line),
            ..Default::default()
        };

        let result = split_stanza(&mut tree, &selection, &MatchPolicy::default()).unwrap();
        assert_eq!(
            stanza_texts(&tree, result.second)[0],
            "stanza 1 line 3"
        );
    }
}
