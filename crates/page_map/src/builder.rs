//! Building the page map from markers and view geometry

use crate::{
    PageMap, PageMapping, PaneContent, PaneHeights, PanePositions, ViewId, ViewSet,
};
use manuscript_model::serialize;
use manuscript_model::DocumentTree;
use std::collections::HashMap;
use tracing::debug;

/// Line height used for source-pane offsets when the view cannot supply
/// a measured one. Matches a 14px monospace font at 1.2 line spacing.
pub const DEFAULT_LINE_HEIGHT: f64 = 16.8;

/// Correlates the document's page markers with the geometry each mounted
/// view reports, producing one `PageMapping` per attested page.
///
/// Building never fails. A pane that is unmounted, or that realized no
/// block for a page, contributes nothing for that page; the mapping
/// still exists so navigation in the other panes keeps working.
pub struct PageMapBuilder;

impl PageMapBuilder {
    pub fn build(tree: &DocumentTree, views: &ViewSet<'_>) -> PageMap {
        let markers = tree.page_markers();
        debug!(pages = markers.len(), "building page map");

        let image_anchors = anchors_by_page(views, ViewId::Image);
        let text_anchors = anchors_by_page(views, ViewId::Text);
        let text_content_height = views
            .get(ViewId::Text)
            .map(|v| v.content_height())
            .unwrap_or(0.0);

        // Text-pane heights come from the gap to the following anchor,
        // because a page's block runs until the next page begins.
        let mut text_tops: Vec<f64> = text_anchors.values().map(|a| a.0).collect();
        text_tops.sort_by(f64::total_cmp);

        let source_text = source_text(tree, views);
        let line_height = views
            .get(ViewId::Source)
            .and_then(|v| v.measured_line_height())
            .unwrap_or(DEFAULT_LINE_HEIGHT);

        let mappings = markers
            .iter()
            .map(|marker| {
                let page = marker.page_number;
                let mut mapping = PageMapping {
                    page_number: page,
                    facsimile: marker.facsimile.clone(),
                    ..PageMapping::default()
                };

                if let Some(&(top, height)) = image_anchors.get(&page) {
                    mapping.positions.image = top;
                    mapping.heights.image = height;
                    mapping.has_content.image = true;
                }

                if let Some(&(top, _)) = text_anchors.get(&page) {
                    mapping.positions.text = top;
                    mapping.heights.text = text_extent(&text_tops, top, text_content_height);
                    mapping.has_content.text = true;
                }

                mapping.positions.source = serialize::page_break_line_index(&source_text, page)
                    .map(|line| line as f64 * line_height)
                    .unwrap_or(0.0);

                mapping
            })
            .collect();

        PageMap::new(mappings, tree.revision())
    }
}

fn anchors_by_page(views: &ViewSet<'_>, id: ViewId) -> HashMap<u32, (f64, f64)> {
    let mut by_page = HashMap::new();
    if let Some(view) = views.get(id) {
        for anchor in view.page_anchors() {
            by_page
                .entry(anchor.page_number)
                .or_insert((anchor.offset_top, anchor.height));
        }
    }
    by_page
}

fn text_extent(sorted_tops: &[f64], top: f64, content_height: f64) -> f64 {
    sorted_tops
        .iter()
        .find(|&&t| t > top)
        .map(|&next| next - top)
        .unwrap_or_else(|| (content_height - top).max(0.0))
}

/// The authoritative source text for line-index lookups: the adapter's
/// full text when it has one, its visible portion otherwise, and the
/// tree's own serialization as the last resort.
fn source_text(tree: &DocumentTree, views: &ViewSet<'_>) -> String {
    views
        .get(ViewId::Source)
        .and_then(|v| v.full_text().or_else(|| v.visible_text()))
        .unwrap_or_else(|| serialize::to_xml(tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StubView;
    use manuscript_model::{Division, DivisionKind, Line, PageBreak, Stanza};

    fn marked_tree(pages: &[u32]) -> DocumentTree {
        let mut tree = DocumentTree::new();
        let poem = tree
            .insert_division(Division::new(DivisionKind::Poem), None)
            .unwrap();
        for &page in pages {
            tree.insert_page_break(PageBreak::new(page), Some(poem))
                .unwrap();
            let stanza = tree.insert_stanza(Stanza::new(page), poem).unwrap();
            tree.insert_line(Line::new(1, format!("first line of page {page}")), stanza)
                .unwrap();
        }
        tree
    }

    #[test]
    fn test_map_is_total_over_gappy_markers() {
        let tree = marked_tree(&[1, 3, 4, 7]);
        let map = PageMapBuilder::build(&tree, &ViewSet::default());

        assert_eq!(map.len(), 4);
        assert_eq!(map.total_pages(), 7);
        for page in [1, 3, 4, 7] {
            assert!(map.contains(page));
        }
        assert!(!map.contains(2));
    }

    #[test]
    fn test_anchor_offsets_and_text_heights() {
        let tree = marked_tree(&[1, 2, 3]);
        let mut text = StubView::text(2000.0)
            .with_anchor(1, 0.0, 0.0)
            .with_anchor(2, 600.0, 0.0)
            .with_anchor(3, 1500.0, 0.0);
        let mut image = StubView::image(3000.0)
            .with_anchor(1, 10.0, 900.0)
            .with_anchor(2, 930.0, 900.0)
            .with_anchor(3, 1850.0, 900.0);
        let views = ViewSet {
            image: Some(&mut image),
            text: Some(&mut text),
            source: None,
        };

        let map = PageMapBuilder::build(&tree, &views);

        let m2 = map.mapping(2).unwrap();
        assert_eq!(m2.positions.text, 600.0);
        assert_eq!(m2.heights.text, 900.0);
        assert_eq!(m2.positions.image, 930.0);
        assert_eq!(m2.heights.image, 900.0);
        // Last page's text block runs to the end of the content.
        let m3 = map.mapping(3).unwrap();
        assert_eq!(m3.heights.text, 500.0);
    }

    #[test]
    fn test_missing_anchor_degrades_to_no_content() {
        let tree = marked_tree(&[1, 2]);
        let mut text = StubView::text(1000.0).with_anchor(1, 0.0, 0.0);
        let views = ViewSet {
            image: None,
            text: Some(&mut text),
            source: None,
        };

        let map = PageMapBuilder::build(&tree, &views);

        let m2 = map.mapping(2).unwrap();
        assert!(!m2.has_content.text);
        assert!(!m2.has_content.image);
        assert_eq!(m2.positions.text, 0.0);
        assert_eq!(map.position_in(2, ViewId::Text), None);
    }

    #[test]
    fn test_source_offsets_from_pb_line_index() {
        let tree = marked_tree(&[1, 2]);
        let xml = manuscript_model::serialize::to_xml(&tree);
        let mut source = StubView::source(&xml).with_line_height(20.0);
        let views = ViewSet {
            image: None,
            text: None,
            source: Some(&mut source),
        };

        let map = PageMapBuilder::build(&tree, &views);

        let line_1 = manuscript_model::serialize::page_break_line_index(&xml, 1).unwrap();
        let line_2 = manuscript_model::serialize::page_break_line_index(&xml, 2).unwrap();
        assert_eq!(map.mapping(1).unwrap().positions.source, line_1 as f64 * 20.0);
        assert_eq!(map.mapping(2).unwrap().positions.source, line_2 as f64 * 20.0);
    }

    #[test]
    fn test_source_falls_back_to_serialized_tree() {
        let tree = marked_tree(&[1, 2]);
        // No source view at all: offsets still come from the tree's own
        // serialization at the default line height.
        let map = PageMapBuilder::build(&tree, &ViewSet::default());

        let xml = manuscript_model::serialize::to_xml(&tree);
        let line_2 = manuscript_model::serialize::page_break_line_index(&xml, 2).unwrap();
        assert_eq!(
            map.mapping(2).unwrap().positions.source,
            line_2 as f64 * DEFAULT_LINE_HEIGHT
        );
    }

    #[test]
    fn test_unmounted_views_contribute_nothing() {
        let tree = marked_tree(&[1]);
        let mut image = StubView::image(3000.0)
            .with_anchor(1, 10.0, 900.0)
            .unmounted();
        let views = ViewSet {
            image: Some(&mut image),
            text: None,
            source: None,
        };

        let map = PageMapBuilder::build(&tree, &views);
        assert!(!map.mapping(1).unwrap().has_content.image);
    }

    #[test]
    fn test_map_carries_document_revision() {
        let mut tree = marked_tree(&[1]);
        let before = PageMapBuilder::build(&tree, &ViewSet::default());
        tree.document.bump_revision();
        let after = PageMapBuilder::build(&tree, &ViewSet::default());

        assert_eq!(before.revision(), tree.revision() - 1);
        assert_eq!(after.revision(), tree.revision());
    }
}
