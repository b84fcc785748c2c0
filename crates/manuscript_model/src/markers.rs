//! Page markers: the bridge between the manuscript tree and physical pages

use crate::{DocumentTree, NodeId, NodeType};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which representation produced a page marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSource {
    /// A dedicated `<pb>` marker node
    Element,
    /// A `facs` attribute on some other node
    Facsimile,
}

/// A resolved page marker: a position in the document associated with a
/// physical manuscript page number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMarker {
    pub page_number: u32,
    pub source: MarkerSource,
    pub node: NodeId,
    pub facsimile: String,
}

/// Extract a page number from a facsimile reference such as
/// `page_0012.png`
pub fn page_number_from_facsimile(facs: &str) -> Option<u32> {
    // Compilation cost is irrelevant here; markers are enumerated once per
    // rebuild.
    let re = Regex::new(r"page_0*(\d+)").ok()?;
    re.captures(facs)?.get(1)?.as_str().parse().ok()
}

/// Default facsimile filename for a page with no explicit reference
pub fn default_facsimile(page_number: u32) -> String {
    format!("page_{page_number:04}.png")
}

impl DocumentTree {
    /// Enumerate page markers across both representations.
    ///
    /// Dedicated `<pb>` nodes are collected first, then facsimile
    /// attributes on other nodes fill in pages no `<pb>` claimed.
    /// Duplicate page numbers are dropped first-seen-wins, so a dedicated
    /// marker always beats a facsimile attribute for the same page. The
    /// result is sorted ascending by page number; gaps are permitted and
    /// represent pages with no distinguishing content.
    pub fn page_markers(&self) -> Vec<PageMarker> {
        let order = self.document_order();
        let mut seen: HashSet<u32> = HashSet::new();
        let mut markers = Vec::new();

        for &id in &order {
            if self.node_type(id) != Some(NodeType::PageBreak) {
                continue;
            }
            let Some(pb) = self.get_page_break(id) else {
                continue;
            };
            if !seen.insert(pb.page_number) {
                continue;
            }
            markers.push(PageMarker {
                page_number: pb.page_number,
                source: MarkerSource::Element,
                node: id,
                facsimile: pb
                    .facsimile
                    .clone()
                    .unwrap_or_else(|| default_facsimile(pb.page_number)),
            });
        }

        for &id in &order {
            if self.node_type(id) == Some(NodeType::PageBreak) {
                continue;
            }
            let Some(facs) = self.facsimile_of(id) else {
                continue;
            };
            let Some(page_number) = page_number_from_facsimile(&facs) else {
                continue;
            };
            if !seen.insert(page_number) {
                continue;
            }
            markers.push(PageMarker {
                page_number,
                source: MarkerSource::Facsimile,
                node: id,
                facsimile: facs,
            });
        }

        markers.sort_by_key(|m| m.page_number);
        markers
    }

    /// Highest marked page number, i.e. the total page count.
    ///
    /// This is the max marker, not the marker count: gaps are legal.
    pub fn total_pages(&self) -> u32 {
        self.page_markers()
            .last()
            .map(|m| m.page_number)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Division, DivisionKind, PageBreak, Stanza};

    #[test]
    fn test_facsimile_page_number_extraction() {
        assert_eq!(page_number_from_facsimile("page_0005.png"), Some(5));
        assert_eq!(page_number_from_facsimile("scans/page_12.jpg"), Some(12));
        assert_eq!(page_number_from_facsimile("cover.png"), None);
    }

    #[test]
    fn test_markers_sorted_with_gaps() {
        let mut tree = DocumentTree::new();
        for n in [4u32, 1, 7, 3] {
            tree.insert_page_break(PageBreak::new(n), None).unwrap();
        }

        let markers = tree.page_markers();
        let pages: Vec<u32> = markers.iter().map(|m| m.page_number).collect();
        assert_eq!(pages, vec![1, 3, 4, 7]);
        assert_eq!(tree.total_pages(), 7);
    }

    #[test]
    fn test_dedup_prefers_dedicated_marker() {
        let mut tree = DocumentTree::new();
        let poem = tree
            .insert_division(Division::new(DivisionKind::Poem), None)
            .unwrap();
        let mut stanza = Stanza::new(1);
        stanza.facsimile = Some("page_0005.png".to_string());
        tree.insert_stanza(stanza, poem).unwrap();
        // Dedicated marker appears later in document order but still wins.
        tree.insert_page_break(
            PageBreak::new(5).with_facsimile("page_0005.png"),
            None,
        )
        .unwrap();

        let markers = tree.page_markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].page_number, 5);
        assert_eq!(markers[0].source, MarkerSource::Element);
    }

    #[test]
    fn test_facsimile_attribute_fills_unclaimed_page() {
        let mut tree = DocumentTree::new();
        tree.insert_page_break(PageBreak::new(1), None).unwrap();
        let poem = tree
            .insert_division(Division::new(DivisionKind::Poem), None)
            .unwrap();
        let mut stanza = Stanza::new(1);
        stanza.facsimile = Some("page_0002.png".to_string());
        tree.insert_stanza(stanza, poem).unwrap();

        let markers = tree.page_markers();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[1].page_number, 2);
        assert_eq!(markers[1].source, MarkerSource::Facsimile);
    }

    #[test]
    fn test_default_facsimile_filled_in() {
        let mut tree = DocumentTree::new();
        tree.insert_page_break(PageBreak::new(3), None).unwrap();
        let markers = tree.page_markers();
        assert_eq!(markers[0].facsimile, "page_0003.png");
    }
}
