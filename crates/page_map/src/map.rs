//! The assembled page map

use crate::{PageMapping, ViewId};
use serde::{Deserialize, Serialize};

/// All per-page mappings for one document revision, sorted ascending by
/// page number. Page numbers may have gaps; `total_pages` is the highest
/// attested page, not the mapping count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMap {
    mappings: Vec<PageMapping>,
    total_pages: u32,
    revision: u64,
}

impl PageMap {
    pub fn new(mut mappings: Vec<PageMapping>, revision: u64) -> Self {
        mappings.sort_by_key(|m| m.page_number);
        let total_pages = mappings.last().map(|m| m.page_number).unwrap_or(0);
        Self {
            mappings,
            total_pages,
            revision,
        }
    }

    /// The document revision this map was built from.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn mapping(&self, page_number: u32) -> Option<&PageMapping> {
        self.mappings
            .binary_search_by_key(&page_number, |m| m.page_number)
            .ok()
            .map(|i| &self.mappings[i])
    }

    pub fn contains(&self, page_number: u32) -> bool {
        self.mapping(page_number).is_some()
    }

    pub fn min_page(&self) -> Option<u32> {
        self.mappings.first().map(|m| m.page_number)
    }

    pub fn max_page(&self) -> Option<u32> {
        self.mappings.last().map(|m| m.page_number)
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageMapping> {
        self.mappings.iter()
    }

    /// The next attested page after `page_number`, skipping gaps.
    pub fn next_page(&self, page_number: u32) -> Option<u32> {
        self.mappings
            .iter()
            .map(|m| m.page_number)
            .find(|&p| p > page_number)
    }

    /// The nearest attested page before `page_number`, skipping gaps.
    pub fn prev_page(&self, page_number: u32) -> Option<u32> {
        self.mappings
            .iter()
            .rev()
            .map(|m| m.page_number)
            .find(|&p| p < page_number)
    }

    /// Scroll offset of a page in one pane, honoring the pane's
    /// has-content flag.
    pub fn position_in(&self, page_number: u32, view: ViewId) -> Option<f64> {
        let mapping = self.mapping(page_number)?;
        match view {
            ViewId::Text if mapping.has_content.text => Some(mapping.positions.text),
            ViewId::Image if mapping.has_content.image => Some(mapping.positions.image),
            ViewId::Source => Some(mapping.positions.source),
            _ => None,
        }
    }

    /// Vertical extent of a page in one pane. The source pane has no
    /// measured block heights, so its extent runs to the next page's
    /// offset (unbounded for the last page).
    fn extent_in(&self, index: usize, view: ViewId) -> Option<(f64, f64)> {
        let mapping = &self.mappings[index];
        match view {
            ViewId::Text => mapping
                .has_content
                .text
                .then(|| (mapping.positions.text, mapping.heights.text)),
            ViewId::Image => mapping
                .has_content
                .image
                .then(|| (mapping.positions.image, mapping.heights.image)),
            ViewId::Source => {
                let top = mapping.positions.source;
                let height = self
                    .mappings
                    .get(index + 1)
                    .map(|next| (next.positions.source - top).max(0.0))
                    .unwrap_or(f64::MAX);
                Some((top, height))
            }
        }
    }

    /// The page with the greatest visible extent in the given pane's
    /// viewport, together with the visible height in pixels. Ties go to
    /// the lower page number.
    pub fn most_visible_page(
        &self,
        view: ViewId,
        scroll_top: f64,
        viewport_height: f64,
    ) -> Option<(u32, f64)> {
        let viewport_bottom = scroll_top + viewport_height;
        let mut best: Option<(u32, f64)> = None;

        for index in 0..self.mappings.len() {
            let Some((top, height)) = self.extent_in(index, view) else {
                continue;
            };
            let bottom = if height == f64::MAX { f64::MAX } else { top + height };
            let visible = bottom.min(viewport_bottom) - top.max(scroll_top);
            if visible <= 0.0 {
                continue;
            }
            let page = self.mappings[index].page_number;
            if best.map_or(true, |(_, best_px)| visible > best_px) {
                best = Some((page, visible));
            }
        }

        best
    }
}
