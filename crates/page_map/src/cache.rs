//! Revision-keyed map caching

use crate::{PageMap, PageMapBuilder, ViewSet};
use manuscript_model::DocumentTree;
use tracing::debug;

/// Caches the built map, keyed solely by the document revision.
///
/// Geometry changes that do not touch the document (window resizes, image
/// loads) leave the revision alone, so callers force a rebuild for those
/// through `rebuild`.
#[derive(Debug, Default)]
pub struct PageMapCache {
    cached: Option<PageMap>,
}

impl PageMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached map when it matches the tree's current revision, else a
    /// fresh build.
    pub fn get_or_build(&mut self, tree: &DocumentTree, views: &ViewSet<'_>) -> &PageMap {
        let stale = self
            .cached
            .as_ref()
            .map_or(true, |map| map.revision() != tree.revision());
        if stale {
            debug!(revision = tree.revision(), "rebuilding page map");
            self.cached = Some(PageMapBuilder::build(tree, views));
        }
        self.cached.as_ref().expect("map was just built")
    }

    /// Rebuild unconditionally, for geometry-only changes.
    pub fn rebuild(&mut self, tree: &DocumentTree, views: &ViewSet<'_>) -> &PageMap {
        self.cached = Some(PageMapBuilder::build(tree, views));
        self.cached.as_ref().expect("map was just built")
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn current(&self) -> Option<&PageMap> {
        self.cached.as_ref()
    }
}
