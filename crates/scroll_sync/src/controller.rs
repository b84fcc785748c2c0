//! The sync state machine
//!
//! Single-threaded and cooperative: the host calls `on_scroll` and
//! `navigate` from its event handlers and drives `tick` with its frame
//! clock. All timestamps are host-clock milliseconds.

use crate::{ScrollAnimation, SyncConfig};
use page_map::{PageMap, ViewId, ViewSet};
use tracing::debug;

/// A page-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRequest {
    Next,
    Prev,
    Goto(u32),
}

/// Where the controller is in the navigate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Transitioning {
        target_page: u32,
        /// The pane whose user scroll started this transition, if any.
        /// It is never scrolled programmatically during the transition.
        initiator: Option<ViewId>,
    },
}

#[derive(Debug, Clone, Copy)]
struct PendingScroll {
    view: ViewId,
    scroll_top: f64,
    viewport_height: f64,
    due_at: f64,
}

/// Keeps the three panes on the same manuscript page.
///
/// Page changes animate every pane except the one the user scrolled;
/// scroll events are debounced and checked against visibility thresholds
/// before they count as a page change; scrolls caused by the controller's
/// own animations are absorbed by the initiator marker and a short grace
/// window, so a transition can never re-trigger itself.
pub struct SyncController {
    config: SyncConfig,
    state: SyncState,
    current_page: Option<u32>,
    animations: Vec<ScrollAnimation>,
    initiator: Option<ViewId>,
    initiator_clear_at: Option<f64>,
    pending: Option<PendingScroll>,
    editing: bool,
    edit_release_at: Option<f64>,
}

impl SyncController {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            state: SyncState::Idle,
            current_page: None,
            animations: Vec::new(),
            initiator: None,
            initiator_clear_at: None,
            pending: None,
            editing: false,
            edit_release_at: None,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The page all panes last settled on. `None` until the first
    /// transition completes.
    pub fn current_page(&self) -> Option<u32> {
        self.current_page
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, SyncState::Transitioning { .. })
    }

    pub fn is_edit_suppressed(&self) -> bool {
        self.editing
    }

    /// Start a page transition. Returns whether one began: requests that
    /// resolve to no valid page, to the current page, or that arrive
    /// mid-transition are silently dropped.
    pub fn navigate(
        &mut self,
        request: NavRequest,
        initiator: Option<ViewId>,
        map: &PageMap,
        views: &mut ViewSet<'_>,
        now: f64,
    ) -> bool {
        if self.is_transitioning() {
            debug!(?request, "navigation rejected mid-transition");
            return false;
        }
        let Some(target) = self.resolve_target(request, map) else {
            debug!(?request, "navigation request resolved to no page");
            return false;
        };
        if Some(target) == self.current_page {
            return false;
        }

        self.pending = None;
        self.initiator = initiator;
        self.initiator_clear_at = None;
        self.animations.clear();

        for view_id in ViewId::ALL {
            if Some(view_id) == initiator {
                continue;
            }
            let Some(position) = map.position_in(target, view_id) else {
                continue;
            };
            let Some(view) = views.get_mut(view_id) else {
                continue;
            };
            let align = if view_id == ViewId::Text {
                self.config.text_align_offset_px
            } else {
                0.0
            };
            let max_scroll = (view.content_height() - view.viewport_height()).max(0.0);
            let target_top = (position - align).clamp(0.0, max_scroll);
            let animation = ScrollAnimation::new(
                view_id,
                view.scroll_top(),
                target_top,
                now,
                self.config.scroll_duration_ms,
            );
            if animation.is_trivial() {
                view.set_scroll_top(target_top);
            } else {
                self.animations.push(animation);
            }
        }

        debug!(page = target, views = self.animations.len(), "page transition started");
        self.state = SyncState::Transitioning {
            target_page: target,
            initiator,
        };
        if self.animations.is_empty() {
            self.complete(target, now);
        }
        true
    }

    /// Record a user scroll in one pane. Debounced keep-last; ignored
    /// outright mid-transition, from the marked initiator, and while
    /// edits are settling.
    pub fn on_scroll(&mut self, view: ViewId, scroll_top: f64, viewport_height: f64, now: f64) {
        if self.is_transitioning() || self.editing {
            return;
        }
        if self.initiator == Some(view) {
            return;
        }
        self.pending = Some(PendingScroll {
            view,
            scroll_top,
            viewport_height,
            due_at: now + self.config.debounce_ms,
        });
    }

    /// Advance time: move animations, finish transitions, clear expired
    /// markers, and act on a due debounced scroll.
    pub fn tick(&mut self, map: &PageMap, views: &mut ViewSet<'_>, now: f64) {
        if let Some(release_at) = self.edit_release_at {
            if now >= release_at {
                self.editing = false;
                self.edit_release_at = None;
            }
        }
        if let Some(clear_at) = self.initiator_clear_at {
            if now >= clear_at {
                self.initiator = None;
                self.initiator_clear_at = None;
            }
        }

        let mut remaining = Vec::new();
        for animation in self.animations.drain(..) {
            match views.get_mut(animation.view) {
                // A view that unmounted mid-flight stops contributing.
                None => {}
                Some(view) => {
                    view.set_scroll_top(animation.position_at(now));
                    if !animation.is_finished(now) {
                        remaining.push(animation);
                    }
                }
            }
        }
        self.animations = remaining;

        if let SyncState::Transitioning { target_page, .. } = self.state {
            if self.animations.is_empty() {
                self.complete(target_page, now);
            }
        }

        if let Some(pending) = self.pending {
            if now >= pending.due_at {
                self.pending = None;
                self.detect(pending, map, views, now);
            }
        }
    }

    /// Suppress scroll detection for the duration of a structural edit.
    pub fn begin_edit(&mut self) {
        self.editing = true;
        self.edit_release_at = None;
        self.pending = None;
    }

    /// Schedule suppression to lift once view geometry has settled.
    pub fn end_edit(&mut self, now: f64) {
        if self.editing {
            self.edit_release_at = Some(now + self.config.edit_settle_ms);
        }
    }

    fn resolve_target(&self, request: NavRequest, map: &PageMap) -> Option<u32> {
        match request {
            NavRequest::Next => match self.current_page {
                Some(page) => map.next_page(page),
                None => map.min_page(),
            },
            NavRequest::Prev => match self.current_page {
                Some(page) => map.prev_page(page),
                None => map.min_page(),
            },
            NavRequest::Goto(page) => map.contains(page).then_some(page),
        }
    }

    fn complete(&mut self, page: u32, now: f64) {
        debug!(page, "page transition complete");
        self.current_page = Some(page);
        self.state = SyncState::Idle;
        if self.initiator.is_some() {
            self.initiator_clear_at = Some(now + self.config.release_grace_ms);
        }
    }

    fn detect(&mut self, pending: PendingScroll, map: &PageMap, views: &mut ViewSet<'_>, now: f64) {
        if self.is_transitioning() || self.editing || self.initiator == Some(pending.view) {
            return;
        }
        let Some((page, visible_px)) =
            map.most_visible_page(pending.view, pending.scroll_top, pending.viewport_height)
        else {
            return;
        };
        if Some(page) == self.current_page {
            return;
        }

        // A page counts as "the" visible page only when it dominates the
        // viewing window: enough of the window is showing it, and enough
        // absolute pixels of it are on screen.
        let page_height = match pending.view {
            ViewId::Text => map.mapping(page).map(|m| m.heights.text),
            ViewId::Image => map.mapping(page).map(|m| m.heights.image),
            ViewId::Source => None,
        }
        .filter(|&h| h > 0.0);
        let denom = page_height
            .map(|h| h.min(pending.viewport_height))
            .unwrap_or(pending.viewport_height);
        let fraction = if denom > 0.0 { visible_px / denom } else { 0.0 };

        if fraction < self.config.min_visible_fraction || visible_px < self.config.min_visible_px {
            debug!(page, visible_px, fraction, "visible page below thresholds");
            return;
        }

        self.navigate(NavRequest::Goto(page), Some(pending.view), map, views, now);
    }
}

impl Default for SyncController {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}
