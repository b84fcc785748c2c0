//! Sync tuning knobs

use serde::{Deserialize, Serialize};

/// Timing and threshold configuration for the sync controller.
///
/// All times are milliseconds on the host-supplied clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Duration of a page-change scroll animation
    pub scroll_duration_ms: f64,
    /// Keep-last debounce window for scroll-driven detection
    pub debounce_ms: f64,
    /// A page must fill at least this fraction of the viewing window to
    /// count as the visible page
    pub min_visible_fraction: f64,
    /// And at least this many pixels of it must be showing
    pub min_visible_px: f64,
    /// How long the initiator marker survives after a transition ends,
    /// absorbing the trailing scroll events the animation itself caused
    pub release_grace_ms: f64,
    /// How long scroll detection stays suppressed after an edit ends,
    /// while view geometry settles
    pub edit_settle_ms: f64,
    /// The transcription pane scrolls to this many pixels above the
    /// page block, keeping the preceding heading visible
    pub text_align_offset_px: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            scroll_duration_ms: 800.0,
            debounce_ms: 300.0,
            min_visible_fraction: 0.6,
            min_visible_px: 48.0,
            release_grace_ms: 50.0,
            edit_settle_ms: 150.0,
            text_align_offset_px: 50.0,
        }
    }
}

impl SyncConfig {
    pub fn with_scroll_duration_ms(mut self, ms: f64) -> Self {
        self.scroll_duration_ms = ms;
        self
    }

    pub fn with_debounce_ms(mut self, ms: f64) -> Self {
        self.debounce_ms = ms;
        self
    }

    pub fn with_min_visible_fraction(mut self, fraction: f64) -> Self {
        self.min_visible_fraction = fraction;
        self
    }

    pub fn with_min_visible_px(mut self, px: f64) -> Self {
        self.min_visible_px = px;
        self
    }

    pub fn with_release_grace_ms(mut self, ms: f64) -> Self {
        self.release_grace_ms = ms;
        self
    }

    pub fn with_edit_settle_ms(mut self, ms: f64) -> Self {
        self.edit_settle_ms = ms;
        self
    }

    pub fn with_text_align_offset_px(mut self, px: f64) -> Self {
        self.text_align_offset_px = px;
        self
    }
}
