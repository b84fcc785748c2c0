//! View adapters
//!
//! The three panes (facsimile image strip, rendered transcription, raw
//! source) live outside this crate. Each one is presented to the map
//! builder and the sync controller through `ViewAdapter`, which exposes
//! just the geometry and text the core needs. An unmounted view simply
//! reports `is_mounted() == false` and contributes nothing.

use serde::{Deserialize, Serialize};

/// Identifies one of the three synchronized panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewId {
    Image,
    Text,
    Source,
}

impl ViewId {
    pub const ALL: [ViewId; 3] = [ViewId::Image, ViewId::Text, ViewId::Source];
}

/// A realized page-tagged block inside a view, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageAnchor {
    pub page_number: u32,
    /// Distance from the top of the view's scrollable content
    pub offset_top: f64,
    pub height: f64,
}

/// Geometry and text access for a single pane.
///
/// Image and text views supply `page_anchors`; the source view supplies
/// the raw text and its measured line height instead. The defaults let an
/// adapter implement only the half that applies to it.
pub trait ViewAdapter {
    fn id(&self) -> ViewId;

    fn is_mounted(&self) -> bool {
        true
    }

    fn scroll_top(&self) -> f64;

    fn set_scroll_top(&mut self, top: f64);

    fn viewport_height(&self) -> f64;

    fn content_height(&self) -> f64;

    fn page_anchors(&self) -> Vec<PageAnchor> {
        Vec::new()
    }

    /// The complete source text, when the view can supply it.
    fn full_text(&self) -> Option<String> {
        None
    }

    /// Only the currently rendered portion of the source text.
    fn visible_text(&self) -> Option<String> {
        None
    }

    fn measured_line_height(&self) -> Option<f64> {
        None
    }
}

/// The set of panes currently wired to the core, one slot per `ViewId`.
#[derive(Default)]
pub struct ViewSet<'a> {
    pub image: Option<&'a mut dyn ViewAdapter>,
    pub text: Option<&'a mut dyn ViewAdapter>,
    pub source: Option<&'a mut dyn ViewAdapter>,
}

impl<'a> ViewSet<'a> {
    /// A mounted view for the given pane, if one is wired and mounted.
    pub fn get(&self, id: ViewId) -> Option<&dyn ViewAdapter> {
        let slot = match id {
            ViewId::Image => self.image.as_deref(),
            ViewId::Text => self.text.as_deref(),
            ViewId::Source => self.source.as_deref(),
        };
        slot.filter(|view| view.is_mounted())
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut (dyn ViewAdapter + 'a)> {
        let slot = match id {
            ViewId::Image => self.image.as_deref_mut(),
            ViewId::Text => self.text.as_deref_mut(),
            ViewId::Source => self.source.as_deref_mut(),
        };
        slot.filter(|view| view.is_mounted())
    }
}
