//! Per-page position records

use serde::{Deserialize, Serialize};

/// Scroll offset of one page in each pane, in that pane's content
/// coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanePositions {
    pub text: f64,
    pub image: f64,
    pub source: f64,
}

/// Measured vertical extent of one page in the panes that realize pages
/// as blocks. The source pane's extent is derived from neighboring page
/// positions instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaneHeights {
    pub text: f64,
    pub image: f64,
}

/// Whether each block pane actually realized content for the page.
/// A page can be attested by a marker yet have no rendered block in a
/// pane; its offsets then stay at zero and the pane is skipped during
/// navigation and detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneContent {
    pub text: bool,
    pub image: bool,
}

/// Everything the sync layer knows about one manuscript page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMapping {
    pub page_number: u32,
    pub positions: PanePositions,
    pub heights: PaneHeights,
    pub has_content: PaneContent,
    /// Facsimile image reference for the page
    pub facsimile: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_serde_round_trip() {
        let mapping = PageMapping {
            page_number: 3,
            positions: PanePositions {
                text: 120.0,
                image: 940.5,
                source: 67.2,
            },
            heights: PaneHeights {
                text: 410.0,
                image: 880.0,
            },
            has_content: PaneContent {
                text: true,
                image: true,
            },
            facsimile: "page_0003.png".to_string(),
        };

        let json = serde_json::to_string(&mapping).unwrap();
        let back: PageMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mapping);
    }
}
