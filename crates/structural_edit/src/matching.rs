//! Content-based node matching
//!
//! The presentation layer re-derives ephemeral element ids on every render,
//! and platform selection ranges address text nodes rather than semantic
//! element boundaries. Content matching is therefore the canonical fallback
//! for "which node does this selection mean"; id lookup is only a fast path.
//! The overlap heuristic is a tunable policy, not an implementation
//! accident.

use serde::{Deserialize, Serialize};

/// Tunable policy for deciding whether an element's text and a selection's
/// text refer to the same node
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// Minimum length (in characters, after whitespace normalization) the
    /// shorter of the two texts must have for a containment match to count.
    /// Guards against trivial matches on very short selections.
    pub min_overlap_chars: usize,
    /// How many leading characters of an element's text a selection must
    /// contain for the loose prefix match used when a selection covers only
    /// the start of a long line.
    pub prefix_chars: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            min_overlap_chars: 10,
            prefix_chars: 20,
        }
    }
}

/// Collapse whitespace runs, trim, and case-fold
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

impl MatchPolicy {
    /// Whitespace-normalized containment with a minimum-length floor on the
    /// shorter text
    pub fn overlaps(&self, a: &str, b: &str) -> bool {
        let norm_a = normalize(a);
        let norm_b = normalize(b);
        if norm_a.is_empty() || norm_b.is_empty() {
            return false;
        }
        let (shorter, longer) = if norm_a.chars().count() < norm_b.chars().count() {
            (&norm_a, &norm_b)
        } else {
            (&norm_b, &norm_a)
        };
        longer.contains(shorter.as_str()) && shorter.chars().count() > self.min_overlap_chars
    }

    /// Match used when resolving a selection to a line-like element: the
    /// element contains the selection, or the selection contains the
    /// element's leading prefix
    pub fn matches_selection(&self, element_text: &str, selected_text: &str) -> bool {
        let element = element_text.trim();
        let selected = selected_text.trim();
        if element.is_empty() || selected.is_empty() {
            return false;
        }
        element.contains(selected)
            || selected.contains(char_prefix(element, self.prefix_chars))
            || self.overlaps(element, selected)
    }

    /// Match used by deletion: exact containment in either direction, then
    /// the normalized overlap rule
    pub fn matches_for_delete(&self, element_text: &str, selected_text: &str) -> bool {
        let element = element_text.trim();
        let selected = selected_text.trim();
        if element.is_empty() || selected.is_empty() {
            return false;
        }
        element.contains(selected)
            || selected.contains(element)
            || self.overlaps(element, selected)
    }
}
