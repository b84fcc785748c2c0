//! Gap-free renumbering after structural changes
//!
//! After any merge/split/convert/delete, line numbers within an affected
//! stanza run 1..=N and stanza numbers within an affected division run
//! 1..=M, with no gaps. xml:id values that encode the positional number
//! (`poem_1_stanza_3`, `..._line_2`) are regenerated to match; ids with no
//! embedded number are left untouched.

use manuscript_model::{DocumentTree, NodeId};
use regex_lite::Regex;
use tracing::debug;

/// Regenerate a positional xml:id for a new number, if the id encodes one.
///
/// `marker` is the positional segment (`_stanza_` or `_line_`). When a
/// `container_id` is available the prefix is rebuilt from it, matching how
/// ids are originally minted; otherwise only the trailing number is
/// rewritten.
fn regenerate_positional_id(
    current: &str,
    marker: &str,
    container_id: Option<&str>,
    new_number: u32,
) -> Option<String> {
    if !current.contains(marker) {
        return None;
    }
    if let Some(container) = container_id {
        return Some(format!("{container}{marker}{new_number}"));
    }
    let pattern = format!(r"^(.*{marker})\d+$", marker = regex_escape(marker));
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(current)?;
    Some(format!("{}{}", caps.get(1)?.as_str(), new_number))
}

fn regex_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// Renumber the line children of a stanza 1..=N
pub fn renumber_stanza_lines(tree: &mut DocumentTree, stanza_id: NodeId) {
    let line_ids = tree.stanza_line_ids(stanza_id);
    let stanza_xml_id = tree
        .get_stanza(stanza_id)
        .and_then(|s| s.xml_id.clone());
    for (index, line_id) in line_ids.iter().enumerate() {
        let number = index as u32 + 1;
        if let Some(line) = tree.get_line_mut(*line_id) {
            line.number = number;
            if let Some(current) = line.xml_id.clone() {
                if let Some(new_id) = regenerate_positional_id(
                    &current,
                    "_line_",
                    stanza_xml_id.as_deref(),
                    number,
                ) {
                    line.xml_id = Some(new_id);
                }
            }
        }
    }
    tree.document.bump_revision();
}

/// Renumber the stanza children of a division 1..=M
pub fn renumber_division_stanzas(tree: &mut DocumentTree, division_id: NodeId) {
    let stanza_ids: Vec<NodeId> = tree
        .children_of(division_id)
        .into_iter()
        .filter(|id| tree.get_stanza(*id).is_some())
        .collect();
    let division_xml_id = tree
        .get_division(division_id)
        .and_then(|d| d.xml_id.clone());
    debug!(
        count = stanza_ids.len(),
        division = ?division_xml_id,
        "renumbering stanzas"
    );
    for (index, stanza_id) in stanza_ids.iter().enumerate() {
        let number = index as u32 + 1;
        if let Some(stanza) = tree.get_stanza_mut(*stanza_id) {
            stanza.number = number;
            if let Some(current) = stanza.xml_id.clone() {
                if let Some(new_id) = regenerate_positional_id(
                    &current,
                    "_stanza_",
                    division_xml_id.as_deref(),
                    number,
                ) {
                    stanza.xml_id = Some(new_id);
                }
            }
        }
    }
    tree.document.bump_revision();
}
