//! Line-oriented TEI serialization
//!
//! The source-view pane displays this text and the page map builder locates
//! each `<pb n="..."` marker by line index, so the writer keeps one logical
//! element per line and a stable indentation scheme. The TEI header is not
//! emitted; the source view starts at the first body element.

use crate::{DocumentTree, DivisionKind, HeadingKind, NodeId, NodeType};

const INDENT: &str = "  ";

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

/// Serialize the manuscript body to TEI XML
pub fn to_xml(tree: &DocumentTree) -> String {
    let mut out = String::new();
    out.push_str("<text>\n");
    out.push_str(INDENT);
    out.push_str("<body>\n");
    for &child in tree.document.body_children() {
        write_node(tree, child, 2, &mut out);
    }
    out.push_str(INDENT);
    out.push_str("</body>\n");
    out.push_str("</text>\n");
    out
}

fn push_line(out: &mut String, depth: usize, content: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(content);
    out.push('\n');
}

fn id_attr(xml_id: &Option<String>) -> String {
    match xml_id {
        Some(id) => format!(" xml:id=\"{}\"", escape_attr(id)),
        None => String::new(),
    }
}

fn facs_attr(facsimile: &Option<String>) -> String {
    match facsimile {
        Some(f) => format!(" facs=\"{}\"", escape_attr(f)),
        None => String::new(),
    }
}

fn write_node(tree: &DocumentTree, id: NodeId, depth: usize, out: &mut String) {
    match tree.node_type(id) {
        Some(NodeType::PageBreak) => {
            if let Some(pb) = tree.get_page_break(id) {
                push_line(
                    out,
                    depth,
                    &format!(
                        "<pb n=\"{}\"{}/>",
                        pb.page_number,
                        facs_attr(&pb.facsimile)
                    ),
                );
            }
        }
        Some(NodeType::Division) => {
            if let Some(div) = tree.get_division(id) {
                let kind = match div.kind {
                    DivisionKind::Poem => "poem",
                    DivisionKind::Part => "part",
                    DivisionKind::Generic => "text",
                };
                push_line(
                    out,
                    depth,
                    &format!(
                        "<div type=\"{kind}\"{}{}>",
                        id_attr(&div.xml_id),
                        facs_attr(&div.facsimile)
                    ),
                );
                for &child in &div.children {
                    write_node(tree, child, depth + 1, out);
                }
                push_line(out, depth, "</div>");
            }
        }
        Some(NodeType::Stanza) => {
            if let Some(stanza) = tree.get_stanza(id) {
                push_line(
                    out,
                    depth,
                    &format!(
                        "<lg type=\"stanza\" n=\"{}\"{}{}>",
                        stanza.number,
                        id_attr(&stanza.xml_id),
                        facs_attr(&stanza.facsimile)
                    ),
                );
                for &child in &stanza.children {
                    write_node(tree, child, depth + 1, out);
                }
                push_line(out, depth, "</lg>");
            }
        }
        Some(NodeType::Line) => {
            if let Some(line) = tree.get_line(id) {
                push_line(
                    out,
                    depth,
                    &format!(
                        "<l n=\"{}\"{}>{}</l>",
                        line.number,
                        id_attr(&line.xml_id),
                        escape_text(&line.text)
                    ),
                );
            }
        }
        Some(NodeType::Heading) => {
            if let Some(heading) = tree.get_heading(id) {
                let text = escape_text(&heading.text);
                let rendered = match heading.kind {
                    HeadingKind::Heading => {
                        format!("<head{}>{text}</head>", id_attr(&heading.xml_id))
                    }
                    HeadingKind::Subtitle => format!(
                        "<head type=\"sub\"{}>{text}</head>",
                        id_attr(&heading.xml_id)
                    ),
                    HeadingKind::Dedication => {
                        format!("<dedication{}><p>{text}</p></dedication>", id_attr(&heading.xml_id))
                    }
                    HeadingKind::Epigraph => {
                        format!("<epigraph{}><p>{text}</p></epigraph>", id_attr(&heading.xml_id))
                    }
                    HeadingKind::Dateline => {
                        format!("<dateline{}>{text}</dateline>", id_attr(&heading.xml_id))
                    }
                };
                push_line(out, depth, &rendered);
            }
        }
        Some(NodeType::Paragraph) => {
            if let Some(p) = tree.get_paragraph(id) {
                push_line(out, depth, &format!("<p>{}</p>", escape_text(&p.text)));
            }
        }
        None => {}
    }
}

/// Zero-based line index of the `<pb n="page"` marker in serialized text.
///
/// Works against any backing text in the serialized format, including a
/// virtualized editor's full buffer.
pub fn page_break_line_index(text: &str, page_number: u32) -> Option<usize> {
    let needle = format!("<pb n=\"{page_number}\"");
    text.lines().position(|line| line.contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_document;

    const SAMPLE: &str = r#"<body>
  <pb n="1" facs="page_0001.png"/>
  <div type="poem" xml:id="poem_1">
    <head>THE GARDEN</head>
    <dedication><p>To Mary Fairfax</p></dedication>
    <lg type="stanza" n="1" xml:id="poem_1_stanza_1">
      <l n="1">How vainly men &amp; women amaze</l>
    </lg>
    <pb n="2"/>
  </div>
</body>"#;

    #[test]
    fn test_one_element_per_line() {
        let parsed = parse_document(SAMPLE).unwrap();
        let xml = to_xml(&parsed.tree);
        for needle in ["<pb n=\"1\"", "<pb n=\"2\"", "<head>", "<dedication>"] {
            let matching: Vec<&str> = xml.lines().filter(|l| l.contains(needle)).collect();
            assert_eq!(matching.len(), 1, "expected exactly one line with {needle}");
        }
    }

    #[test]
    fn test_page_break_line_index() {
        let parsed = parse_document(SAMPLE).unwrap();
        let xml = to_xml(&parsed.tree);
        let idx1 = page_break_line_index(&xml, 1).unwrap();
        let idx2 = page_break_line_index(&xml, 2).unwrap();
        assert!(idx1 < idx2);
        assert_eq!(page_break_line_index(&xml, 9), None);
    }

    #[test]
    fn test_round_trip_preserves_content() {
        let parsed = parse_document(SAMPLE).unwrap();
        let xml = to_xml(&parsed.tree);
        let reparsed = parse_document(&xml).unwrap();

        let stanza_a = parsed.tree.find_by_xml_id("poem_1_stanza_1").unwrap();
        let stanza_b = reparsed.tree.find_by_xml_id("poem_1_stanza_1").unwrap();
        assert_eq!(
            parsed.tree.node_text(stanza_a),
            reparsed.tree.node_text(stanza_b)
        );
        assert_eq!(
            parsed.tree.page_markers().len(),
            reparsed.tree.page_markers().len()
        );
    }

    #[test]
    fn test_escaping() {
        let parsed = parse_document(SAMPLE).unwrap();
        let xml = to_xml(&parsed.tree);
        assert!(xml.contains("How vainly men &amp; women amaze"));
    }
}
