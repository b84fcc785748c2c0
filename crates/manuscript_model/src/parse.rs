//! TEI XML loading
//!
//! Builds a [`DocumentTree`] from a TEI-like manuscript encoding. The loader
//! assumes the page/stanza/line structure this editor works on and degrades
//! by skipping unrecognized elements with a warning, never by rejecting the
//! whole document.

use crate::{
    markers, Division, DivisionKind, DocumentTree, HeadingKind, HeadingLike, Line, NodeId,
    PageBreak, Paragraph, Result, Stanza,
};
use tracing::warn;

/// An element the loader did not recognize and skipped
#[derive(Debug, Clone)]
pub struct SkippedElement {
    pub tag: String,
    pub reason: String,
}

/// A parsed manuscript plus the elements the loader skipped
#[derive(Debug)]
pub struct ParsedDocument {
    pub tree: DocumentTree,
    pub skipped: Vec<SkippedElement>,
}

struct ParseContext {
    tree: DocumentTree,
    skipped: Vec<SkippedElement>,
    /// Running page-break count, used when a `<pb>` has neither an `n`
    /// attribute nor a numbered facsimile
    page_break_count: u32,
}

/// Parse a TEI document (or fragment) into a manuscript tree.
///
/// Accepts either a full TEI document, in which case content is read from
/// the `<body>` element, or a bare fragment whose root children are the
/// body content.
pub fn parse_document(xml: &str) -> Result<ParsedDocument> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "body")
        .unwrap_or_else(|| doc.root_element());

    let mut ctx = ParseContext {
        tree: DocumentTree::new(),
        skipped: Vec::new(),
        page_break_count: 0,
    };

    for child in root.children().filter(|c| c.is_element()) {
        convert_element(&mut ctx, child, None);
    }

    Ok(ParsedDocument {
        tree: ctx.tree,
        skipped: ctx.skipped,
    })
}

fn attr<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes().find(|a| a.name() == name).map(|a| a.value())
}

fn xml_id(node: roxmltree::Node<'_, '_>) -> Option<String> {
    attr(node, "id").map(str::to_owned)
}

/// Concatenated, trimmed text of an element's subtree
fn element_text(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter_map(|d| d.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn parse_number(node: roxmltree::Node<'_, '_>) -> Option<u32> {
    attr(node, "n").and_then(|n| n.parse().ok())
}

fn convert_element(ctx: &mut ParseContext, node: roxmltree::Node<'_, '_>, parent: Option<NodeId>) {
    let tag = node.tag_name().name();
    match tag {
        "div" => convert_division(ctx, node, parent),
        "lg" => match attr(node, "type") {
            // Some manuscripts nest poems as <lg type="poem"> instead of
            // <div type="poem">.
            Some("poem") => convert_division(ctx, node, parent),
            _ => convert_stanza(ctx, node, parent),
        },
        "l" => {
            let Some(stanza) = parent else {
                ctx.skipped.push(SkippedElement {
                    tag: tag.to_string(),
                    reason: "line outside a stanza".to_string(),
                });
                return;
            };
            let number = parse_number(node)
                .unwrap_or_else(|| ctx.tree.stanza_line_ids(stanza).len() as u32 + 1);
            let mut line = Line::new(number, element_text(node));
            line.xml_id = xml_id(node);
            line.facsimile = attr(node, "facs").map(str::to_owned);
            let _ = ctx.tree.insert_line(line, stanza);
        }
        "head" => {
            let kind = if attr(node, "type") == Some("sub") {
                HeadingKind::Subtitle
            } else {
                HeadingKind::Heading
            };
            insert_heading(ctx, node, parent, kind);
        }
        "dedication" => insert_heading(ctx, node, parent, HeadingKind::Dedication),
        "epigraph" => insert_heading(ctx, node, parent, HeadingKind::Epigraph),
        "dateline" => insert_heading(ctx, node, parent, HeadingKind::Dateline),
        "p" => {
            let _ = ctx
                .tree
                .insert_paragraph(Paragraph::new(element_text(node)), parent);
        }
        "pb" => {
            ctx.page_break_count += 1;
            let facs = attr(node, "facs").map(str::to_owned);
            let page_number = parse_number(node)
                .or_else(|| {
                    facs.as_deref()
                        .and_then(markers::page_number_from_facsimile)
                })
                .unwrap_or(ctx.page_break_count);
            let mut pb = PageBreak::new(page_number);
            pb.facsimile = facs;
            let _ = ctx.tree.insert_page_break(pb, parent);
        }
        other => {
            warn!(tag = other, "skipping unrecognized TEI element");
            ctx.skipped.push(SkippedElement {
                tag: other.to_string(),
                reason: "unrecognized element".to_string(),
            });
        }
    }
}

fn insert_heading(
    ctx: &mut ParseContext,
    node: roxmltree::Node<'_, '_>,
    parent: Option<NodeId>,
    kind: HeadingKind,
) {
    let mut heading = HeadingLike::new(kind, element_text(node));
    heading.xml_id = xml_id(node);
    heading.facsimile = attr(node, "facs").map(str::to_owned);
    let _ = ctx.tree.insert_heading(heading, parent);
}

fn convert_division(ctx: &mut ParseContext, node: roxmltree::Node<'_, '_>, parent: Option<NodeId>) {
    let kind = match attr(node, "type") {
        Some("poem") => DivisionKind::Poem,
        Some("part") => DivisionKind::Part,
        _ => DivisionKind::Generic,
    };
    let mut division = Division::new(kind);
    division.xml_id = xml_id(node);
    division.facsimile = attr(node, "facs").map(str::to_owned);
    let Ok(div_id) = ctx.tree.insert_division(division, parent) else {
        return;
    };
    for child in node.children().filter(|c| c.is_element()) {
        convert_element(ctx, child, Some(div_id));
    }
}

fn convert_stanza(ctx: &mut ParseContext, node: roxmltree::Node<'_, '_>, parent: Option<NodeId>) {
    let Some(division) = parent else {
        ctx.skipped.push(SkippedElement {
            tag: "lg".to_string(),
            reason: "stanza outside a division".to_string(),
        });
        return;
    };
    let number = parse_number(node).unwrap_or_else(|| {
        ctx.tree
            .children_of(division)
            .iter()
            .filter(|id| ctx.tree.get_stanza(**id).is_some())
            .count() as u32
            + 1
    });
    let mut stanza = Stanza::new(number);
    stanza.xml_id = xml_id(node);
    stanza.facsimile = attr(node, "facs").map(str::to_owned);
    let Ok(stanza_id) = ctx.tree.insert_stanza(stanza, division) else {
        return;
    };
    for child in node.children().filter(|c| c.is_element()) {
        convert_element(ctx, child, Some(stanza_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeType;

    const SAMPLE: &str = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader><fileDesc/></teiHeader>
  <text>
    <body>
      <pb n="1" facs="page_0001.png"/>
      <div type="poem" xml:id="poem_1">
        <head>THE GARDEN</head>
        <head type="sub">A Meditation</head>
        <dedication><p>To the gardeners of Nun Appleton</p></dedication>
        <lg type="stanza" n="1" xml:id="poem_1_stanza_1">
          <l n="1">How vainly men themselves amaze</l>
          <l n="2">To win the palm, the oak, or bays;</l>
        </lg>
        <pb n="2" facs="page_0002.png"/>
        <lg type="stanza" n="2" xml:id="poem_1_stanza_2">
          <l n="1">Meanwhile the mind, from pleasure less,</l>
        </lg>
      </div>
    </body>
  </text>
</TEI>"#;

    #[test]
    fn test_parse_poem_structure() {
        let parsed = parse_document(SAMPLE).unwrap();
        let tree = &parsed.tree;

        let poem = tree.find_by_xml_id("poem_1").unwrap();
        assert_eq!(tree.node_type(poem), Some(NodeType::Division));

        let stanza1 = tree.find_by_xml_id("poem_1_stanza_1").unwrap();
        let lines = tree.stanza_line_ids(stanza1);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            tree.node_text(lines[0]),
            "How vainly men themselves amaze"
        );
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_parse_collects_page_markers() {
        let parsed = parse_document(SAMPLE).unwrap();
        let markers = parsed.tree.page_markers();
        let pages: Vec<u32> = markers.iter().map(|m| m.page_number).collect();
        assert_eq!(pages, vec![1, 2]);
        assert_eq!(markers[0].facsimile, "page_0001.png");
    }

    #[test]
    fn test_parse_heading_kinds() {
        let parsed = parse_document(SAMPLE).unwrap();
        let tree = &parsed.tree;
        let poem = tree.find_by_xml_id("poem_1").unwrap();
        let kinds: Vec<HeadingKind> = tree
            .children_of(poem)
            .into_iter()
            .filter_map(|id| tree.get_heading(id).map(|h| h.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                HeadingKind::Heading,
                HeadingKind::Subtitle,
                HeadingKind::Dedication
            ]
        );
    }

    #[test]
    fn test_unknown_elements_are_skipped_not_fatal() {
        let xml = r#"<body>
  <div type="poem">
    <figure><graphic url="x.png"/></figure>
    <lg type="stanza"><l>A surviving line</l></lg>
  </div>
</body>"#;
        let parsed = parse_document(xml).unwrap();
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].tag, "figure");
        assert_eq!(parsed.tree.all_stanzas().len(), 1);
    }

    #[test]
    fn test_pb_without_n_uses_facsimile_then_ordinal() {
        let xml = r#"<body>
  <pb facs="page_0009.png"/>
  <pb/>
</body>"#;
        let parsed = parse_document(xml).unwrap();
        let pages: Vec<u32> = parsed
            .tree
            .page_markers()
            .iter()
            .map(|m| m.page_number)
            .collect();
        assert_eq!(pages, vec![2, 9]);
    }
}
