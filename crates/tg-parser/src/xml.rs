use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use roxmltree::{Document, Node};
use tg_core::{ConfigError, SourceLocation, SourceSpan};

static NEXT_DOCUMENT: AtomicUsize = AtomicUsize::new(0);

/// Identity of an element. Every parsed document gets its own number and
/// elements are numbered in pre-order inside it, so ids never collide
/// across documents sharing a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId {
    pub document: usize,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElementNode,
}

/// Immutable document element. Text, comments and processing instructions
/// are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElementNode {
    pub id: ElementId,
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub attribute_lines: BTreeMap<String, usize>,
    pub children: Vec<XmlElementNode>,
    pub location: SourceSpan,
}

impl XmlElementNode {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Line of the attribute, or of the element when it has no such attribute.
    pub fn attribute_line(&self, name: &str) -> usize {
        self.attribute_lines
            .get(name)
            .copied()
            .unwrap_or_else(|| self.line())
    }

    pub fn line(&self) -> usize {
        self.location.line()
    }

    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElementNode> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

pub fn parse_xml_document(source: &str) -> Result<XmlDocument, ConfigError> {
    let document = Document::parse(source)
        .map_err(|error| ConfigError::new("XML_PARSE_ERROR", error.to_string()))?;

    let Some(root) = document.root().children().find(|node| node.is_element()) else {
        return Err(ConfigError::new(
            "XML_PARSE_ERROR",
            "XML document must contain a root element.",
        ));
    };

    let mut ids = IdAllocator {
        document: NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed),
        next: 0,
    };
    Ok(XmlDocument {
        root: parse_element(&document, root, &mut ids),
    })
}

struct IdAllocator {
    document: usize,
    next: usize,
}

impl IdAllocator {
    fn allocate(&mut self) -> ElementId {
        let id = ElementId {
            document: self.document,
            index: self.next,
        };
        self.next += 1;
        id
    }
}

fn parse_element(
    document: &Document<'_>,
    node: Node<'_, '_>,
    ids: &mut IdAllocator,
) -> XmlElementNode {
    let id = ids.allocate();

    let mut attributes = BTreeMap::new();
    let mut attribute_lines = BTreeMap::new();
    for attribute in node.attributes() {
        let name = attribute.name().to_string();
        let line = document.text_pos_at(attribute.position()).row as usize;
        attribute_lines.insert(name.clone(), line);
        attributes.insert(name, attribute.value().to_string());
    }

    let children = node
        .children()
        .filter(|child| child.is_element())
        .map(|child| parse_element(document, child, ids))
        .collect();

    XmlElementNode {
        id,
        name: node.tag_name().name().to_string(),
        attributes,
        attribute_lines,
        children,
        location: node_span(document, node.range().start, node.range().end),
    }
}

fn node_span(document: &Document<'_>, start: usize, end: usize) -> SourceSpan {
    let start_pos = document.text_pos_at(start);
    let end_pos = document.text_pos_at(end);
    SourceSpan {
        start: SourceLocation {
            line: start_pos.row as usize,
            column: start_pos.col as usize,
        },
        end: SourceLocation {
            line: end_pos.row as usize,
            column: end_pos.col as usize,
        },
    }
}
