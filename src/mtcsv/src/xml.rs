//! Lowercase-normalized XML element tree.
//!
//! The archive's metadata files mix tag casing and namespace prefixes freely
//! (`NITF:FirstCreated`, `nitf:firstcreated`, `firstCreated`), so every
//! element and attribute name is normalized at parse time: lowercased, with
//! any namespace prefix stripped. Lookups go through typed accessors that
//! return `Option`s instead of panicking on absent nodes.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ExtractError;

/// One parsed element: normalized name, normalized attributes, child nodes.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    fn new(name: String) -> Self {
        Element {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Normalized element name (lowercase, no namespace prefix).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First descendant with the given name, depth-first document order.
    pub fn find(&self, name: &str) -> Option<&Element> {
        let name = name.to_ascii_lowercase();
        self.find_normalized(&name)
    }

    fn find_normalized(&self, name: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find_normalized(name) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants with the given name, depth-first document order.
    pub fn find_all(&self, name: &str) -> Vec<&Element> {
        let name = name.to_ascii_lowercase();
        let mut found = Vec::new();
        self.collect_named(&name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.name == name {
                found.push(child);
            }
            child.collect_named(name, found);
        }
    }

    /// Attribute value by normalized name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of this element and all its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => el.collect_text(out),
            }
        }
    }

    fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }
}

/// Parse a whole document into an element tree.
///
/// Returns a synthetic root (empty name) whose children are the document's
/// top-level elements; all lookups run against its descendants. Malformed
/// markup is a hard error.
pub fn parse(data: &[u8]) -> Result<Element, ExtractError> {
    let mut reader = Reader::from_reader(data);

    let mut root = Element::new(String::new());
    let mut stack: Vec<Element> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(ExtractError::from)? {
            Event::Start(e) => {
                stack.push(element_from_start(&e)?);
            }
            Event::Empty(e) => {
                let el = element_from_start(&e)?;
                attach(&mut root, &mut stack, Node::Element(el));
            }
            Event::End(_) => {
                // Mismatched end tags are already rejected by the reader.
                if let Some(el) = stack.pop() {
                    attach(&mut root, &mut stack, Node::Element(el));
                }
            }
            Event::Text(e) => {
                let text = e.decode().map_err(quick_xml::Error::from)?.into_owned();
                // Indentation between elements is noise; spacing inside
                // mixed content is kept verbatim.
                if !text.trim().is_empty() {
                    attach(&mut root, &mut stack, Node::Text(text));
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                if !text.is_empty() {
                    attach(&mut root, &mut stack, Node::Text(text));
                }
            }
            Event::GeneralRef(e) => {
                let name = String::from_utf8_lossy(&e).into_owned();
                let resolved = resolve_entity(&name)
                    .ok_or(ExtractError::UndefinedEntity(name))?;
                attach(&mut root, &mut stack, Node::Text(resolved));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(root)
}

fn element_from_start(e: &BytesStart) -> Result<Element, ExtractError> {
    let mut el = Element::new(normalize_name(e.local_name().as_ref()));
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = normalize_name(attr.key.local_name().as_ref());
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}

fn attach(root: &mut Element, stack: &mut [Element], node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.children.push(node),
    }
}

fn normalize_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

/// Resolve the predefined XML entities and numeric character references.
fn resolve_entity(name: &str) -> Option<String> {
    let resolved = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "apos" => '\'',
        "quot" => '"',
        _ => {
            let num = name.strip_prefix('#')?;
            let code = if let Some(hex) = num.strip_prefix(['x', 'X']) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                num.parse().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some(resolved.to_string())
}
