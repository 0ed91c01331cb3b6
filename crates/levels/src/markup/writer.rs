//! Markup writer
//!
//! Elements holding only child elements are indented four spaces per level.
//! Elements holding any text are written inline so their text is stored
//! exactly as given.

use super::{Document, Element, Node};

/// Escape the five standard markup entities
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize a document
pub fn write_document(document: &Document) -> String {
    let mut out = String::new();
    for node in &document.nodes {
        write_node(&mut out, node, 0, true);
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize, pretty: bool) {
    if pretty {
        indent(out, depth);
    }

    match node {
        Node::Declaration(content) => {
            out.push_str("<?");
            out.push_str(content);
            out.push_str("?>");
        }
        Node::Comment(content) => {
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => write_element(out, element, depth, pretty),
    }

    if pretty {
        out.push('\n');
    }
}

fn write_element(out: &mut String, element: &Element, depth: usize, pretty: bool) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    let has_text = element.children.iter().any(|n| matches!(n, Node::Text(_)));
    if pretty && !has_text {
        out.push('\n');
        for child in &element.children {
            write_node(out, child, depth + 1, true);
        }
        indent(out, depth);
    } else {
        for child in &element.children {
            write_node(out, child, depth + 1, false);
        }
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}
