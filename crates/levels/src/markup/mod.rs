//! Markup document tree
//!
//! Level files are XML-shaped. This module provides the small element tree
//! the loader walks and the saver builds, a `nom` parser and a writer.
//!
//! Text bodies and attribute values are kept in their escaped on-disk form.
//! [`Element::set_text`] and [`Element::set_attr`] escape on the way in;
//! callers decode what they read with [`crate::entities::decode`].

use crate::entities;

pub mod parser;
pub mod writer;

pub use parser::parse_document;
pub use writer::{escape, write_document};

/// A node inside an element or at document level
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `<?xml ...?>` style processing instruction, content without delimiters
    Declaration(String),
    /// `<!-- ... -->`, content without delimiters
    Comment(String),
    /// Escaped text
    Text(String),
    /// Nested element
    Element(Element),
}

impl Node {
    fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    fn is_element_named(&self, name: &str) -> bool {
        matches!(self, Node::Element(element) if element.name == name)
    }
}

/// A named element with attributes and ordered children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Tag name
    pub name: String,

    /// Attributes in document order, values escaped
    pub attributes: Vec<(String, String)>,

    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Raw (escaped) attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute decoded and parsed as an integer
    ///
    /// Returns `None` when the attribute is missing, does not decode or is not
    /// an integer, so the caller keeps its default.
    pub fn attr_int(&self, name: &str) -> Option<i32> {
        entities::decode(self.attr(name)?)?.trim().parse().ok()
    }

    /// Set or replace an attribute
    pub fn set_attr<V: ToString>(&mut self, name: &str, value: V) {
        let escaped = escape(&value.to_string());
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = escaped,
            None => self.attributes.push((name.to_string(), escaped)),
        }
    }

    /// Raw text body: the first child, if it is text
    pub fn raw_text(&self) -> Option<&str> {
        match self.children.first() {
            Some(Node::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Replace all children with a single text node
    pub fn set_text<V: ToString>(&mut self, value: V) {
        self.children.clear();
        self.children.push(Node::Text(escape(&value.to_string())));
    }

    /// Append a child element
    pub fn push(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// Child elements in order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    /// First child element with the given name, mutably
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|element| element.name == name)
    }

    /// First child element with the given name, created if missing
    ///
    /// Existing content is kept, which is how a save preserves the shell of
    /// a previously loaded document.
    pub fn update_element(&mut self, name: &str) -> &mut Element {
        let index = match self.children.iter().position(|n| n.is_element_named(name)) {
            Some(index) => index,
            None => {
                self.push(Element::new(name));
                self.children.len() - 1
            }
        };

        let Node::Element(element) = &mut self.children[index] else {
            unreachable!("index points at an element");
        };
        element
    }

    /// Like [`Element::update_element`] but with all children removed
    pub fn update_element_cleared(&mut self, name: &str) -> &mut Element {
        let element = self.update_element(name);
        element.children.clear();
        element
    }

    /// Find-or-create a child element and set its text
    pub fn update_tag<V: ToString>(&mut self, name: &str, value: V) {
        self.update_element(name).set_text(value);
    }

    /// Remove every child element with the given name
    pub fn remove_elements(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|node| !node.is_element_named(name));
        before - self.children.len()
    }

    /// Make sure the first child is a comment with the given content
    pub fn update_comment(&mut self, comment: &str) {
        match self.children.first_mut() {
            Some(Node::Comment(existing)) => *existing = comment.to_string(),
            _ => self.children.insert(0, Node::Comment(comment.to_string())),
        }
    }
}

/// A parsed or freshly built markup document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Top-level nodes: declaration, comments and the root element
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first top-level element
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    /// Make sure the document starts with an XML declaration
    pub fn update_declaration(&mut self, declaration: &str) {
        match self.nodes.first_mut() {
            Some(Node::Declaration(existing)) => *existing = declaration.to_string(),
            _ => self.nodes.insert(0, Node::Declaration(declaration.to_string())),
        }
    }

    /// The root element with the given name, created if missing
    pub fn update_root(&mut self, name: &str) -> &mut Element {
        let index = match self.nodes.iter().position(|n| n.is_element_named(name)) {
            Some(index) => index,
            None => {
                self.nodes.push(Node::Element(Element::new(name)));
                self.nodes.len() - 1
            }
        };

        let Node::Element(element) = &mut self.nodes[index] else {
            unreachable!("index points at an element");
        };
        element
    }
}
