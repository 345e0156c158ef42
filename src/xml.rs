// Skin document element trees
//
//  This file is part of Wasabi.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Element trees of skin descriptor documents.
//!
//! Skin documents are small,
//!   and the interpreter needs to ask questions of an element
//!     (does it have children? what are its attributes?)
//!   before deciding what to do with it,
//!     so documents are read into a simple owned tree rather than being
//!     processed as a stream of events.
//! See [`reader`] for how documents are parsed.
//!
//! Every document is read as a _fragment_:
//!   a sequence of top-level siblings beneath a synthetic root
//!   [`Element`].
//! Included documents in particular routinely contain many top-level
//!   elements with no single root,
//!     which a conventional XML parser would reject.
//! The synthetic root is never dispatched;
//!   only its children are.

pub mod reader;

pub use reader::{parse_fragment, XmlError};

use crate::span::Span;

/// Name given to the synthetic root of a fragment.
///
/// This is not a valid XML name,
///   so it cannot collide with any element of a parsed document.
pub const FRAGMENT_NAME: &str = "#fragment";

/// A node within an element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),

    /// Character data,
    ///   unescaped,
    ///   including whitespace-only runs between elements.
    Text(String, Span),
}

impl Node {
    /// Whether this node constitutes meaningful content for an element.
    ///
    /// Whitespace between elements is formatting,
    ///   not content.
    pub fn is_content(&self) -> bool {
        match self {
            Self::Element(_) => true,
            Self::Text(text, _) => !text.trim().is_empty(),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Self::Element(ele) => ele.span(),
            Self::Text(_, span) => span,
        }
    }
}

/// An attribute of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    name: String,
    value: String,
    span: Span,
}

impl Attr {
    pub fn new<N: Into<String>, V: Into<String>>(
        name: N,
        value: V,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Span of the attribute name.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

/// An element and its descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Vec<Attr>,
    children: Vec<Node>,

    /// Span of the opening tag
    ///   (or the entire tag if self-closing).
    span: Span,
}

impl Element {
    pub fn new<N: Into<String>>(name: N, span: Span) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            span,
        }
    }

    /// Synthetic root holding the top-level nodes of a document.
    pub fn fragment(children: Vec<Node>, span: Span) -> Self {
        Self {
            children,
            ..Self::new(FRAGMENT_NAME, span)
        }
    }

    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.push_child(child);
        self
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Element name exactly as it appeared in the document,
    ///   including any namespace prefix
    ///     (e.g. `wasabi:titlebar`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_fragment(&self) -> bool {
        self.name == FRAGMENT_NAME
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Attributes in document order.
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Value of the attribute `name`,
    ///   compared case-insensitively.
    ///
    /// If an attribute appears more than once,
    ///   the last occurrence wins.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.find_attr(name).map(Attr::value)
    }

    pub fn find_attr(&self, name: &str) -> Option<&Attr> {
        self.attrs
            .iter()
            .rev()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements,
    ///   skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(ele) => Some(ele),
            Node::Text(..) => None,
        })
    }

    /// The first child node that constitutes content
    ///   (see [`Node::is_content`]),
    ///     if any.
    pub fn first_content(&self) -> Option<&Node> {
        self.children.iter().find(|node| node.is_content())
    }

    /// Concatenated text of all direct text children,
    ///   trimmed.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text, _) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect::<String>()
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::span::Context;

    fn span() -> Span {
        Context::from("t.xml").span(0, 0)
    }

    #[test]
    fn attr_lookup_is_case_insensitive_last_wins() {
        let ele = Element::new("bitmap", span())
            .with_attr(Attr::new("ID", "first", span()))
            .with_attr(Attr::new("file", "a.png", span()))
            .with_attr(Attr::new("id", "second", span()));

        assert_eq!(Some("second"), ele.attr("Id"));
        assert_eq!(Some("a.png"), ele.attr("FILE"));
        assert_eq!(None, ele.attr("x"));
    }

    #[test]
    fn whitespace_text_is_not_content() {
        let ele = Element::new("text", span())
            .with_child(Node::Text("\n   \t".into(), span()));

        assert_eq!(None, ele.first_content());

        let ele = ele.with_child(Node::Text(" x ".into(), span()));

        assert!(matches!(ele.first_content(), Some(Node::Text(t, _)) if t == " x "));
    }

    #[test]
    fn text_concatenates_and_trims() {
        let ele = Element::new("name", span())
            .with_child(Node::Text("  Big ".into(), span()))
            .with_child(Node::Element(Element::new("br", span())))
            .with_child(Node::Text("Bento\n".into(), span()));

        assert_eq!("Big Bento", ele.text());
    }

    #[test]
    fn fragment_root_is_distinguishable() {
        let root = Element::fragment(vec![], span());

        assert!(root.is_fragment());
        assert!(!Element::new("wrapper", span()).is_fragment());
    }
}
