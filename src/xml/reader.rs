// Parse skin documents into element trees
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

//! Parse skin documents into [`Element`] trees.
//!
//! This uses [`quick_xml`] as the parser.
//!
//! Skin documents are notoriously sloppy,
//!   so the reader is lenient wherever it can be without misrepresenting
//!   structure:
//!
//!   - XML declarations, comments, processing instructions and doctypes
//!       are skipped wherever they appear,
//!         including mid-document in concatenated includes;
//!   - duplicate attributes are retained
//!       (the last one wins on lookup);
//!   - attribute values and text that fail to unescape
//!       (e.g. an HTML entity like `&nbsp;` or a stray `&`)
//!       are kept verbatim; and
//!   - any number of top-level elements are permitted
//!       (see [`parse_fragment`]).
//!
//! Mismatched or unclosed tags,
//!   on the other hand,
//!   are errors,
//!     since the resulting tree would not reflect what the author
//!     intended.

use super::{Attr, Element, Node};
use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    span::{Context, Span},
};
use quick_xml::{
    events::{attributes::Attribute, BytesStart, Event},
    Reader,
};
use std::{error::Error, fmt::Display};

pub type Result<T> = std::result::Result<T, XmlError>;

/// Parse `text` as a sequence of top-level nodes beneath a synthetic root
///   [`Element`]
///     (see [`Element::fragment`]).
///
/// Spans of the resulting tree are relative to `text` within `ctx`.
///
/// ```
/// use wasabi::{span::Context, xml::parse_fragment};
///
/// let root = parse_fragment(
///     r#"<?xml version="1.0"?><bitmap id="a"/><bitmap id="b"/>"#,
///     Context::from("xml/bitmaps.xml"),
/// ).unwrap();
///
/// assert!(root.is_fragment());
/// assert_eq!(2, root.child_elements().count());
/// ```
pub fn parse_fragment(text: &str, ctx: Context) -> Result<Element> {
    let mut reader = Reader::from_str(text);
    reader.check_end_names(true);

    let mut buf = Vec::new();

    // The fragment root is always at the bottom of this stack.
    let mut stack = vec![Element::fragment(vec![], ctx.span(0, text.len()))];

    loop {
        let pos = reader.buffer_position();

        let ev = reader.read_event(&mut buf).map_err(|e| {
            XmlError::Syntax(e.to_string(), ctx.span(pos, reader.buffer_position() - pos))
        })?;

        match ev {
            Event::Eof => break,

            Event::Start(ele) => {
                let span = ctx.span(pos, reader.buffer_position() - pos);
                stack.push(open_element(&reader, &ele, pos, span)?);
            }

            Event::Empty(ele) => {
                let span = ctx.span(pos, reader.buffer_position() - pos);
                let ele = open_element(&reader, &ele, pos, span)?;

                push_child(&mut stack, Node::Element(ele));
            }

            Event::End(end) => {
                let span = ctx.span(pos, reader.buffer_position() - pos);
                let name = String::from_utf8_lossy(end.name()).into_owned();

                if stack.len() < 2 {
                    return Err(XmlError::UnexpectedClose(name, span));
                }

                if let Some(ele) = stack.pop() {
                    push_child(&mut stack, Node::Element(ele));
                }
            }

            // Comments and instructions are bracketed by empty text events.
            Event::Text(bytes) if bytes.is_empty() => (),

            Event::Text(bytes) => {
                let span = ctx.span(pos, bytes.len());
                let text = bytes
                    .unescape_and_decode(&reader)
                    .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());

                push_child(&mut stack, Node::Text(text, span));
            }

            Event::CData(bytes) => {
                // <![CDATA[...]]>
                // |---------|  + data + "]]>"
                let span = ctx.span(pos, bytes.len() + 12);
                let text = String::from_utf8_lossy(&bytes).into_owned();

                push_child(&mut stack, Node::Text(text, span));
            }

            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => (),
        }

        buf.clear();
    }

    let mut unclosed = stack.split_off(1);

    // Report the innermost unclosed element,
    //   since closing it is the first thing the author must do.
    match (unclosed.pop(), stack.pop()) {
        (None, Some(root)) => Ok(root),
        (Some(ele), _) => Err(XmlError::UnclosedElement(
            ele.name().to_string(),
            ele.span().clone(),
        )),
        (None, None) => unreachable!("fragment root was popped"),
    }
}

fn push_child(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.push_child(node);
    }
}

/// Convert an opening tag and its attributes into an [`Element`].
///
/// `pos` is the offset of the opening `<`.
fn open_element<B: std::io::BufRead>(
    reader: &Reader<B>,
    ele: &BytesStart,
    pos: usize,
    span: Span,
) -> Result<Element> {
    let name = String::from_utf8_lossy(ele.name()).into_owned();

    if name.is_empty() {
        return Err(XmlError::Syntax("missing element name".into(), span));
    }

    // Content of the tag begins after the opening `<`.
    let base = ele.as_ptr() as usize;
    let ctx = span.context().clone();

    ele.attributes()
        .with_checks(false)
        .try_fold(Element::new(name, span.clone()), |acc, attr| {
            let attr = attr.map_err(|e| XmlError::Syntax(e.to_string(), span.clone()))?;

            // <foo bar="baz">
            //      |-|
            let offset = pos + 1 + (attr.key.as_ptr() as usize).saturating_sub(base);
            let attr_span = ctx.span(offset, attr.key.len());

            Ok(acc.with_attr(Attr::new(
                String::from_utf8_lossy(attr.key).into_owned(),
                attr_value(reader, &attr),
                attr_span,
            )))
        })
}

fn attr_value<B: std::io::BufRead>(reader: &Reader<B>, attr: &Attribute) -> String {
    attr.unescape_and_decode_value(reader)
        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Failure to read a skin document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    /// The underlying parser rejected the document.
    Syntax(String, Span),

    /// An element was never closed before the end of the document.
    UnclosedElement(String, Span),

    /// A closing tag appeared with no open element.
    UnexpectedClose(String, Span),
}

impl XmlError {
    pub fn span(&self) -> &Span {
        match self {
            Self::Syntax(_, span)
            | Self::UnclosedElement(_, span)
            | Self::UnexpectedClose(_, span) => span,
        }
    }
}

impl Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(msg, _) => write!(f, "malformed XML: {msg}"),
            Self::UnclosedElement(name, _) => {
                write!(f, "element `{name}` is never closed")
            }
            Self::UnexpectedClose(name, _) => {
                write!(f, "closing tag `</{name}>` has no opening tag")
            }
        }
    }
}

impl Error for XmlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl Diagnostic for XmlError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::Syntax(..) => vec![self.span().mark_error()],
            Self::UnclosedElement(..) => vec![
                self.span().error("element opened here"),
                self.span().help("add a closing tag or make the element self-closing"),
            ],
            Self::UnexpectedClose(..) => vec![self.span().error("unexpected closing tag")],
        }
    }
}

#[cfg(test)]
mod test;
