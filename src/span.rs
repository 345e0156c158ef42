// Source locations within skin documents
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

//! Mapping to byte intervals within skin documents.
//!
//! A [`Span`] is a mapping to a byte interval within a document stored in
//!   a skin archive,
//!     representing where some element or attribute originated.
//! This underpins the diagnostic system,
//!   giving the skin author specific information for locating the element
//!   responsible for an error.
//!
//! A span contains a [`Context`] representing the document,
//!   identified by its path _as resolved within the archive_
//!   (see [`crate::archive`]),
//!     not as it was referenced by an `<include>`.
//!
//! ```
//! use wasabi::span::{Context, Span};
//!
//! let ctx = Context::from("xml/player.xml");
//! let span = ctx.span(2, 6);
//!
//! assert_eq!(2, span.offset());
//! assert_eq!(6, span.len());
//! assert_eq!(8, span.end());
//! assert_eq!(&ctx, span.context());
//! ```
//!
//! Spans order first by [`Context`],
//!   then by offset,
//!   and finally by length,
//!     so that sorting a collection of spans groups them by document.
//!
//! Skins produce few enough spans that the context path is simply shared
//!   by reference count rather than interned.

use std::{fmt::Display, sync::Arc};

/// Path of the document that a [`Span`] belongs to.
///
/// Cloning a context is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Context(Arc<str>);

impl Context {
    /// Context used for spans whose document is not known,
    ///   such as the absence of the root document itself.
    pub fn unknown() -> Self {
        Self::from("<unknown>")
    }

    /// Create a [`Span`] within this context.
    pub fn span(&self, offset: usize, len: usize) -> Span {
        Span::new(offset, len, self.clone())
    }

    /// Path of the document within the archive.
    pub fn path(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Context {
    fn from(path: &str) -> Self {
        Self(Arc::from(path))
    }
}

impl From<String> for Context {
    fn from(path: String) -> Self {
        Self(Arc::from(path))
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// A byte interval within a [`Context`].
///
/// Offsets larger than [`u32::MAX`] saturate;
///   no reasonable skin document approaches that size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    ctx: Context,
    offset: u32,
    len: u32,
}

impl Span {
    pub fn new(offset: usize, len: usize, ctx: Context) -> Self {
        Self {
            ctx,
            offset: offset.try_into().unwrap_or(u32::MAX),
            len: len.try_into().unwrap_or(u32::MAX),
        }
    }

    /// A zero-length span at the start of an unknown document.
    pub fn unknown() -> Self {
        Context::unknown().span(0, 0)
    }

    /// Span of the entire interval beginning at `self` and ending at the
    ///   end of `other`.
    ///
    /// If the two spans are in different contexts,
    ///   or `other` ends before `self` begins,
    ///   `self` is returned unchanged.
    pub fn merge(self, other: &Span) -> Span {
        if self.ctx != other.ctx || other.end() < self.offset() {
            return self;
        }

        let end = other.end().max(self.end());
        let offset = self.offset();

        Self::new(offset, end - offset, self.ctx)
    }

    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset immediately following the span.
    pub fn end(&self) -> usize {
        self.offset() + self.len()
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }
}

impl Display for Span {
    /// Render the span in a form that is useful when diagnostic
    ///   resolution fails:
    ///     `path offset N--M`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} offset {}--{}", self.ctx, self.offset, self.end())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn span_orders_by_context_then_offset_then_len() {
        let a = Context::from("a.xml");
        let b = Context::from("b.xml");

        let mut spans = vec![
            b.span(0, 1),
            a.span(10, 4),
            a.span(10, 2),
            a.span(3, 20),
        ];
        spans.sort();

        assert_eq!(
            vec![a.span(3, 20), a.span(10, 2), a.span(10, 4), b.span(0, 1)],
            spans,
        );
    }

    #[test]
    fn merge_extends_to_end_of_other() {
        let ctx = Context::from("skin.xml");

        assert_eq!(ctx.span(4, 12), ctx.span(4, 2).merge(&ctx.span(10, 6)));
    }

    #[test]
    fn merge_ignores_other_context() {
        let ctx = Context::from("skin.xml");
        let span = ctx.span(4, 2);

        assert_eq!(span.clone(), span.merge(&Context::from("x").span(9, 1)));
    }

    #[test]
    fn display_falls_back_to_offsets() {
        let span = Context::from("xml/eq.xml").span(5, 3);

        assert_eq!("xml/eq.xml offset 5--8", span.to_string());
    }
}
