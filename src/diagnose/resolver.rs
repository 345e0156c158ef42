// Span resolution for diagnostics
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

//! Resolution of [`Span`]s into line and column numbers.
//!
//! Spans are collected as raw byte offsets while interpreting a skin.
//! Only when a diagnostic is actually rendered is the document read a
//!   second time to determine which line and column those offsets
//!   correspond to;
//!     this is not the happy path and there is no sense in paying for it
//!     up front.

use crate::{
    archive::{Archive, ArchiveError},
    span::{Context, Span},
};
use fxhash::FxHashMap;
use memchr::{memchr, memchr_iter, memrchr};
use std::{error::Error, fmt::Display, num::NonZeroU32};
use unicode_width::UnicodeWidthChar;

/// Resolves [`Span`]s into line:column source locations.
pub trait SpanResolver {
    fn resolve(&mut self, span: &Span) -> Result<ResolvedSpan, SpanResolverError>;
}

/// A [`Span`] resolved to its source location.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ResolvedSpan {
    span: Span,

    /// 1-indexed line on which the span begins.
    line_num: NonZeroU32,

    /// 1-indexed columns of the span on its first line.
    ///
    /// This is [`None`] if the line is not valid UTF-8.
    column: Option<Column>,

    /// Text of the first line,
    ///   excluding the line terminator.
    line: String,
}

impl ResolvedSpan {
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn context(&self) -> &Context {
        self.span.context()
    }

    pub fn line_num(&self) -> NonZeroU32 {
        self.line_num
    }

    pub fn col_num(&self) -> Option<Column> {
        self.column
    }

    pub fn line(&self) -> &str {
        &self.line
    }
}

/// Source column offsets.
///
/// A "column" is a terminal cell;
///   certain unicode characters occupy more than one cell,
///   while others occupy none.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Column {
    /// A range of 1-indexed columns, inclusive.
    Endpoints(NonZeroU32, NonZeroU32),

    /// Immediately before a column,
    ///   caused by a zero-length [`Span`].
    Before(NonZeroU32),
}

impl Column {
    /// First column of the span.
    pub fn start(&self) -> NonZeroU32 {
        match self {
            Self::Endpoints(at, _) | Self::Before(at) => *at,
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.start(), f)
    }
}

/// Resolve spans by reading their [`Context`]s back out of an
///   [`Archive`].
///
/// Documents are cached after their first read,
///   since a skin that produces one diagnostic often produces several in
///   the same document.
pub struct ArchiveSpanResolver<A: Archive> {
    archive: A,
    cache: FxHashMap<Context, Vec<u8>>,
}

impl<A: Archive> ArchiveSpanResolver<A> {
    pub fn new(archive: A) -> Self {
        Self {
            archive,
            cache: Default::default(),
        }
    }

    fn document(&mut self, ctx: &Context) -> Result<&[u8], SpanResolverError> {
        if !self.cache.contains_key(ctx) {
            let file = self.archive.find(ctx.path())?;
            // Spans are offsets into the decoded text,
            //   not into the raw bytes of the entry.
            let bytes = self.archive.read_as_text(&file)?.into_bytes();

            self.cache.insert(ctx.clone(), bytes);
        }

        Ok(self.cache.get(ctx).map(Vec::as_slice).unwrap_or_default())
    }
}

impl<A: Archive> SpanResolver for ArchiveSpanResolver<A> {
    fn resolve(&mut self, span: &Span) -> Result<ResolvedSpan, SpanResolverError> {
        let doc = self.document(span.context())?;
        resolve_in(doc, span)
    }
}

/// Resolve `span` against the bytes `doc` of its decoded document.
pub fn resolve_in(doc: &[u8], span: &Span) -> Result<ResolvedSpan, SpanResolverError> {
    let offset = span.offset();

    if offset > doc.len() {
        return Err(SpanResolverError::OutOfRange(doc.len()));
    }

    let line_start = memrchr(b'\n', &doc[..offset]).map_or(0, |i| i + 1);
    let line_end = memchr(b'\n', &doc[offset..]).map_or(doc.len(), |i| offset + i);

    let raw_line = &doc[line_start..line_end];
    let raw_line = raw_line.strip_suffix(b"\r").unwrap_or(raw_line);

    // A skin document would need four billion lines to overflow.
    let line_num = NonZeroU32::new(
        (memchr_iter(b'\n', &doc[..line_start]).count() + 1)
            .try_into()
            .unwrap_or(u32::MAX),
    )
    .unwrap_or(NonZeroU32::MIN);

    let line = std::str::from_utf8(raw_line).ok();
    let column = line.map(|line| resolve_columns(line, offset - line_start, span.len()));

    Ok(ResolvedSpan {
        span: span.clone(),
        line_num,
        column,
        line: String::from_utf8_lossy(raw_line).into_owned(),
    })
}

/// Determine the columns occupied by a span beginning at the line-relative
///   byte offset `rel_start`.
///
/// A span that continues beyond the end of the line is clamped to the end
///   of the line.
fn resolve_columns(line: &str, rel_start: usize, len: usize) -> Column {
    let rel_end = rel_start + len.max(1) - 1;

    let (start, end) = line.char_indices().fold((1, 0), |(start, end), (i, c)| {
        let width = c.width().unwrap_or(0);

        (
            if i < rel_start { start + width } else { start },
            if i <= rel_end { end + width } else { end },
        )
    });

    let nz = |n: usize| {
        NonZeroU32::new(n.try_into().unwrap_or(u32::MAX)).unwrap_or(NonZeroU32::MIN)
    };

    if len == 0 {
        Column::Before(nz(start))
    } else {
        Column::Endpoints(nz(start), nz(end).max(nz(start)))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SpanResolverError {
    /// The span's document could not be read from the archive.
    Archive(ArchiveError),

    /// The [`Span`] begins beyond the end of its document,
    ///   whose size is provided.
    OutOfRange(usize),
}

impl From<ArchiveError> for SpanResolverError {
    fn from(e: ArchiveError) -> Self {
        Self::Archive(e)
    }
}

impl Display for SpanResolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Archive(e) => Display::fmt(e, f),
            Self::OutOfRange(size) => {
                write!(f, "span exceeds document size of {size} bytes")
            }
        }
    }
}

impl Error for SpanResolverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Archive(e) => Some(e),
            Self::OutOfRange(_) => None,
        }
    }
}
