// Skin interpretation errors
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

//! Errors and warnings resulting from skin interpretation.
//!
//! A [`SkinError`] aborts interpretation entirely;
//!   no partial [`Skin`](super::Skin) is produced.
//! A [`SkinWarning`] records a condition that degraded the resulting skin
//!   (for example by dropping an element)
//!   and is retained on the [`Skin`](super::Skin) for the caller to
//!   report.
//!
//! Both implement [`Diagnostic`] so that they can be rendered by any
//!   [`Reporter`](crate::diagnose::Reporter).

use std::{
    error::Error,
    fmt::{self, Display},
};

use super::load::{ImageError, ScriptDecodeError};
use crate::{
    archive::ArchiveError,
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    span::Span,
    xml::XmlError,
};

/// Ancestor state that an element requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSlot {
    Container,
    Layout,
    ParentRegion,
}

impl Display for ContextSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Container => write!(f, "container"),
            Self::Layout => write!(f, "layout"),
            Self::ParentRegion => write!(f, "group or layout"),
        }
    }
}

/// The way in which a document is structurally malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformation {
    /// A leaf element has content;
    ///   the span is that of the first offending child.
    UnexpectedChild(Span),

    /// A required attribute is absent.
    MissingAttribute(&'static str),
}

/// A fatal interpretation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkinError {
    /// An element name has no entry in the dispatch table.
    ///
    /// Unrecognized structure is never ignored,
    ///   since doing so may silently misinterpret a skin written for a
    ///   newer format.
    UnknownNodeKind(String, Span),

    /// An element of the given name violates structural rules.
    MalformedDocument(String, Malformation, Span),

    /// A path referenced by an element does not resolve within the
    ///   archive.
    NotFound(String, Span),

    /// The target of an `<include>` does not resolve within the archive.
    IncludeNotFound(String, Span),

    /// The named element requires an ancestor that is not active.
    MissingContext(String, ContextSlot, Span),

    /// A document could not be parsed.
    Xml(XmlError),

    /// An archive entry exists but could not be read.
    Archive(ArchiveError, Span),

    /// An `<include>` re-enters a document that is already being
    ///   processed.
    IncludeCycle(String, Span),

    /// Includes are nested beyond the configured maximum depth.
    IncludeTooDeep(usize, Span),

    /// A script could not be decoded and the script failure policy
    ///   requires aborting.
    ScriptDecode(String, ScriptDecodeError, Span),
}

impl SkinError {
    /// Location of the element responsible for the error.
    pub fn span(&self) -> &Span {
        use SkinError::*;

        match self {
            UnknownNodeKind(_, span)
            | MalformedDocument(_, _, span)
            | NotFound(_, span)
            | IncludeNotFound(_, span)
            | MissingContext(_, _, span)
            | Archive(_, span)
            | IncludeCycle(_, span)
            | IncludeTooDeep(_, span)
            | ScriptDecode(_, _, span) => span,
            Xml(e) => e.span(),
        }
    }
}

impl Display for SkinError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use SkinError::*;

        match self {
            UnknownNodeKind(name, _) => {
                write!(f, "unknown element `<{name}>`")
            }
            MalformedDocument(name, Malformation::UnexpectedChild(_), _) => {
                write!(f, "element `<{name}>` must not have children")
            }
            MalformedDocument(name, Malformation::MissingAttribute(attr), _) => {
                write!(f, "element `<{name}>` is missing attribute `{attr}`")
            }
            NotFound(path, _) => write!(f, "file `{path}` not found"),
            IncludeNotFound(path, _) => {
                write!(f, "included file `{path}` not found")
            }
            MissingContext(name, slot, _) => {
                write!(f, "element `<{name}>` must appear within a {slot}")
            }
            Xml(e) => Display::fmt(e, f),
            Archive(e, _) => Display::fmt(e, f),
            IncludeCycle(path, _) => {
                write!(f, "file `{path}` includes itself")
            }
            IncludeTooDeep(max, _) => {
                write!(f, "includes are nested more than {max} levels deep")
            }
            ScriptDecode(path, e, _) => {
                write!(f, "failed to decode script `{path}`: {e}")
            }
        }
    }
}

impl Error for SkinError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use SkinError::*;

        match self {
            Xml(e) => Some(e),
            Archive(e, _) => Some(e),
            ScriptDecode(_, e, _) => Some(e),
            _ => None,
        }
    }
}

impl From<XmlError> for SkinError {
    fn from(e: XmlError) -> Self {
        Self::Xml(e)
    }
}

impl Diagnostic for SkinError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        use SkinError::*;

        match self {
            UnknownNodeKind(_, span) => vec![
                span.error("this element is not recognized"),
                span.help("check the spelling of the element name"),
            ],

            MalformedDocument(_, Malformation::UnexpectedChild(child), span) => {
                vec![
                    span.note("this element does not accept content"),
                    child.error("unexpected content"),
                ]
            }

            MalformedDocument(_, Malformation::MissingAttribute(attr), span) => {
                vec![span.error(format!("add a `{attr}` attribute"))]
            }

            NotFound(_, span) | IncludeNotFound(_, span) => vec![
                span.error("referenced here"),
                span.help("paths are relative to the including document"),
            ],

            MissingContext(_, slot, span) => vec![
                span.error(format!("no enclosing {slot}")),
            ],

            Xml(e) => e.describe(),

            Archive(_, span) => vec![span.error("while reading this file")],

            IncludeCycle(_, span) => vec![span.error("included again here")],

            IncludeTooDeep(_, span) => vec![span.error("while including here")],

            ScriptDecode(_, _, span) => vec![
                span.error("script referenced here"),
                span.help("recompile the script or remove this element"),
            ],
        }
    }
}

/// A non-fatal condition encountered during interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkinWarning {
    /// A `<layer>` appeared with no enclosing `<layout>` and was dropped.
    OrphanLayer(Span),

    /// A bitmap id was registered more than once;
    ///   the latest registration replaces the former,
    ///     whose span is provided second.
    DuplicateBitmap(String, Span, Span),

    /// The image for the named bitmap could not be loaded;
    ///   the bitmap is retained without an image.
    ImageUnavailable(String, ImageError, Span),

    /// A script could not be decoded and was dropped.
    ScriptDropped(String, ScriptDecodeError, Span),

    /// A region's background names a bitmap that was never registered.
    UnresolvedBackground(String, Span),
}

impl SkinWarning {
    pub fn span(&self) -> &Span {
        use SkinWarning::*;

        match self {
            OrphanLayer(span)
            | DuplicateBitmap(_, span, _)
            | ImageUnavailable(_, _, span)
            | ScriptDropped(_, _, span)
            | UnresolvedBackground(_, span) => span,
        }
    }
}

impl Display for SkinWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use SkinWarning::*;

        match self {
            OrphanLayer(_) => {
                write!(f, "layer has no enclosing layout and was dropped")
            }
            DuplicateBitmap(id, _, _) => {
                write!(f, "bitmap `{id}` is defined more than once")
            }
            ImageUnavailable(id, e, _) => {
                write!(f, "image for bitmap `{id}` is unavailable: {e}")
            }
            ScriptDropped(path, e, _) => {
                write!(f, "script `{path}` was dropped: {e}")
            }
            UnresolvedBackground(id, _) => {
                write!(f, "background bitmap `{id}` is not defined")
            }
        }
    }
}

impl Error for SkinWarning {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use SkinWarning::*;

        match self {
            ImageUnavailable(_, e, _) => Some(e),
            ScriptDropped(_, e, _) => Some(e),
            _ => None,
        }
    }
}

impl Diagnostic for SkinWarning {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        use SkinWarning::*;

        match self {
            OrphanLayer(span) => vec![
                span.warning("this layer will not be displayed"),
                span.help("move this layer into a `<layout>`"),
            ],

            DuplicateBitmap(_, span, prev) => vec![
                span.warning("this definition replaces the former"),
                prev.note("previously defined here"),
            ],

            ImageUnavailable(_, _, span) => {
                vec![span.warning("bitmap defined here")]
            }

            ScriptDropped(_, _, span) => {
                vec![span.warning("this script will not run")]
            }

            UnresolvedBackground(_, span) => {
                vec![span.warning("background referenced here")]
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{diagnose::Level, span::Context};

    #[test]
    fn error_span_is_element_span() {
        let span = Context::from("skin.xml").span(10, 5);

        assert_eq!(
            &span,
            SkinError::UnknownNodeKind("frobnicate".into(), span.clone())
                .span()
        );
    }

    #[test]
    fn malformed_describes_child() {
        let span = Context::from("skin.xml").span(0, 20);
        let child = Context::from("skin.xml").span(6, 4);

        let err = SkinError::MalformedDocument(
            "text".into(),
            Malformation::UnexpectedChild(child.clone()),
            span.clone(),
        );

        assert_eq!("element `<text>` must not have children", err.to_string());

        let desc = err.describe();
        assert_eq!(2, desc.len());
        assert_eq!(&span, desc[0].span());
        assert_eq!(&child, desc[1].span());
        assert_eq!(Level::Error, desc[1].level());
    }

    #[test]
    fn script_decode_source() {
        let err = SkinError::ScriptDecode(
            "a.maki".into(),
            ScriptDecodeError::Truncated(1),
            Span::unknown(),
        );

        assert!(err.source().is_some());
    }

    #[test]
    fn warnings_describe_as_warnings() {
        let span = Context::from("skin.xml").span(3, 7);

        let warning = SkinWarning::OrphanLayer(span);
        let desc = warning.describe();

        assert_eq!(Level::Warning, desc[0].level());
    }
}
