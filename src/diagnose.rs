// Diagnostic system
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

//! Diagnostic system for error and warning reporting.
//!
//! Every error raised while interpreting a skin,
//!   and every warning collected along the way,
//!   is able to describe itself as a series of [`AnnotatedSpan`]s pointing
//!   back into the documents of the skin archive.
//! A [`Reporter`] renders those descriptions for humans.

mod report;
mod resolver;

pub use report::{Report, Reporter, VisualReporter};
pub use resolver::{
    ArchiveSpanResolver, Column, ResolvedSpan, SpanResolver,
    SpanResolverError,
};

use core::fmt;
use std::{borrow::Cow, error::Error, fmt::Display};

use crate::span::Span;

/// Diagnostic report.
///
/// This describes an error condition or other special event using a series
///   of [`Span`]s to describe the source, cause, and circumstances around
///   an event.
pub trait Diagnostic: Error {
    /// Produce a series of [`AnnotatedSpan`]s describing the source and
    ///   circumstances of the diagnostic event.
    fn describe(&self) -> Vec<AnnotatedSpan>;
}

/// Diagnostic severity level.
///
/// Lower levels are more severe
///   (e.g. level 1 is the worst).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
#[repr(u8)]
pub enum Level {
    /// An error internal to the interpreter that the skin author cannot
    ///   resolve.
    InternalError = 1,

    /// A user-resolvable error that aborts interpretation.
    #[default]
    Error,

    /// A condition that degraded the resulting skin without aborting,
    ///   such as an element that was dropped.
    Warning,

    /// Useful information that supplements other messages.
    Note,

    /// Additional advice that may help in fixing a problem.
    Help,
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::InternalError => write!(f, "internal error"),
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
            Level::Help => write!(f, "help"),
        }
    }
}

/// A label associated with a [`Span`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Label<'a>(Cow<'a, str>);

impl<'a> Display for Label<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<'a> From<String> for Label<'a> {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl<'a> From<&'a str> for Label<'a> {
    fn from(s: &'a str) -> Self {
        Self(Cow::Borrowed(s))
    }
}

/// A span with an associated severity level and optional label.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AnnotatedSpan<'l>(pub Span, pub Level, pub Option<Label<'l>>);

impl<'l> AnnotatedSpan<'l> {
    pub fn span(&self) -> &Span {
        &self.0
    }

    pub fn level(&self) -> Level {
        self.1
    }

    pub fn label(&self) -> Option<&Label<'l>> {
        self.2.as_ref()
    }
}

impl<'l> From<AnnotatedSpan<'l>> for Vec<AnnotatedSpan<'l>> {
    fn from(x: AnnotatedSpan<'l>) -> Self {
        vec![x]
    }
}

pub trait Annotate: Sized {
    /// Annotate a [`Span`] with a severity [`Level`] and an optional
    ///   [`Label`] to display alongside of it.
    fn annotate(self, level: Level, label: Option<Label>) -> AnnotatedSpan;

    /// Annotate a span with a clarifying label styled as an error.
    fn error<'l, L: Into<Label<'l>>>(self, label: L) -> AnnotatedSpan<'l> {
        self.annotate(Level::Error, Some(label.into()))
    }

    /// Style the span as a [`Level::Error`] without attaching a label.
    ///
    /// This is appropriate when a label would simply repeat the generic
    ///   error text.
    fn mark_error(self) -> AnnotatedSpan<'static> {
        self.annotate(Level::Error, None)
    }

    /// Annotate a span as the location of a non-fatal condition.
    fn warning<'l, L: Into<Label<'l>>>(self, label: L) -> AnnotatedSpan<'l> {
        self.annotate(Level::Warning, Some(label.into()))
    }

    /// Supplemental annotated span providing additional context for another
    ///   span.
    fn note<'l, L: Into<Label<'l>>>(self, label: L) -> AnnotatedSpan<'l> {
        self.annotate(Level::Note, Some(label.into()))
    }

    /// Advice on how the user might resolve the problem.
    fn help<'l, L: Into<Label<'l>>>(self, label: L) -> AnnotatedSpan<'l> {
        self.annotate(Level::Help, Some(label.into()))
    }
}

impl Annotate for Span {
    fn annotate(self, level: Level, label: Option<Label>) -> AnnotatedSpan {
        AnnotatedSpan(self, level, label)
    }
}

impl Annotate for &Span {
    fn annotate(self, level: Level, label: Option<Label>) -> AnnotatedSpan {
        AnnotatedSpan(self.clone(), level, label)
    }
}
