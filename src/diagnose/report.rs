// Rendering of diagnostic reports
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

//! Rendering of diagnostic information.

// NB: `write!` together with `\n` is preferred to `writeln!` so that there
//   is only a single sequence of characters to search for while tracking
//   down newlines.

use super::{
    resolver::{Column, ResolvedSpan, SpanResolver, SpanResolverError},
    AnnotatedSpan, Diagnostic, Label, Level,
};
use crate::span::Span;
use std::fmt::{self, Display};

pub trait Reporter {
    /// Render diagnostic report.
    ///
    /// The provided [`Report`] implements [`Display`].
    /// Rendering a report to a [`String`] before printing it avoids
    ///   interleaving its lines with other output.
    ///
    /// This method _does not return [`Result`]_ and should never fail.
    /// Failures to resolve spans are absorbed into the report itself,
    ///   ensuring that the user is made aware of the problem without the
    ///   original diagnostic being masked by one of our own.
    fn render<'d, D: Diagnostic>(&mut self, diagnostic: &'d D) -> Report<'d, D>;

    /// Number of rendered reports at [`Level::Error`] or worse.
    fn error_count(&self) -> usize;

    /// Whether any rendered report was an error.
    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Render diagnostic reports with source excerpts,
///   modeled loosely after Rust's own error output.
pub struct VisualReporter<R: SpanResolver> {
    resolver: R,
    errors: usize,
}

impl<R: SpanResolver> VisualReporter<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            errors: 0,
        }
    }
}

impl<R: SpanResolver> Reporter for VisualReporter<R> {
    fn render<'d, D: Diagnostic>(&mut self, diagnostic: &'d D) -> Report<'d, D> {
        let secs = diagnostic
            .describe()
            .into_iter()
            .map(|AnnotatedSpan(span, level, olabel)| {
                let label = olabel.map(|label| SpanLabel(level, label.into_owned()));

                let mspan = match self.resolver.resolve(&span) {
                    Ok(rspan) => MaybeResolvedSpan::Resolved(rspan),
                    Err(e) => MaybeResolvedSpan::Unresolved(span, e),
                };

                Section::new(mspan, level, label)
            });

        let mut report = Report::empty(diagnostic);
        report.extend(secs);

        if report.level <= Level::Error {
            self.errors += 1;
        }

        report
    }

    fn error_count(&self) -> usize {
        self.errors
    }
}

/// A rendered diagnostic.
#[derive(Debug)]
pub struct Report<'d, D: Diagnostic> {
    msg: &'d D,
    secs: Vec<Section>,
    level: Level,
}

impl<'d, D: Diagnostic> Report<'d, D> {
    fn empty(msg: &'d D) -> Self {
        Self {
            msg,
            secs: Vec::new(),
            level: Level::default(),
        }
    }

    /// Most severe level of any section,
    ///   or [`Level::Error`] if the report has no sections.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl<'d, D: Diagnostic> Extend<Section> for Report<'d, D> {
    fn extend<T: IntoIterator<Item = Section>>(&mut self, secs: T) {
        for (i, sec) in secs.into_iter().enumerate() {
            self.level = if i == 0 {
                sec.level
            } else {
                self.level.min(sec.level)
            };

            // Add the section if it cannot be squashed into the previous.
            let remain = sec.maybe_squash_into(self.secs.last_mut());
            self.secs.extend(remain);
        }
    }
}

impl<'d, D: Diagnostic> Display for Report<'d, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{level}: {msg}\n", level = self.level, msg = self.msg)?;
        self.secs.iter().try_for_each(|sec| sec.fmt(f))
    }
}

/// A [`Span`] that may have been resolved.
///
/// The span will remain unresolved if an error occurred,
///   in which case the error is retained so that it can be reported.
#[derive(Debug, PartialEq, Eq)]
enum MaybeResolvedSpan {
    Resolved(ResolvedSpan),
    Unresolved(Span, SpanResolverError),
}

impl MaybeResolvedSpan {
    fn span(&self) -> &Span {
        match self {
            Self::Resolved(rspan) => rspan.span(),
            Self::Unresolved(span, _) => span,
        }
    }
}

/// A section of a [`Report`] describing a single [`Span`].
///
/// Adjacent sections describing the same [`Span`] are squashed
///   (see [`Section::maybe_squash_into`]).
#[derive(Debug, PartialEq, Eq)]
struct Section {
    mspan: MaybeResolvedSpan,
    labels: Vec<SpanLabel>,
    level: Level,
}

impl Section {
    fn new(mspan: MaybeResolvedSpan, level: Level, label: Option<SpanLabel>) -> Self {
        let mut labels = Vec::new();

        if let MaybeResolvedSpan::Unresolved(_, e) = &mspan {
            labels.push(SpanLabel(
                Level::Help,
                format!(
                    "an error occurred while trying to look up \
                       information about this span: {e}"
                ),
            ));
        }

        labels.extend(label);

        Self {
            mspan,
            labels,
            level,
        }
    }

    /// Squash self into the provided [`Section`] if they represent the same
    ///   [`Span`],
    ///     otherwise do nothing.
    ///
    /// If squashed,
    ///   [`None`] is returned.
    fn maybe_squash_into(self, extend: Option<&mut Section>) -> Option<Self> {
        match extend {
            Some(extend_sec) if self.mspan.span() == extend_sec.mspan.span() => {
                extend_sec.level = extend_sec.level.min(self.level);
                extend_sec.labels.extend(self.labels);
                None
            }

            _ => Some(self),
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mspan {
            MaybeResolvedSpan::Resolved(rspan) => {
                write!(f, "  --> {}:{}", rspan.context(), rspan.line_num())?;

                match rspan.col_num() {
                    Some(col) => write!(f, ":{col}\n")?,
                    None => write!(f, " (byte {})\n", rspan.span().offset())?,
                }

                let num = rspan.line_num().to_string();
                let gutter = " ".repeat(num.len());

                write!(f, "   {gutter} |\n")?;
                write!(f, "   {num} | {}\n", rspan.line())?;

                if let Some(col) = rspan.col_num() {
                    write!(f, "   {gutter} | {}\n", Marker(col))?;
                }
            }

            MaybeResolvedSpan::Unresolved(span, _) => {
                write!(f, "  --> {span}\n")?;
            }
        }

        for label in self.labels.iter() {
            write!(f, "{label}\n")?;
        }

        Ok(())
    }
}

/// Underline marking the columns of a span.
struct Marker(Column);

impl Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = match self.0 {
            Column::Endpoints(start, end) => (start.get(), end.get()),
            Column::Before(at) => (at.get(), at.get()),
        };

        let pad = " ".repeat(start as usize - 1);
        let mark = match self.0 {
            Column::Endpoints(..) => "^".repeat((end - start + 1) as usize),
            Column::Before(_) => "^".into(),
        };

        write!(f, "{pad}{mark}")
    }
}

/// A label describing a span.
#[derive(Debug, PartialEq, Eq)]
struct SpanLabel(Level, String);

impl<'l> Label<'l> {
    fn into_owned(self) -> String {
        self.0.into_owned()
    }
}

impl Display for SpanLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(level, label) = self;
        write!(f, "      {level}: {label}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        archive::{ArchiveError, MemArchive},
        diagnose::{Annotate, ArchiveSpanResolver},
        span::Context,
    };
    use std::error::Error;

    #[derive(Debug)]
    struct StubDiagnostic(Vec<AnnotatedSpan<'static>>);

    impl Display for StubDiagnostic {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "stub diagnostic")
        }
    }

    impl Error for StubDiagnostic {}

    impl Diagnostic for StubDiagnostic {
        fn describe(&self) -> Vec<AnnotatedSpan> {
            self.0.clone()
        }
    }

    #[test]
    fn renders_resolved_span_with_excerpt() {
        let archive = MemArchive::new().with_entry("skin.xml", "<a>\n  <bad/>\n</a>\n");
        let mut sut = VisualReporter::new(ArchiveSpanResolver::new(&archive));

        let span = Context::from("skin.xml").span(6, 6);
        let diag = StubDiagnostic(vec![span.error("unknown element")]);

        assert_eq!(
            "error: stub diagnostic\n\
             \x20 --> skin.xml:2:3\n\
             \x20    |\n\
             \x20  2 |   <bad/>\n\
             \x20    |   ^^^^^^\n\
             \x20     error: unknown element\n",
            sut.render(&diag).to_string(),
        );

        assert_eq!(1, sut.error_count());
    }

    #[test]
    fn squashes_adjacent_labels_for_same_span() {
        let archive = MemArchive::new().with_entry("s.xml", "<x/>");
        let mut sut = VisualReporter::new(ArchiveSpanResolver::new(&archive));

        let span = Context::from("s.xml").span(0, 4);
        let diag = StubDiagnostic(vec![
            (&span).warning("dropped"),
            span.help("wrap it"),
        ]);

        let report = sut.render(&diag);

        assert_eq!(Level::Warning, report.level());
        assert_eq!(1, report.secs.len());
        assert_eq!(2, report.secs[0].labels.len());

        // Warnings are not errors.
        assert!(!sut.has_errors());
    }

    #[test]
    fn unresolved_span_falls_back_to_offsets() {
        let archive = MemArchive::new();
        let mut sut = VisualReporter::new(ArchiveSpanResolver::new(&archive));

        let span = Context::from("gone.xml").span(3, 2);
        let diag = StubDiagnostic(vec![span.clone().mark_error()]);

        let report = sut.render(&diag);

        assert_eq!(
            Section {
                mspan: MaybeResolvedSpan::Unresolved(
                    span,
                    SpanResolverError::Archive(ArchiveError::NotFound(
                        "gone.xml".into()
                    )),
                ),
                labels: vec![SpanLabel(
                    Level::Help,
                    "an error occurred while trying to look up information \
                       about this span: no archive entry matches `gone.xml`"
                        .into()
                )],
                level: Level::Error,
            },
            report.secs[0],
        );

        assert!(report
            .to_string()
            .contains("--> gone.xml offset 3--5\n"));
    }

    #[test]
    fn report_without_sections_is_an_error() {
        let archive = MemArchive::new();
        let mut sut = VisualReporter::new(ArchiveSpanResolver::new(&archive));

        let diag = StubDiagnostic(vec![]);

        assert_eq!("error: stub diagnostic\n", sut.render(&diag).to_string());
    }
}
