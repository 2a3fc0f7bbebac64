//! Fancy diagnostics support using `ariadne`.
//!
//! This module converts a [`ParseError`] (and the aggregated [`ConvertError`]) into an
//! [`ariadne::Report`] without modifying the error type definitions. Errors that name a source
//! line are labeled on that line; file-level errors are labeled on the header line.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::{convert::ConvertError, osu::ParseError};

/// Simple source container that holds the chart file name and its text.
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Creates a new source container.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Gets the source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Gets the source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting conversion errors into an `ariadne::Report`.
pub trait ToAriadne {
    /// Converts the error into an ariadne report over `src`.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

/// Byte range of the 1-based `line` in `text`, or of the first line when out of range.
fn line_span(text: &str, line: usize) -> std::ops::Range<usize> {
    let mut start = 0;
    for (index, candidate) in text.split_inclusive('\n').enumerate() {
        let end = start + candidate.trim_end_matches(['\r', '\n']).len();
        if index + 1 == line {
            return start..end;
        }
        start += candidate.len();
    }
    0..text.split(['\r', '\n']).next().map_or(0, str::len)
}

impl ToAriadne for ParseError {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let range = line_span(src.text(), self.line().unwrap_or(1));
        build_report(
            src,
            ReportKind::Error,
            range,
            "malformed osu!mania beatmap",
            self,
            Color::Red,
        )
    }
}

impl ToAriadne for ConvertError {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        match self {
            Self::Parse(parse) => parse.to_report(src),
            Self::Timing(_) | Self::NonFiniteEvent { .. } => build_report(
                src,
                ReportKind::Error,
                line_span(src.text(), 1),
                "chart conversion failed",
                self,
                Color::Red,
            ),
        }
    }
}

/// Helper to build a styled ariadne `Report` consistently.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: std::ops::Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

/// Convenience method: render a conversion error to the terminal.
pub fn emit_convert_error(name: &str, source: &str, error: &ConvertError) {
    let simple = SimpleSource::new(name, source);
    let report = error.to_report(&simple);
    let _ = report.print((name.to_string(), Source::from(source)));
}
