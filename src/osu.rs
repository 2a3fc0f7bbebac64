//! The parser module of osu!mania beatmap (.osu) files.
//!
//! Raw [`str`] == [`parse_osu`] ==> [`OsuChart`]
//!
//! The format is line-oriented: a `osu file format vN` header line, then `[Section]` blocks which
//! are either `key: value` pairs (`[General]`, `[Metadata]`, `[Difficulty]`) or comma-separated
//! object lists (`[Events]`, `[TimingPoints]`, `[HitObjects]`). The parser materializes the whole
//! chart at once; it never exposes a token stream.
//!
//! Our policies are:
//!
//! - Support only UTF-8 (an optional BOM is tolerated).
//! - Skip unrecognized sections and unknown keys instead of rejecting the file.
//! - Reject lines of a recognized list section with an unexpected field count, so a truncated line
//!   can never silently desynchronize later lanes or timings.

mod parse;

pub mod model;

use thiserror::Error;

pub use self::model::{HitObject, HitObjectKind, OsuChart, OsuMetadata, TimingPoint, TimingPointKind};

/// The lowest mania key count this converter accepts.
pub const MIN_KEY_COUNT: u8 = 1;
/// The highest mania key count this converter accepts.
pub const MAX_KEY_COUNT: u8 = 18;

/// An error occurred when parsing an osu!mania beatmap. Line numbers are 1-based.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ParseError {
    /// The `osu file format` header line was missing or unreadable.
    #[error("missing `osu file format` header line")]
    MissingFormatHeader,
    /// The chart declares a game mode other than osu!mania.
    #[error("game mode {mode} is not osu!mania")]
    NotManiaMode {
        /// The declared `Mode` value.
        mode: u32,
    },
    /// The column count is outside of the supported mania key range.
    #[error("key count {count} is outside of the supported range {MIN_KEY_COUNT}..={MAX_KEY_COUNT}")]
    KeyCountOutOfRange {
        /// The declared `CircleSize` value.
        count: i64,
    },
    /// A required key was missing from a key-value section.
    #[error("missing `{field}` in section [{section}]")]
    MissingField {
        /// The section the key belongs to.
        section: &'static str,
        /// The missing key.
        field: &'static str,
    },
    /// A key-value section line had no `key: value` shape.
    #[error("expected `key: value` at line {line}")]
    InvalidKeyValue {
        /// The line number of the malformed line.
        line: usize,
    },
    /// A list section line carried an unexpected number of fields.
    #[error("expected at least {expected} fields but got {got} at line {line}")]
    FieldCount {
        /// The line number of the malformed line.
        line: usize,
        /// How many fields the section requires.
        expected: usize,
        /// How many fields the line actually had.
        got: usize,
    },
    /// A numeric field did not parse as a finite number.
    #[error("invalid number `{value}` at line {line}")]
    InvalidNumber {
        /// The line number of the malformed field.
        line: usize,
        /// The text that failed to parse.
        value: String,
    },
    /// A hit object fell outside of the declared columns.
    #[error("hit object column {column} exceeds key count {key_count} at line {line}")]
    ColumnOutOfRange {
        /// The line number of the hit object.
        line: usize,
        /// The computed column index.
        column: u64,
        /// The declared key count.
        key_count: u8,
    },
    /// A hit object had a type this converter does not understand (e.g. a standard-mode slider).
    #[error("unsupported hit object type {object_type:#x} at line {line}")]
    UnsupportedObjectType {
        /// The line number of the hit object.
        line: usize,
        /// The raw type bit field.
        object_type: u32,
    },
}

impl ParseError {
    /// The 1-based source line this error points at, if it names one.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match *self {
            Self::InvalidKeyValue { line }
            | Self::FieldCount { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::ColumnOutOfRange { line, .. }
            | Self::UnsupportedObjectType { line, .. } => Some(line),
            Self::MissingFormatHeader
            | Self::NotManiaMode { .. }
            | Self::KeyCountOutOfRange { .. }
            | Self::MissingField { .. } => None,
        }
    }
}

/// An error occurred when parsing an osu!mania beatmap.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parses the osu!mania beatmap text into an [`OsuChart`].
///
/// # Errors
///
/// Returns a [`ParseError`] naming the malformed construct when the text is not a well-formed
/// osu!mania beatmap.
pub fn parse_osu(source: &str) -> Result<OsuChart> {
    parse::parse(source)
}
