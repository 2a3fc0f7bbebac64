#![cfg_attr(docsrs, feature(doc_cfg))]

//! Converter from osu!mania beatmaps (.osu) into the
//! [bmson format](https://bmson-spec.readthedocs.io/en/master/doc/index.html).
//!
//! The conversion is a pipeline of pure stages:
//!
//! 1. [`osu`] parses the beatmap text into an [`osu::OsuChart`],
//! 2. [`timeline`] merges its BPM and scroll velocity timing points into one millisecond-to-pulse
//!    [`timeline::Timeline`],
//! 3. [`convert`] translates every note and timing point into bmson entities and assembles the
//!    [`bmson::Bmson`] document.
//!
//! osu!mania timing is continuous milliseconds with scroll velocity multipliers layered on top of
//! BPM; bmson timing is discrete pulses at a fixed resolution. The timeline interpolates and the
//! translator rounds once per event, so the output never drifts against the audio track. Scroll
//! velocity only becomes `scroll_events` and never moves a note.
//!
//! Degenerate chart data that survives rounding (like a hold collapsing to zero pulses) is
//! clamped and reported in [`ConvertOutput::warnings`]; only a malformed file or a chart without
//! any BPM basis aborts the conversion.
//!
//! ```
//! use mania_bmson::{ConvertConfig, convert_mania};
//!
//! let source = "\
//! osu file format v14
//!
//! [General]
//! AudioFilename: song.mp3
//! Mode: 3
//!
//! [Metadata]
//! Title: Sample
//! Artist: Somebody
//!
//! [Difficulty]
//! CircleSize: 7
//!
//! [TimingPoints]
//! 0,500,4,2,0,100,1,0
//!
//! [HitObjects]
//! 256,192,1000,1,0,0:0:0:0:
//! ";
//! let output = convert_mania(source, &ConvertConfig::default()).expect("valid chart");
//! assert_eq!(output.bmson.info.title, "Sample");
//! assert_eq!(output.bmson.info.init_bpm.as_f64(), 120.0);
//! assert!(output.warnings.is_empty());
//! ```

pub mod bmson;
pub mod convert;
#[cfg(feature = "diagnostics")]
#[cfg_attr(docsrs, doc(cfg(feature = "diagnostics")))]
pub mod diagnostics;
pub mod osu;
pub mod timeline;

pub use self::{
    convert::{
        ConvertConfig, ConvertError, ConvertOutput, TranslationWarning, chart_to_bmson,
        convert_mania, to_json, write_bmson,
    },
    osu::{ParseError, parse_osu},
    timeline::{Timeline, TimingError},
};
