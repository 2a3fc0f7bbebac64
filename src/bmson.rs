//! The [bmson format](https://bmson-spec.readthedocs.io/en/master/doc/index.html) document model.
//!
//! This module defines the subset of bmson that the osu!mania conversion populates, plus the
//! `scroll_events` extension consumed by beatoraja-family clients. All positions are expressed in
//! [`PulseNumber`]s at `info.resolution` pulses per quarter note.
//!
//! # Order of Processing
//!
//! When there are coincident events on the same pulse, clients process them in the order below:
//!
//! - [`Note`] and [`BgaEvent`] (are independent of each other),
//! - [`BpmEvent`],
//! - [`ScrollEvent`].
//!
//! Coincident events inside one stream keep their emission order, so the last declaration wins for
//! BPM while every scroll rate change is applied in succession.

use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};

use self::{fin_f64::FinF64, pulse::PulseNumber};

pub mod fin_f64;
pub mod pulse;

/// Top-level object for the bmson format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bmson {
    /// Version of bmson format, which should be compared using [Semantic Version 2.0.0](http://semver.org/spec/v2.0.0.html).
    pub version: String,
    /// Score metadata.
    pub info: BmsonInfo,
    /// Location of bar lines in pulses. If `None`, a 4/4 beat is assumed and bar lines are
    /// generated every 4 quarter notes. If `Some(vec![])`, this chart has no bar line.
    pub lines: Option<Vec<BarLine>>,
    /// Events of BPM change. If there are coincident events, only the successor is applied.
    #[serde(default)]
    pub bpm_events: Vec<BpmEvent>,
    /// Events of scroll speed change. Scroll speed affects only how fast the chart flows by; it
    /// never moves a note in time.
    #[serde(default)]
    pub scroll_events: Vec<ScrollEvent>,
    /// Note data, grouped by the sound file they ring.
    pub sound_channels: Vec<SoundChannel>,
    /// BGA data.
    #[serde(default)]
    pub bga: Bga,
}

/// Header metadata of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmsonInfo {
    /// Self explanatory title.
    pub title: String,
    /// Self explanatory subtitle. Usually shown as a smaller text than `title`.
    #[serde(default)]
    pub subtitle: String,
    /// Author of the chart.
    pub artist: String,
    /// Other authors of the chart, as `key:value` entries such as `obj:somebody`.
    #[serde(default)]
    pub subartists: Vec<String>,
    /// Self explanatory genre.
    pub genre: String,
    /// Hint for laying out lanes, e.g. `"beat-7k"`, `"generic-9keys"`. Defaults to `"beat-7k"`.
    #[serde(default = "default_mode_hint")]
    pub mode_hint: String,
    /// Special chart name, e.g. "BEGINNER", "HYPER".
    #[serde(default)]
    pub chart_name: String,
    /// Self explanatory level number, usually a subjective rating by the author.
    pub level: u32,
    /// Initial BPM.
    pub init_bpm: FinF64,
    /// Relative judge width in percentage. Larger is easier.
    #[serde(default = "default_percentage")]
    pub judge_rank: FinF64,
    /// Relative life bar gain in percentage. Larger is easier.
    #[serde(default = "default_percentage")]
    pub total: FinF64,
    /// Background image file name, displayed during the game play.
    pub back_image: Option<String>,
    /// Eyecatch image file name, displayed while the chart is loading.
    pub eyecatch_image: Option<String>,
    /// Preview music file name, played when this chart is selected in a music select scene.
    pub preview_music: Option<String>,
    /// Number of pulses per quarter note in a 4/4 measure. You must check this because it affects
    /// the actual seconds of every [`PulseNumber`] in the document.
    #[serde(default = "default_resolution")]
    pub resolution: u32,
}

/// Default mode hint, beatmania 7 keys.
#[must_use]
pub fn default_mode_hint() -> String {
    "beat-7k".into()
}

/// Default relative percentage, 100%.
#[must_use]
pub fn default_percentage() -> FinF64 {
    FinF64::new(100.0).expect("100.0 is finite")
}

/// Default resolution, 240 pulses per quarter note in a 4/4 measure.
#[must_use]
pub const fn default_resolution() -> u32 {
    240
}

/// Event of bar line of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarLine {
    /// Pulse number to place the line.
    pub y: PulseNumber,
}

/// Note sound file and positions to be placed in the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundChannel {
    /// Sound file path. If the extension is not supported by a client, it may search other
    /// extensions of the same stem for fallback.
    pub name: String,
    /// Data of notes to be placed.
    pub notes: Vec<Note>,
}

/// Sound note to ring a sound file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Lane information. The `Some` number represents the key to play, otherwise it is a
    /// non-playable (BGM) note.
    pub x: Option<NonZeroU8>,
    /// Position to be placed.
    pub y: PulseNumber,
    /// Length of the note in pulses. It will be a normal note if zero, otherwise a long note.
    pub l: u32,
    /// Continuation flag. The sound continues ringing the rest of the file from the previous note
    /// if `true`, otherwise it plays from its start.
    pub c: bool,
    /// Key-up flag. The note must be actuated by releasing the key if `true`.
    #[serde(default)]
    pub up: bool,
}

/// BPM change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BpmEvent {
    /// Position to change BPM of the chart.
    pub y: PulseNumber,
    /// New BPM to be.
    pub bpm: FinF64,
}

/// Scroll speed change event. A rate of `1.0` is the plain speed derived from the current BPM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollEvent {
    /// Position to change the scroll speed.
    pub y: PulseNumber,
    /// New scroll speed rate to be.
    pub rate: FinF64,
}

/// BGA data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bga {
    /// Picture files for playing BGA.
    pub bga_header: Vec<BgaHeader>,
    /// Base picture sequence.
    pub bga_events: Vec<BgaEvent>,
    /// Layered picture sequence.
    pub layer_events: Vec<BgaEvent>,
    /// Picture sequence displayed on a miss.
    pub poor_events: Vec<BgaEvent>,
}

/// Picture file information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgaHeader {
    /// Self explanatory ID of picture.
    pub id: BgaId,
    /// Picture file name.
    pub name: String,
}

/// BGA note to display the picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgaEvent {
    /// Position to display the picture in pulses.
    pub y: PulseNumber,
    /// ID of picture to display.
    pub id: BgaId,
}

/// Picture id for [`Bga`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BgaId(pub u32);
