//! Semantic objects of a parsed osu!mania beatmap.

/// A fully parsed osu!mania beatmap. Immutable once produced by [`super::parse_osu`].
#[derive(Debug, Clone, PartialEq)]
pub struct OsuChart {
    /// Chart metadata gathered from the key-value sections.
    pub metadata: OsuMetadata,
    /// Timing points, sorted ascending by time. The sort is stable, so coincident points keep
    /// their source order and the later declaration overrides.
    pub timing_points: Vec<TimingPoint>,
    /// Hit objects, sorted ascending by time with a stable sort.
    pub hit_objects: Vec<HitObject>,
}

/// Metadata of an osu!mania beatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct OsuMetadata {
    /// Version of the `osu file format` header line.
    pub format_version: u32,
    /// Title of the music, preferring the unicode variant.
    pub title: String,
    /// Artist of the music, preferring the unicode variant.
    pub artist: String,
    /// Author of the chart.
    pub creator: String,
    /// Difficulty name of this chart, e.g. "Easy", "4K Insane".
    pub version: String,
    /// Main audio track file name. May be empty or `virtual` for fully keysounded charts.
    pub audio_filename: String,
    /// Milliseconds of silence before the audio track starts.
    pub audio_lead_in_ms: f64,
    /// Number of mania columns, from the `CircleSize` difficulty setting.
    pub key_count: u8,
    /// Background image file name from the `[Events]` section, if any.
    pub background: Option<String>,
}

/// One timing point of the chart.
///
/// The source format overloads a single `beatLength` field: a positive value defines the BPM
/// while a negative value encodes a scroll velocity multiplier. The overload is resolved once at
/// parse time into [`TimingPointKind`] so downstream stages never re-interpret it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingPoint {
    /// Onset of this point in milliseconds.
    pub time_ms: f64,
    /// What this point changes.
    pub kind: TimingPointKind,
}

/// Distinction of the two timing point variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimingPointKind {
    /// Defines the BPM from this point forward.
    Uninherited {
        /// Milliseconds per beat. BPM is `60000 / beat_length_ms`.
        beat_length_ms: f64,
    },
    /// Changes the visual scroll speed without altering note timing.
    Inherited {
        /// Multiplier of the scroll speed derived from the active BPM.
        velocity_multiplier: f64,
    },
}

impl TimingPoint {
    /// The BPM this point sets, or `None` for an inherited point.
    #[must_use]
    pub fn bpm(&self) -> Option<f64> {
        match self.kind {
            TimingPointKind::Uninherited { beat_length_ms } => Some(60000.0 / beat_length_ms),
            TimingPointKind::Inherited { .. } => None,
        }
    }
}

/// One note of the chart, bound to a column.
#[derive(Debug, Clone, PartialEq)]
pub struct HitObject {
    /// Onset of the note in milliseconds.
    pub time_ms: f64,
    /// Column index the note belongs to, `0..key_count`.
    pub column: u8,
    /// Kind of the note.
    pub kind: HitObjectKind,
    /// Custom hit sample file name. `None` rings the default keysound of the client skin.
    pub sample: Option<String>,
}

/// Kind of a [`HitObject`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitObjectKind {
    /// A tap note.
    Tap,
    /// A hold note spanning until `end_ms`.
    Hold {
        /// Release time of the hold in milliseconds.
        end_ms: f64,
    },
}

impl HitObject {
    /// End time of the object, which equals the onset for a tap note.
    #[must_use]
    pub const fn end_ms(&self) -> f64 {
        match self.kind {
            HitObjectKind::Tap => self.time_ms,
            HitObjectKind::Hold { end_ms } => end_ms,
        }
    }
}
