//! Conversion of a parsed osu!mania chart into a bmson document.
//!
//! [`OsuChart`] == [`chart_to_bmson`] ==> [`Bmson`] (in [`ConvertOutput`])
//!
//! The translation resolves every hit object and timing point through the [`Timeline`], remaps
//! columns to client lanes and groups notes into sound channels. Degenerate data (a hold rounding
//! to zero pulses, an event before the origin) is clamped and surfaced as a
//! [`TranslationWarning`] instead of aborting, because the source format's millisecond resolution
//! is coarser than bmson pulses.

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    bmson::{
        BarLine, Bga, BgaEvent, BgaHeader, BgaId, Bmson, BmsonInfo, BpmEvent, Note, ScrollEvent,
        SoundChannel, default_percentage, default_resolution,
        fin_f64::FinF64,
        pulse::PulseNumber,
    },
    osu::{
        ParseError, parse_osu,
        model::{HitObjectKind, OsuChart, TimingPoint, TimingPointKind},
    },
    timeline::{Timeline, TimingError},
};

use self::channels::ChannelSet;

mod channels;
pub mod lane;
pub mod output;

pub use self::output::{WriteError, to_json, write_bmson};

/// Genre tag stamped on every converted chart.
const CONVERTED_GENRE: &str = "O!M Converted";
/// Audio filename marking a fully keysounded chart without a main track.
const VIRTUAL_AUDIO: &str = "virtual";

/// Configuration of one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertConfig {
    /// Milliseconds added to the time of every note and timing event. Positive values delay notes
    /// relative to the audio track, compensating a client's audio decoder latency.
    pub offset_ms: f64,
    /// Pulses per quarter note of the output document.
    pub resolution: u32,
    /// Pads the chart so the first BPM point lands on a beat boundary, keeping bar lines aligned
    /// on charts whose audio starts mid-beat.
    pub align_first_beat: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            offset_ms: 0.0,
            resolution: default_resolution(),
            align_first_beat: false,
        }
    }
}

/// A fatal error occurred when converting a chart. No output document exists afterwards.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// The source chart was malformed.
    #[error("parse: {0}")]
    Parse(#[from] ParseError),
    /// The chart carried no usable time base.
    #[error("timing: {0}")]
    Timing(#[from] TimingError),
    /// A timing value did not resolve to a finite number.
    #[error("timing event at {time_ms} ms is not a finite number")]
    NonFiniteEvent {
        /// Millisecond position of the offending event.
        time_ms: f64,
    },
}

/// A recoverable anomaly found while translating notes and events. The offending entity is
/// clamped to a safe value and the conversion continues.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslationWarning {
    /// A hold whose start and end round to the same pulse, emitted with the minimum length of 1.
    #[error("hold at {time_ms} ms in column {column} rounds to a non-positive length, clamped to 1 pulse")]
    DegenerateHold {
        /// Onset of the hold in milliseconds.
        time_ms: f64,
        /// Column of the hold.
        column: u8,
    },
    /// An event resolving to a pulse before the origin, clamped to pulse 0.
    #[error("event at {time_ms} ms resolves to a negative pulse, clamped to 0")]
    NegativePulse {
        /// Millisecond position of the event.
        time_ms: f64,
    },
}

/// Output of converting an osu!mania chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOutput {
    /// The converted document.
    pub bmson: Bmson,
    /// Anomalies clamped during translation.
    pub warnings: Vec<TranslationWarning>,
}

/// Parses `source` as an osu!mania beatmap and converts it into a bmson document.
///
/// # Errors
///
/// Returns a [`ConvertError`] when the source is malformed or carries no BPM basis. No partial
/// document is produced on failure.
///
/// # Example
///
/// ```
/// use mania_bmson::{ConvertConfig, convert_mania};
///
/// let source = "osu file format v14\n\n[General]\nAudioFilename: song.mp3\nMode: 3\n\n[Difficulty]\nCircleSize: 4\n\n[TimingPoints]\n0,500,4,2,0,100,1,0\n\n[HitObjects]\n64,192,1000,1,0,0:0:0:0:\n";
/// let output = convert_mania(source, &ConvertConfig::default()).expect("valid chart");
/// // 120 BPM at resolution 240 advances 0.48 pulses per millisecond.
/// assert_eq!(output.bmson.sound_channels[0].notes[0].y.0, 480);
/// ```
pub fn convert_mania(source: &str, config: &ConvertConfig) -> Result<ConvertOutput, ConvertError> {
    let chart = parse_osu(source)?;
    chart_to_bmson(&chart, config)
}

/// Converts an already parsed chart into a bmson document.
///
/// # Errors
///
/// Returns a [`ConvertError`] when the chart carries no BPM basis or a timing value does not
/// resolve to a finite number.
pub fn chart_to_bmson(
    chart: &OsuChart,
    config: &ConvertConfig,
) -> Result<ConvertOutput, ConvertError> {
    let timeline = Timeline::from_timing_points(&chart.timing_points, config.resolution)?;
    let align_shift_ms = if config.align_first_beat {
        first_beat_shift(&chart.timing_points)
    } else {
        0.0
    };
    debug!(
        title = %chart.metadata.title,
        offset_ms = config.offset_ms,
        align_shift_ms,
        "converting chart"
    );

    let mut translator = Translator {
        timeline: &timeline,
        offset_ms: config.offset_ms + align_shift_ms,
        warnings: Vec::new(),
    };

    let key_count = chart.metadata.key_count;
    let mut channel_set = ChannelSet::default();
    let mut last_pulse = PulseNumber::ZERO;
    for object in &chart.hit_objects {
        let y = translator.pulse_at(object.time_ms);
        let l = match object.kind {
            HitObjectKind::Tap => 0,
            HitObjectKind::Hold { end_ms } => {
                translator.hold_length(object.time_ms, end_ms, object.column)
            }
        };
        last_pulse = last_pulse.max(y);
        channel_set.push(
            object.sample.as_deref(),
            Note {
                x: Some(lane::lane_for_column(object.column, key_count)),
                y,
                l,
                c: false,
                up: false,
            },
        );
    }

    let mut bpm_events = Vec::new();
    let mut scroll_events = Vec::new();
    for point in &chart.timing_points {
        let y = translator.pulse_at(point.time_ms);
        match point.kind {
            TimingPointKind::Uninherited { beat_length_ms } => bpm_events.push(BpmEvent {
                y,
                bpm: finite(60000.0 / beat_length_ms, point.time_ms)?,
            }),
            TimingPointKind::Inherited {
                velocity_multiplier,
            } => scroll_events.push(ScrollEvent {
                y,
                rate: finite(velocity_multiplier, point.time_ms)?,
            }),
        }
    }

    let mut sound_channels = channel_set.into_sound_channels();
    let audio = chart.metadata.audio_filename.as_str();
    let has_audio_track = !audio.is_empty() && audio != VIRTUAL_AUDIO;
    if has_audio_track {
        // The main track is not offset-shifted; that is what makes a positive offset delay notes
        // relative to the audio.
        let start_ms = align_shift_ms + chart.metadata.audio_lead_in_ms;
        let y = PulseNumber(timeline.pulse_at(start_ms).round().max(0.0) as u64);
        sound_channels.push(SoundChannel {
            name: audio.into(),
            notes: vec![Note {
                x: None,
                y,
                l: 0,
                c: true,
                up: false,
            }],
        });
    }

    let measure_pulses = u64::from(config.resolution) * 4;
    let lines = itertools::iterate(0, |y| y + measure_pulses)
        .take_while(|&y| y < last_pulse.0)
        .map(|y| BarLine { y: PulseNumber(y) })
        .collect();

    let metadata = &chart.metadata;
    let info = BmsonInfo {
        title: metadata.title.clone(),
        subtitle: metadata.version.clone(),
        artist: metadata.artist.clone(),
        subartists: if metadata.creator.is_empty() {
            vec![]
        } else {
            vec![format!("obj:{}", metadata.creator)]
        },
        genre: CONVERTED_GENRE.into(),
        mode_hint: lane::mode_hint(key_count),
        chart_name: String::new(),
        level: 0,
        init_bpm: finite(timeline.initial_bpm(), 0.0)?,
        judge_rank: default_percentage(),
        total: default_percentage(),
        back_image: metadata.background.clone(),
        eyecatch_image: metadata.background.clone(),
        preview_music: has_audio_track.then(|| audio.into()),
        resolution: config.resolution,
    };

    let bga = metadata.background.as_ref().map_or_else(Bga::default, |name| Bga {
        bga_header: vec![BgaHeader {
            id: BgaId(0),
            name: name.clone(),
        }],
        bga_events: vec![BgaEvent {
            y: PulseNumber::ZERO,
            id: BgaId(0),
        }],
        layer_events: vec![],
        poor_events: vec![],
    });

    Ok(ConvertOutput {
        bmson: Bmson {
            version: "1.0.0".into(),
            info,
            lines: Some(lines),
            bpm_events,
            scroll_events,
            sound_channels,
            bga,
        },
        warnings: translator.warnings,
    })
}

/// Resolves millisecond positions into rounded pulses, clamping and recording anomalies.
struct Translator<'a> {
    timeline: &'a Timeline,
    offset_ms: f64,
    warnings: Vec<TranslationWarning>,
}

impl Translator<'_> {
    fn signed_pulse(&self, time_ms: f64) -> i64 {
        self.timeline.pulse_at(time_ms + self.offset_ms).round() as i64
    }

    fn pulse_at(&mut self, time_ms: f64) -> PulseNumber {
        let signed = self.signed_pulse(time_ms);
        if signed < 0 {
            warn!(time_ms, pulse = signed, "event before the origin, clamped to pulse 0");
            self.warnings
                .push(TranslationWarning::NegativePulse { time_ms });
            PulseNumber::ZERO
        } else {
            PulseNumber(signed as u64)
        }
    }

    fn hold_length(&mut self, start_ms: f64, end_ms: f64, column: u8) -> u32 {
        let length = self.signed_pulse(end_ms) - self.signed_pulse(start_ms);
        if length <= 0 {
            warn!(
                start_ms,
                end_ms, column, "hold rounds to a non-positive length, clamped to 1 pulse"
            );
            self.warnings.push(TranslationWarning::DegenerateHold {
                time_ms: start_ms,
                column,
            });
            1
        } else {
            length as u32
        }
    }
}

fn finite(value: f64, time_ms: f64) -> Result<FinF64, ConvertError> {
    FinF64::new(value).ok_or(ConvertError::NonFiniteEvent { time_ms })
}

/// Milliseconds of padding that moves the first BPM point onto a beat boundary.
fn first_beat_shift(points: &[TimingPoint]) -> f64 {
    points
        .iter()
        .find_map(|point| match point.kind {
            TimingPointKind::Uninherited { beat_length_ms } => {
                Some((beat_length_ms - point.time_ms.rem_euclid(beat_length_ms)).rem_euclid(beat_length_ms))
            }
            TimingPointKind::Inherited { .. } => None,
        })
        .unwrap_or(0.0)
}
