//! Time base resolution for a parsed chart.
//!
//! osu!mania expresses timing in continuous milliseconds with scroll velocity multipliers layered
//! on top of BPM, while bmson expresses timing in discrete pulses at a fixed resolution. This
//! module merges the two interleaved timing point streams into one ordered [`Timeline`] of
//! breakpoints and answers point-in-time queries [`Timeline::pulse_at`] by linear interpolation.
//!
//! The scroll multiplier never advances pulses. Only the active BPM does: over an interval the
//! pulse gain is `resolution * bpm / 60000` per millisecond. Scroll rates are carried on the
//! breakpoints purely so the translator can re-emit them as `scroll_events`.

use thiserror::Error;

use crate::osu::model::{TimingPoint, TimingPointKind};

/// An error occurred when building the time base.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum TimingError {
    /// The chart has no uninherited timing point, so no BPM basis exists.
    #[error("chart has no BPM-defining timing point")]
    NoBpmBasis,
}

/// One resolved point of the merged timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Onset of this breakpoint in milliseconds.
    pub time_ms: f64,
    /// Cumulative pulse position at `time_ms`.
    pub pulse: f64,
    /// BPM active from this breakpoint forward.
    pub bpm: f64,
    /// Scroll rate active from this breakpoint forward.
    pub scroll_rate: f64,
}

/// Monotonic mapping from millisecond time to pulse position.
///
/// The first BPM is extended backward to the chart origin, so queries before the first timing
/// point extrapolate with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    breakpoints: Vec<Breakpoint>,
    resolution: u32,
}

impl Timeline {
    /// Builds the timeline from timing points sorted ascending by time (stable, so coincident
    /// points keep source order and the later declaration wins).
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::NoBpmBasis`] when `points` contains no uninherited point.
    pub fn from_timing_points(points: &[TimingPoint], resolution: u32) -> Result<Self, TimingError> {
        let initial_bpm = points
            .iter()
            .find_map(TimingPoint::bpm)
            .ok_or(TimingError::NoBpmBasis)?;

        // Anchor pulse 0 at time 0; a chart starting before the origin gets negative pulses
        // there, which the translator clamps when rounding.
        let start_ms = points
            .first()
            .map_or(0.0, |point| point.time_ms.min(0.0));
        let mut current = Breakpoint {
            time_ms: start_ms,
            pulse: pulses_per_ms(initial_bpm, resolution) * start_ms,
            bpm: initial_bpm,
            scroll_rate: 1.0,
        };
        let mut breakpoints = vec![current];

        for point in points {
            let advanced =
                current.pulse + pulses_per_ms(current.bpm, resolution) * (point.time_ms - current.time_ms);
            current = match point.kind {
                TimingPointKind::Uninherited { beat_length_ms } => Breakpoint {
                    time_ms: point.time_ms,
                    pulse: advanced,
                    bpm: 60000.0 / beat_length_ms,
                    scroll_rate: current.scroll_rate,
                },
                TimingPointKind::Inherited {
                    velocity_multiplier,
                } => Breakpoint {
                    time_ms: point.time_ms,
                    pulse: advanced,
                    bpm: current.bpm,
                    scroll_rate: velocity_multiplier,
                },
            };
            breakpoints.push(current);
        }

        Ok(Self {
            breakpoints,
            resolution,
        })
    }

    /// Pulses per quarter note of this timeline.
    #[must_use]
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// The BPM active at the chart origin.
    #[must_use]
    pub fn initial_bpm(&self) -> f64 {
        self.breakpoints.first().map_or(0.0, |point| point.bpm)
    }

    /// The resolved breakpoints, ascending by time.
    #[must_use]
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Converts a millisecond position into a fractional pulse position.
    ///
    /// The containing breakpoint interval is the last breakpoint at or before `time_ms`; on
    /// coincident breakpoints the one later in source order wins. Queries outside of the covered
    /// span extrapolate with the edge BPM.
    #[must_use]
    pub fn pulse_at(&self, time_ms: f64) -> f64 {
        let index = self
            .breakpoints
            .partition_point(|point| point.time_ms <= time_ms);
        let base = &self.breakpoints[index.saturating_sub(1)];
        base.pulse + pulses_per_ms(base.bpm, self.resolution) * (time_ms - base.time_ms)
    }

    /// The scroll rate active at a millisecond position.
    #[must_use]
    pub fn scroll_rate_at(&self, time_ms: f64) -> f64 {
        let index = self
            .breakpoints
            .partition_point(|point| point.time_ms <= time_ms);
        self.breakpoints[index.saturating_sub(1)].scroll_rate
    }
}

fn pulses_per_ms(bpm: f64, resolution: u32) -> f64 {
    f64::from(resolution) * bpm / 60000.0
}
