//! Pulse definition for the bmson format. A pulse represents only a beat position on the score, so you need to know all previous BPM events to find the happening seconds of a note.

use serde::{Deserialize, Serialize};

/// Note position for the chart [`super::Bmson`], counted in pulses from the origin.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PulseNumber(pub u64);

impl PulseNumber {
    /// The chart origin, pulse zero.
    pub const ZERO: Self = Self(0);

    /// Calculates an absolute difference of two pulses.
    #[must_use]
    pub const fn abs_diff(self, other: Self) -> u64 {
        self.0.abs_diff(other.0)
    }
}

impl From<PulseNumber> for u64 {
    fn from(value: PulseNumber) -> Self {
        value.0
    }
}
