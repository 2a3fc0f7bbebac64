//! Fixed column-to-lane remapping for the target client key layouts.
//!
//! osu!mania counts columns `0..key_count` from the left, while bmson lanes are 1-based and the
//! beat layouts put the scratch on lane 8 (and 16 for the second player side). Charts whose key
//! count matches a beat layout with scratch treat their leftmost column per side as the scratch.

use std::num::NonZeroU8;

/// Maps a 0-based mania column to a 1-based bmson lane.
#[must_use]
pub fn lane_for_column(column: u8, key_count: u8) -> NonZeroU8 {
    let lane = match (key_count, column) {
        // 7 keys + scratch: column 0 is the turntable.
        (8, 0) => 8,
        (8, _) => column,
        // Double play, 8 columns per side.
        (16, 0) => 8,
        (16, 8) => 16,
        // Right side: columns 9..=15 are already the lane numbers.
        (16, _) => column,
        _ => column + 1,
    };
    NonZeroU8::new(lane).unwrap_or(NonZeroU8::MIN)
}

/// The `info.mode_hint` value describing the lane layout of a chart.
#[must_use]
pub fn mode_hint(key_count: u8) -> String {
    match key_count {
        5 => "beat-5k".into(),
        7 | 8 => "beat-7k".into(),
        16 => "beat-14k".into(),
        keys => format!("generic-{keys}keys"),
    }
}
