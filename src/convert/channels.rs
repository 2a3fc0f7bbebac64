//! Grouping of translated notes into bmson sound channels.

use std::collections::HashMap;

use crate::bmson::{Note, SoundChannel};

/// Collects notes per sample name, keeping the channel order of first appearance so re-emission
/// stays deterministic.
#[derive(Debug, Default)]
pub(crate) struct ChannelSet {
    index: HashMap<Option<String>, usize>,
    channels: Vec<(Option<String>, Vec<Note>)>,
}

impl ChannelSet {
    /// Appends `note` to the channel of `sample`. `None` collects into the unnamed default
    /// channel for notes ringing the client's skin keysound.
    pub(crate) fn push(&mut self, sample: Option<&str>, note: Note) {
        let key = sample.map(ToOwned::to_owned);
        let slot = *self.index.entry(key.clone()).or_insert_with(|| {
            self.channels.push((key, Vec::new()));
            self.channels.len() - 1
        });
        self.channels[slot].1.push(note);
    }

    /// Finishes into bmson sound channels: notes stable-sorted by ascending pulse (source order
    /// on ties), empty channels dropped.
    pub(crate) fn into_sound_channels(self) -> Vec<SoundChannel> {
        self.channels
            .into_iter()
            .filter(|(_, notes)| !notes.is_empty())
            .map(|(name, mut notes)| {
                notes.sort_by_key(|note| note.y);
                SoundChannel {
                    name: name.unwrap_or_default(),
                    notes,
                }
            })
            .collect()
    }
}
