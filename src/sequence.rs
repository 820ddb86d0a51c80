use std::collections::BTreeMap;

use crate::frames::Frame;

/// A named run of animation frames, in playback order.
#[derive(Debug, Clone)]
pub(crate) struct Sequence {
    pub name: String,
    pub frames: Vec<Frame>,
}

/// Groups frames into sequences.
///
/// Sequences come out sorted by name, comparing bytes. Frames within a
/// sequence are sorted by frame number; frames sharing a number keep the order
/// they were discovered in.
pub(crate) fn group_frames(frames: Vec<Frame>) -> Vec<Sequence> {
    let mut groups: BTreeMap<String, Vec<Frame>> = BTreeMap::new();

    for frame in frames {
        groups.entry(frame.sequence.clone()).or_default().push(frame);
    }

    groups
        .into_iter()
        .map(|(name, mut frames)| {
            frames.sort_by_key(|frame| frame.number);
            Sequence { name, frames }
        })
        .collect()
}
