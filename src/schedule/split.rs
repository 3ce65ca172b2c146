//! Word-balanced assignment of a batch to the selected channels

use super::batch::WorkItem;
use crate::planner::ChannelId;
use serde::Serialize;

/// Items assigned to one channel within a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelChunk {
    pub channel: ChannelId,
    pub items: Vec<WorkItem>,
    pub words: u64,
}

/// Spread `items` across `channels`, balancing by words rather than item count.
///
/// Each item goes to the channel with the fewest words so far; ties go to the
/// channel with fewer items, then to the earlier channel. Channels that end up
/// with nothing are omitted. With no channels everything goes to `fallback`.
pub fn split_by_words(
    items: &[WorkItem],
    channels: &[ChannelId],
    fallback: &ChannelId,
) -> Vec<ChannelChunk> {
    let targets: Vec<ChannelId> = if channels.is_empty() {
        vec![fallback.clone()]
    } else {
        channels.to_vec()
    };

    let mut chunks: Vec<ChannelChunk> = targets
        .into_iter()
        .map(|channel| ChannelChunk {
            channel,
            items: Vec::new(),
            words: 0,
        })
        .collect();

    for item in items {
        // min_by_key keeps the first of equal keys, so channel order breaks ties
        if let Some(target) = chunks
            .iter_mut()
            .min_by_key(|chunk| (chunk.words, chunk.items.len()))
        {
            target.items.push(*item);
            target.words = target.words.saturating_add(item.word_count);
        }
    }

    chunks.retain(|chunk| !chunk.items.is_empty());
    chunks
}
