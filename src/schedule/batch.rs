//! Slicing a queue of work items into request-sized batches

use serde::{Deserialize, Serialize};

/// One unit of text work, e.g. a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Caller-assigned identifier, carried through unchanged
    pub id: usize,
    pub word_count: u64,
}

impl WorkItem {
    pub fn new(id: usize, word_count: u64) -> Self {
        Self { id, word_count }
    }
}

/// Size limits for a single dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub max_items_per_request: usize,
    pub max_words_per_request: u64,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_items_per_request: 80,
            max_words_per_request: 2200,
        }
    }
}

/// A contiguous slice of the item queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub start: usize,
    /// Exclusive end; also the cursor for the next batch
    pub end: usize,
    pub words: u64,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn items<'a>(&self, items: &'a [WorkItem]) -> &'a [WorkItem] {
        &items[self.start..self.end]
    }
}

/// Take the next batch starting at `cursor`.
///
/// Items are added while the batch is under the item limit and the next item
/// still fits the word limit. A single item larger than the word limit is
/// still taken on its own so the queue always advances.
pub fn take_request_batch(items: &[WorkItem], cursor: usize, limits: &BatchLimits) -> Batch {
    let start = cursor.min(items.len());
    let max_items = limits.max_items_per_request.max(1);
    let mut end = start;
    let mut words = 0u64;

    while end < items.len() && end - start < max_items {
        let next = items[end].word_count;
        if end > start {
            match words.checked_add(next) {
                Some(total) if total <= limits.max_words_per_request => words = total,
                _ => break,
            }
        } else {
            words = next;
        }
        end += 1;
    }

    Batch { start, end, words }
}
