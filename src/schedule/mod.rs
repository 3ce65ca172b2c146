//! Pre-dispatch scheduling of a whole job
//!
//! Slices the job's work items into requests, plans each request with the
//! [`Planner`], and assigns the request's items to the chosen channels. The
//! result is a list of [`RequestPlan`]s for an external dispatcher; nothing
//! here sends requests or reacts to their outcome.

pub mod batch;
pub mod split;

pub use batch::{take_request_batch, Batch, BatchLimits, WorkItem};
pub use split::{split_by_words, ChannelChunk};

use crate::planner::{Planner, ProcessingMode, SelectionResult};
use crate::telemetry::HealthSnapshot;
use serde::Serialize;
use tracing::info;

/// One request to be dispatched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestPlan {
    /// 1-based position in the job
    pub index: usize,
    pub item_count: usize,
    pub words: u64,
    pub selection: SelectionResult,
    pub chunks: Vec<ChannelChunk>,
    /// Item count before the single-channel guard shrank the batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trimmed_from: Option<usize>,
}

/// Turns a queue of work items into request plans.
#[derive(Debug, Clone)]
pub struct Scheduler {
    planner: Planner,
    limits: BatchLimits,
}

impl Scheduler {
    pub fn new(planner: Planner, limits: BatchLimits) -> Self {
        Self { planner, limits }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Plan every request needed to process `items`.
    ///
    /// Deterministic: identical inputs give identical request plans.
    pub fn schedule(
        &self,
        items: &[WorkItem],
        mode: ProcessingMode,
        snapshot: Option<&HealthSnapshot>,
    ) -> Vec<RequestPlan> {
        let mut plans = Vec::new();
        let mut cursor = 0;

        while cursor < items.len() {
            let index = plans.len() + 1;
            let mut batch = take_request_batch(items, cursor, &self.limits);
            let mut selection = self.planner.choose_workers(batch.words as f64, mode, snapshot);
            let mut trimmed_from = None;

            if let Some(trimmed) = self.guard_single_channel(items, batch, &selection, mode) {
                info!(
                    request = index,
                    from = batch.len(),
                    to = trimmed.len(),
                    words = trimmed.words,
                    "Single-channel guard trimmed request"
                );
                trimmed_from = Some(batch.len());
                batch = trimmed;
                selection = self.planner.choose_workers(batch.words as f64, mode, snapshot);
            }

            let chunks = split_by_words(
                batch.items(items),
                &selection.channels,
                self.planner.fallback_channel(),
            );

            plans.push(RequestPlan {
                index,
                item_count: batch.len(),
                words: batch.words,
                selection,
                chunks,
                trimmed_from,
            });
            cursor = batch.end;
        }

        plans
    }

    /// Shrink `batch` when only one channel will carry it and it exceeds what a
    /// lone channel should take in one request. Returns `None` when no trim is
    /// needed. Never shrinks below one item.
    fn guard_single_channel(
        &self,
        items: &[WorkItem],
        batch: Batch,
        selection: &SelectionResult,
        mode: ProcessingMode,
    ) -> Option<Batch> {
        let max_words = mode.profile().max_words_per_channel;
        if selection.worker_count != 1 || batch.len() <= 1 || batch.words <= max_words {
            return None;
        }

        let mut trimmed = batch;
        while trimmed.len() > 1 && trimmed.words > max_words {
            trimmed.end -= 1;
            trimmed.words -= items[trimmed.end].word_count;
        }
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{ChannelId, HealthClass};

    fn items(words: &[u64]) -> Vec<WorkItem> {
        words
            .iter()
            .enumerate()
            .map(|(id, &w)| WorkItem::new(id, w))
            .collect()
    }

    fn scheduler() -> Scheduler {
        Scheduler::new(Planner::default(), BatchLimits::default())
    }

    #[test]
    fn empty_queue_yields_no_requests() {
        assert!(scheduler()
            .schedule(&[], ProcessingMode::Dual, None)
            .is_empty());
    }

    #[test]
    fn every_item_is_scheduled_once_in_order() {
        let queue = items(&[400, 350, 500, 620, 280, 900, 150, 700]);
        let plans = scheduler().schedule(&queue, ProcessingMode::Dual, None);

        let mut seen = Vec::new();
        for plan in &plans {
            let mut request_ids: Vec<usize> = plan
                .chunks
                .iter()
                .flat_map(|c| c.items.iter().map(|i| i.id))
                .collect();
            request_ids.sort_unstable();
            assert_eq!(request_ids.len(), plan.item_count);
            seen.extend(request_ids);
        }
        assert_eq!(seen, (0..queue.len()).collect::<Vec<_>>());
    }

    #[test]
    fn huge_items_keep_their_real_word_counts() {
        let queue = items(&[u64::MAX, 1]);
        let plans = scheduler().schedule(&queue, ProcessingMode::Dual, None);

        assert_eq!(plans.len(), 2);
        assert_eq!((plans[0].item_count, plans[0].words), (1, u64::MAX));
        assert!(plans[0].selection.estimated_seconds > 0.0);
        assert_eq!((plans[1].item_count, plans[1].words), (1, 1));
    }

    #[test]
    fn requests_are_numbered_from_one() {
        let queue = items(&[2000, 2000, 2000]);
        let plans = scheduler().schedule(&queue, ProcessingMode::Standard, None);
        let indexes: Vec<usize> = plans.iter().map(|p| p.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[test]
    fn chunks_use_selected_channels() {
        let queue = items(&[500, 500, 500, 500]);
        let plans = scheduler().schedule(&queue, ProcessingMode::Dual, None);
        let first = &plans[0];
        assert!(first.selection.worker_count > 1);
        for chunk in &first.chunks {
            assert!(first.selection.channels.contains(&chunk.channel));
        }
    }

    #[test]
    fn single_channel_guard_trims_oversized_batch() {
        // Only acc1 is usable, so every request is single-channel and capped
        // at 760 words in dual mode.
        let snapshot = HealthSnapshot::new()
            .with_status("acc2", "busy")
            .with_status("acc3", "busy");
        let queue = items(&[300, 300, 300, 300]);
        let plans = scheduler().schedule(&queue, ProcessingMode::Dual, Some(&snapshot));

        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].item_count, 2);
        assert_eq!(plans[0].words, 600);
        assert_eq!(plans[0].trimmed_from, Some(4));
        assert_eq!(plans[1].item_count, 2);
        assert!(plans[1].trimmed_from.is_none());
        for plan in &plans {
            assert_eq!(plan.selection.channels, vec![ChannelId::new("acc1")]);
        }
    }

    #[test]
    fn guard_never_drops_below_one_item() {
        let snapshot = HealthSnapshot::new()
            .with_health("acc2", HealthClass::Tripped)
            .with_health("acc3", HealthClass::Tripped);
        let queue = items(&[1500, 1500]);
        let limits = BatchLimits {
            max_items_per_request: 80,
            max_words_per_request: 5000,
        };
        let plans = Scheduler::new(Planner::default(), limits).schedule(
            &queue,
            ProcessingMode::Dual,
            Some(&snapshot),
        );

        assert_eq!(plans.len(), 2);
        assert!(plans.iter().all(|p| p.item_count == 1));
        assert_eq!(plans[0].trimmed_from, Some(2));
    }

    #[test]
    fn multi_channel_requests_are_not_trimmed() {
        let queue = items(&[700, 700, 700]);
        let plans = scheduler().schedule(&queue, ProcessingMode::Dual, None);
        assert_eq!(plans.len(), 1);
        assert!(plans[0].trimmed_from.is_none());
        assert_eq!(plans[0].selection.worker_count, 3);
    }

    #[test]
    fn schedule_is_deterministic() {
        let queue = items(&[410, 95, 260, 1200, 33, 640]);
        let snapshot = HealthSnapshot::new()
            .with_health("acc2", HealthClass::Degraded)
            .with_rolling(0.9, 0.05);
        let a = scheduler().schedule(&queue, ProcessingMode::Ludicrous, Some(&snapshot));
        let b = scheduler().schedule(&queue, ProcessingMode::Ludicrous, Some(&snapshot));
        assert_eq!(a, b);
    }
}
