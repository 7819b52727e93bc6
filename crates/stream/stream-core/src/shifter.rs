//! Inference shifting.
//!
//! A model asked to predict `h` steps ahead emits, at record `n`, a
//! value that describes record `n + h`. The shifter buffers those
//! predictions and pairs each one with the record it actually
//! describes, so observers compare like with like.

use std::collections::{BTreeMap, VecDeque};

use stream_spi::{InferenceResult, Record, ShiftedResult};

/// A prediction waiting for its horizon to elapse.
#[derive(Debug, Clone, Copy)]
struct PendingPrediction {
    /// Record counter value at which this prediction becomes comparable.
    due_at: u64,
    value: f64,
}

/// Realigns multi-step-ahead predictions with the record they pertain to.
///
/// For a primary horizon of `h`, exactly the first `h` outputs are
/// emitted unshifted (`aligned == false`): no prediction about them
/// exists yet. Every later output pairs the current record's actual
/// value with the prediction made `h` records earlier.
#[derive(Debug)]
pub struct InferenceShifter {
    primary_horizon: usize,
    /// Records processed so far; index of the current record.
    counter: u64,
    /// Per-horizon FIFO of pending predictions, each capped at the
    /// horizon length.
    pending: BTreeMap<usize, VecDeque<PendingPrediction>>,
}

impl InferenceShifter {
    pub fn new(primary_horizon: usize) -> Self {
        Self {
            primary_horizon,
            counter: 0,
            pending: BTreeMap::new(),
        }
    }

    pub fn primary_horizon(&self) -> usize {
        self.primary_horizon
    }

    /// Number of records processed so far.
    pub fn records_seen(&self) -> u64 {
        self.counter
    }

    /// Realign `result` (produced for `record`) with the prediction
    /// made about `record` on an earlier call, if one is due.
    pub fn shift(&mut self, record: &Record, result: &InferenceResult) -> ShiftedResult {
        let n = self.counter;

        // Dequeue first: the prediction due for this record was
        // enqueued on an earlier call and sits at the front.
        let due = self
            .pending
            .get_mut(&self.primary_horizon)
            .and_then(|queue| match queue.front() {
                Some(p) if p.due_at == n => queue.pop_front(),
                _ => None,
            });

        for (&horizon, &value) in &result.predictions {
            let queue = self.pending.entry(horizon).or_default();
            // One outstanding prediction per step of the horizon;
            // overwrite the oldest rather than grow unbounded.
            while queue.len() >= horizon.max(1) {
                queue.pop_front();
            }
            queue.push_back(PendingPrediction {
                due_at: n + horizon as u64,
                value,
            });
        }

        self.counter += 1;

        match due {
            Some(pending) => ShiftedResult::aligned(record, pending.value, result.anomaly_score),
            None => {
                // Cold start: emit the raw prediction, unaligned.
                let raw = result
                    .prediction(self.primary_horizon)
                    .unwrap_or(record.target);
                ShiftedResult::unaligned(record, raw, result.anomaly_score)
            }
        }
    }
}
