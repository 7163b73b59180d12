use std::time::Instant;

/// Work the timeline postpones to a wall-clock deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    ShowIndicator(super::IndicatorKind),
    HideIndicator(super::IndicatorKind),
    StartParagraph(usize),
    FinishRun,
}

#[derive(Debug, Clone)]
struct DeferredEntry {
    due: Instant,
    seq: u64,
    generation: u64,
    action: DeferredAction,
}

/// Deadline-ordered queue of deferred actions tagged with the run generation
/// that scheduled them. Entries with equal deadlines keep scheduling order.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    entries: Vec<DeferredEntry>,
    next_seq: u64,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Instant, generation: u64, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        let pos = self
            .entries
            .partition_point(|entry| (entry.due, entry.seq) <= (due, seq));
        self.entries.insert(
            pos,
            DeferredEntry {
                due,
                seq,
                generation,
                action,
            },
        );
    }

    /// Remove and return every entry due at or before `now`, in firing order,
    /// as `(generation, action)` pairs.
    pub fn drain_due(&mut self, now: Instant) -> Vec<(u64, DeferredAction)> {
        let split = self.entries.partition_point(|entry| entry.due <= now);
        self.entries
            .drain(..split)
            .map(|entry| (entry.generation, entry.action))
            .collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first().map(|entry| entry.due)
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
