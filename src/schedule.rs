//! Deferred one-shot tasks on a virtual clock.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

struct Entry<T> {
    due: f64,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.total_cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

/// A queue of tasks, each due at a time on some external clock.
///
/// Nothing here reads a clock: callers pass `now`, so the same queue runs
/// against the engine clock in production and a hand-set value in tests.
/// Tasks come out in due-time order; tasks due at the same time come out in
/// the order they were scheduled.
pub struct TaskQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: f64, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { due, seq, task }));
    }

    /// Remove and return the earliest task if it is due at `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<T> {
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.due <= now => self.heap.pop().map(|Reverse(e)| e.task),
            _ => None,
        }
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(entry)| entry.due)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
