//! Cooperative one-shot timers on a caller-supplied clock.
//!
//! Nothing here sleeps. The embedder asks for [`TimerQueue::next_deadline`], waits however its
//! event loop waits, and then drains due timers with [`TimerQueue::pop_due`].

use slab::Slab;
use std::time::Duration;

/// Handle to a scheduled timer. Stays invalid after the timer fires or is cancelled, even if
/// its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    key: usize,
    seq: u64,
}

#[derive(Debug)]
struct Entry<T> {
    deadline: Duration,
    seq: u64,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: Slab<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Slab::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, deadline: Duration, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let key = self.entries.insert(Entry {
            deadline,
            seq,
            payload,
        });
        TimerId { key, seq }
    }

    /// Cancels a pending timer, returning its payload. A no-op for timers that already fired.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        if !self.is_pending(id) {
            return None;
        }
        Some(self.entries.remove(id.key).payload)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries
            .get(id.key)
            .is_some_and(|entry| entry.seq == id.seq)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|(_, entry)| entry.deadline).min()
    }

    /// Removes and returns the earliest timer due at `now`, with its deadline. Timers sharing a
    /// deadline fire in the order they were scheduled.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        let key = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .min_by_key(|(_, entry)| (entry.deadline, entry.seq))
            .map(|(key, _)| key)?;
        let entry = self.entries.remove(key);
        Some((entry.deadline, entry.payload))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
