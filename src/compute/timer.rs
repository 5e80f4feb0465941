//! Host-driven one-shot timers.
//!
//! The queue never reads a wall clock: time only moves when the host calls
//! [`TimerQueue::advance`], which keeps timed transitions deterministic in
//! tests and lets the browser drive everything from `requestAnimationFrame`.

use std::time::Duration;

/// Cancellation token for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// A timer that came due during [`TimerQueue::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct Expired<T> {
    /// Clock time at which the timer was due.
    pub deadline: Duration,
    pub payload: T,
}

struct Entry<T> {
    deadline: Duration,
    id: u64,
    payload: T,
}

/// Fire-once timers ordered by deadline, then by scheduling order.
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current clock time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `payload` to fire `delay` after the current clock time.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerHandle {
        self.schedule_at(self.now + delay, payload)
    }

    /// Schedule `payload` at an absolute clock time.
    ///
    /// A deadline already in the past fires on the next `advance`.
    pub fn schedule_at(&mut self, deadline: Duration, payload: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Entry {
            deadline,
            id,
            payload,
        });
        TimerHandle(id)
    }

    /// Cancel a pending timer, returning its payload if it had not fired yet.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let pos = self.pending.iter().position(|e| e.id == handle.0)?;
        Some(self.pending.swap_remove(pos).payload)
    }

    /// Whether the timer is still waiting to fire.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|e| e.id == handle.0)
    }

    /// Time left until the earliest pending deadline.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|e| e.deadline.saturating_sub(self.now))
            .min()
    }

    /// Move the clock forward and return every timer that came due, in order.
    pub fn advance(&mut self, dt: Duration) -> Vec<Expired<T>> {
        self.now += dt;
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|e| e.deadline <= now);
        self.pending = pending;

        due.sort_by_key(|e| (e.deadline, e.id));
        due.into_iter()
            .map(|e| Expired {
                deadline: e.deadline,
                payload: e.payload,
            })
            .collect()
    }

    /// Drop every pending timer. The clock keeps its value.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
