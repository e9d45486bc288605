use std::time::{Duration, Instant};

use crate::FrameQueue;

/// Derives how long the relay may block before the queue head needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutCalculator {
    idle_wait: Duration,
}

impl TimeoutCalculator {
    pub const fn new(idle_wait: Duration) -> Self {
        Self { idle_wait }
    }

    pub const fn idle_wait(&self) -> Duration {
        self.idle_wait
    }

    /// The wait bound for the next cycle.
    ///
    /// An empty queue yields the idle bound. Otherwise the time left until the head's deadline,
    /// truncated to whole milliseconds, and exactly zero once the deadline is reached.
    pub fn next_wait(&self, queue: &FrameQueue, now: Instant) -> Duration {
        match queue.peek_deadline() {
            None => self.idle_wait,
            Some(deadline) => {
                let left = deadline.saturating_duration_since(now);
                Duration::from_millis(left.as_millis().try_into().unwrap_or(u64::MAX))
            }
        }
    }
}
