use std::time::{Duration, Instant};

use crate::{Error, Frame, Result};

/// Stamps captured frames with their deadline: the capture instant plus a fixed delay.
///
/// Because the delay is constant and capture instants never go backwards, deadlines handed out
/// by one scheduler are non-decreasing in capture order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    delay: Duration,
}

impl Scheduler {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Sets and returns the deadline of `frame`, computed from the single clock read `now`.
    pub fn schedule(&self, frame: &mut Frame, now: Instant) -> Result<Instant> {
        let deadline =
            now.checked_add(self.delay).ok_or(Error::DeadlineOverflow { delay: self.delay })?;
        frame.set_deadline(deadline);
        Ok(deadline)
    }
}
