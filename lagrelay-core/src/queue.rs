use std::{collections::VecDeque, num::NonZeroUsize, time::Instant};

use crate::{config::OverflowPolicy, Frame};

/// The result of [`FrameQueue::enqueue`].
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub enum Enqueued {
    /// The frame was appended to the tail.
    Appended,
    /// The queue was full and the frame was discarded.
    DroppedNewest(Frame),
    /// The queue was full; the returned head was discarded and the frame appended.
    DroppedOldest(Frame),
}

/// The FIFO of frames waiting for their deadline.
///
/// Frames are appended at the tail and removed from the head only. Since every deadline is the
/// capture instant plus the same delay, tail appends keep the queue sorted by deadline, and
/// frames with equal deadlines leave in arrival order.
#[derive(Debug, Default)]
pub struct FrameQueue {
    frames: VecDeque<Frame>,
    capacity: Option<NonZeroUsize>,
    overflow: OverflowPolicy,
}

impl FrameQueue {
    /// Creates a queue bounded only by memory.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Creates a queue holding at most `capacity` frames.
    pub fn bounded(capacity: NonZeroUsize, overflow: OverflowPolicy) -> Self {
        Self { frames: VecDeque::new(), capacity: Some(capacity), overflow }
    }

    pub(crate) fn with_limit(capacity: Option<NonZeroUsize>, overflow: OverflowPolicy) -> Self {
        match capacity {
            Some(capacity) => Self::bounded(capacity, overflow),
            None => Self::unbounded(),
        }
    }

    /// Appends `frame` at the tail, taking ownership of it.
    ///
    /// On a full queue the overflow policy decides which frame is discarded. Under
    /// [`OverflowPolicy::BlockCapture`] the caller is expected to stop capturing while
    /// [`Self::is_full`] holds; a frame enqueued anyway is discarded like with `DropNewest`.
    pub fn enqueue(&mut self, frame: Frame) -> Enqueued {
        debug_assert!(
            self.frames.back().map_or(true, |tail| tail.deadline() <= frame.deadline()),
            "deadlines must be non-decreasing"
        );

        if !self.is_full() {
            self.frames.push_back(frame);
            return Enqueued::Appended;
        }

        match self.overflow {
            OverflowPolicy::DropNewest | OverflowPolicy::BlockCapture => {
                Enqueued::DroppedNewest(frame)
            }
            OverflowPolicy::DropOldest => {
                // A full queue holds at least one frame.
                let Some(oldest) = self.frames.pop_front() else {
                    self.frames.push_back(frame);
                    return Enqueued::Appended;
                };
                self.frames.push_back(frame);
                Enqueued::DroppedOldest(oldest)
            }
        }
    }

    /// Removes and returns the head frame if its deadline is at or before `now`.
    pub fn try_dequeue_ready(&mut self, now: Instant) -> Option<Frame> {
        if self.frames.front()?.is_ready(now) {
            self.frames.pop_front()
        } else {
            None
        }
    }

    /// The deadline of the head frame, if any.
    pub fn peek_deadline(&self) -> Option<Instant> {
        self.frames.front().map(Frame::deadline)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns `true` if a capacity is configured and reached.
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|capacity| self.frames.len() >= capacity.get())
    }

    pub const fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }

    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = &Frame> + '_ {
        self.frames.iter()
    }
}
