//! Relay configuration.

use std::{num::NonZeroUsize, time::Duration};

use pnet::util::MacAddr;

use crate::{frame::MAX_FRAME_SIZE, rewrite::AddressRewriter};

/// What the [`FrameQueue`](crate::FrameQueue) does when it holds `capacity` frames and another
/// one is captured.
///
/// Only relevant when [`RelayConfig::capacity`] is set; an unbounded queue never overflows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Discard the frame that was just captured.
    #[default]
    DropNewest,
    /// Discard the head of the queue to make room for the captured frame.
    DropOldest,
    /// Stop reading from the ingress until the head has been delivered. Frames back up in the
    /// kernel socket buffer, which drops them once full.
    BlockCapture,
}

/// Configuration of a [`Relay`](crate::Relay).
///
/// # Example
///
/// ```
/// use std::{num::NonZeroUsize, time::Duration};
///
/// use lagrelay_core::{OverflowPolicy, RelayConfig};
///
/// // Half a second of delay, with at most 10k frames in flight.
/// let config = RelayConfig::default()
///     .with_delay(Duration::from_millis(500))
///     .with_capacity(NonZeroUsize::new(10_000).unwrap(), OverflowPolicy::DropOldest);
///
/// assert_eq!(config.idle_wait, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    /// How long every frame is held before it is transmitted.
    pub delay: Duration,

    /// The wait bound used while the queue is empty.
    ///
    /// New input wakes the relay on its own, so this mostly governs how often the relay wakes
    /// up during total silence.
    pub idle_wait: Duration,

    /// Size of the capture buffer. Longer frames are truncated by the capture endpoint.
    ///
    /// The relay clamps it to `1..=MAX_FRAME_SIZE`.
    pub max_frame_size: usize,

    /// Address written into the source field of every frame.
    pub source: MacAddr,

    /// Address written into the destination field of every frame.
    pub destination: MacAddr,

    /// Maximum number of queued frames. `None` leaves the queue bounded only by memory.
    pub capacity: Option<NonZeroUsize>,

    /// Applied when `capacity` is reached.
    pub overflow: OverflowPolicy,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1500),
            idle_wait: Duration::from_millis(5000),
            max_frame_size: MAX_FRAME_SIZE,
            source: MacAddr::new(0xf5, 0, 0, 0, 0, 1),
            destination: MacAddr::new(0xf5, 0, 0, 0, 0, 2),
            capacity: None,
            overflow: OverflowPolicy::default(),
        }
    }
}

impl RelayConfig {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_idle_wait(mut self, idle_wait: Duration) -> Self {
        self.idle_wait = idle_wait;
        self
    }

    /// Sets the capture buffer size, clamped to `1..=MAX_FRAME_SIZE`.
    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = clamp_frame_size(max_frame_size);
        self
    }

    pub fn with_addresses(mut self, source: MacAddr, destination: MacAddr) -> Self {
        self.source = source;
        self.destination = destination;
        self
    }

    /// Bounds the queue to `capacity` frames, applying `overflow` once it is full.
    pub fn with_capacity(mut self, capacity: NonZeroUsize, overflow: OverflowPolicy) -> Self {
        self.capacity = Some(capacity);
        self.overflow = overflow;
        self
    }

    pub fn rewriter(&self) -> AddressRewriter {
        AddressRewriter::new(self.source, self.destination)
    }
}

/// An empty buffer would read every frame as nothing; a larger one would let frames exceed
/// [`MAX_FRAME_SIZE`].
pub(crate) fn clamp_frame_size(size: usize) -> usize {
    size.clamp(1, MAX_FRAME_SIZE)
}
