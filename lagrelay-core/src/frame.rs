use std::time::Instant;

use bytes::Bytes;

/// The largest frame the relay captures. Longer frames are truncated by the capture endpoint.
pub const MAX_FRAME_SIZE: usize = 4096;

/// A captured link-layer frame waiting for its deadline.
///
/// The payload is an owned copy of the bytes read from the ingress, sized to the read length
/// rather than [`MAX_FRAME_SIZE`]. A frame is owned either by the code that captured it or by
/// the [`FrameQueue`](crate::FrameQueue), and is dropped once it has been transmitted. Frames
/// cannot be duplicated:
///
/// ```compile_fail
/// # use std::time::Instant;
/// # use lagrelay_core::Frame;
/// let frame = Frame::capture(&[0; 64], Instant::now());
/// let copy: Frame = frame.clone();
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct Frame {
    payload: Bytes,
    captured_at: Instant,
    deadline: Instant,
}

impl Frame {
    /// Copies `raw` into a new frame captured at `captured_at`.
    ///
    /// The deadline starts out equal to the capture instant; the
    /// [`Scheduler`](crate::Scheduler) moves it forward.
    pub fn capture(raw: &[u8], captured_at: Instant) -> Self {
        Self { payload: Bytes::copy_from_slice(raw), captured_at, deadline: captured_at }
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    #[inline]
    pub const fn captured_at(&self) -> Instant {
        self.captured_at
    }

    /// The instant at or after which the frame may be transmitted.
    #[inline]
    pub const fn deadline(&self) -> Instant {
        self.deadline
    }

    pub(crate) fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = deadline;
    }

    /// Returns `true` if the frame may be transmitted at `now`.
    #[inline]
    pub fn is_ready(&self, now: Instant) -> bool {
        self.deadline <= now
    }
}
