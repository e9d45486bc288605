//! The two sides of the relay.
//!
//! [`Relay`](crate::Relay) is generic over where frames come from and where they go, so the
//! event loop can be driven by `AF_PACKET` sockets in production and by in-memory endpoints in
//! tests.

use std::{future::Future, io, time::Duration};

/// Where captured frames come from.
pub trait Ingress {
    /// Waits until a frame can be read or `bound` elapses, whichever comes first, then attempts
    /// a single non-blocking read into `buf`.
    ///
    /// Returns the number of bytes read, `0` meaning no frame was available (including when the
    /// read would block). Any other error is fatal to the relay.
    fn capture(
        &mut self,
        buf: &mut [u8],
        bound: Duration,
    ) -> impl Future<Output = io::Result<usize>>;
}

/// Where delayed frames are sent.
pub trait Egress {
    /// Transmits `frame` whole, blocking until it has been handed to the link. Returns the number
    /// of bytes written.
    fn transmit(&mut self, frame: &[u8]) -> io::Result<usize>;
}
