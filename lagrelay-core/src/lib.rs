//! The core of lagrelay: a link-layer relay that holds every captured frame for a fixed delay
//! before replaying it on another interface.
//!
//! Frames flow through the [`Relay`] event loop: they are captured from an [`Ingress`], get their
//! addresses rewritten by the [`AddressRewriter`], are stamped with a deadline by the
//! [`Scheduler`], wait in the [`FrameQueue`] and finally leave through an [`Egress`]. The
//! [`TimeoutCalculator`] decides how long the loop may sleep in between.
//!
//! The crate does no OS access of its own; see `lagrelay-net` for the `AF_PACKET` endpoints.

mod config;
pub use config::{OverflowPolicy, RelayConfig};

mod endpoint;
pub use endpoint::{Egress, Ingress};

mod error;
pub use error::{Error, Result};

mod frame;
pub use frame::{Frame, MAX_FRAME_SIZE};

mod queue;
pub use queue::{Enqueued, FrameQueue};

mod relay;
pub use relay::Relay;

pub mod rewrite;
pub use rewrite::AddressRewriter;

mod schedule;
pub use schedule::Scheduler;

mod stats;
pub use stats::RelayStats;

mod status;
pub use status::StatusLine;

mod timeout;
pub use timeout::TimeoutCalculator;

/// Re-exported so callers can build a [`RelayConfig`] without depending on `pnet` directly.
pub use pnet::util::MacAddr;
