//! `AF_PACKET` endpoints for the lagrelay event loop.
//!
//! [`PacketIngress`] captures raw frames, link-layer header included, on one interface;
//! [`PacketEgress`] writes frames out on another. Both need `CAP_NET_RAW`. Linux only.

mod egress;
pub use egress::PacketEgress;

mod error;
pub use error::{Error, Result};

mod ingress;
pub use ingress::PacketIngress;

pub mod interface;

mod socket;
