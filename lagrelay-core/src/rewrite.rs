//! Link-layer address substitution.

use pnet::util::MacAddr;

/// Length of a link-layer address.
pub const ADDR_LEN: usize = 6;

/// Length of the rewritten header region: destination followed by source.
pub const HEADER_ADDRS_LEN: usize = 2 * ADDR_LEN;

/// Overwrites the destination and source addresses of every captured frame with two fixed
/// values.
///
/// The rewrite only touches the first [`HEADER_ADDRS_LEN`] bytes. It never fails: a frame shorter
/// than the header region has the overlapping prefix rewritten and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRewriter {
    source: MacAddr,
    destination: MacAddr,
}

impl AddressRewriter {
    pub const fn new(source: MacAddr, destination: MacAddr) -> Self {
        Self { source, destination }
    }

    pub const fn source(&self) -> MacAddr {
        self.source
    }

    pub const fn destination(&self) -> MacAddr {
        self.destination
    }

    /// Rewrites the header addresses of `frame` in place.
    pub fn rewrite(&self, frame: &mut [u8]) {
        let mut header = [0u8; HEADER_ADDRS_LEN];
        header[..ADDR_LEN].copy_from_slice(&self.destination.octets());
        header[ADDR_LEN..].copy_from_slice(&self.source.octets());

        let len = frame.len().min(HEADER_ADDRS_LEN);
        frame[..len].copy_from_slice(&header[..len]);
    }
}
