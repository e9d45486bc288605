use std::{
    fs::File,
    io::{self, Read as _},
    time::Duration,
};

use lagrelay_core::Ingress;
use tokio::io::{unix::AsyncFd, Interest};

use crate::{
    interface::interface_index,
    socket::{self, Direction},
    Result,
};

/// Captures every frame seen on one interface through a non-blocking `AF_PACKET` socket.
///
/// Must be created from within a tokio runtime: the socket is registered with its reactor.
#[derive(Debug)]
pub struct PacketIngress {
    fd: AsyncFd<File>,
    interface: String,
}

impl PacketIngress {
    /// Opens a capture socket on `interface`.
    pub fn bind(interface: &str) -> Result<Self> {
        let index = interface_index(interface)?;
        let file = socket::bind(interface, index, Direction::Capture)?;

        Ok(Self::from_file(file, interface)?)
    }

    /// Wraps an already bound, non-blocking socket.
    fn from_file(file: File, interface: &str) -> io::Result<Self> {
        let fd = AsyncFd::with_interest(file, Interest::READABLE)?;
        Ok(Self { fd, interface: interface.to_owned() })
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl Ingress for PacketIngress {
    async fn capture(&mut self, buf: &mut [u8], bound: Duration) -> io::Result<usize> {
        let Ok(ready) = tokio::time::timeout(bound, self.fd.readable()).await else {
            return Ok(0);
        };

        let mut guard = ready?;
        // `try_io` clears the readiness on `WouldBlock`, so the next wait blocks again.
        match guard.try_io(|fd| fd.get_ref().read(buf)) {
            Ok(res) => res,
            Err(_would_block) => Ok(0),
        }
    }
}
