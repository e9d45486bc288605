//! Raw `AF_PACKET` sockets bound to a single interface.

use std::{
    fs::File,
    mem,
    num::NonZeroU32,
    os::fd::{AsRawFd, OwnedFd},
};

use nix::{
    libc,
    sys::socket::{self, AddressFamily, LinkAddr, SockFlag, SockProtocol, SockType, SockaddrLike},
};

use crate::{Error, Result};

/// What a packet socket is opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Receives every frame seen on the interface. Non-blocking.
    Capture,
    /// Only transmits: protocol 0 keeps the kernel from queueing received frames on it.
    /// Blocking.
    Transmit,
}

impl Direction {
    const fn protocol(self) -> Option<SockProtocol> {
        match self {
            Self::Capture => Some(SockProtocol::EthAll),
            Self::Transmit => None,
        }
    }

    /// The protocol in network byte order, as `sockaddr_ll` expects it.
    const fn sll_protocol(self) -> u16 {
        match self {
            Self::Capture => (libc::ETH_P_ALL as u16).to_be(),
            Self::Transmit => 0,
        }
    }

    const fn flags(self) -> SockFlag {
        match self {
            Self::Capture => SockFlag::SOCK_NONBLOCK.union(SockFlag::SOCK_CLOEXEC),
            Self::Transmit => SockFlag::SOCK_CLOEXEC,
        }
    }
}

/// Opens a raw packet socket and binds it to the interface `name` with index `index`.
///
/// Requires `CAP_NET_RAW`.
pub(crate) fn bind(name: &str, index: NonZeroU32, direction: Direction) -> Result<File> {
    let fd: OwnedFd =
        socket::socket(AddressFamily::Packet, SockType::Raw, direction.flags(), direction.protocol())
            .map_err(Error::Socket)?;

    // SAFETY: all-zero is a valid `sockaddr_ll`.
    let mut sll: libc::sockaddr_ll = unsafe { mem::zeroed() };
    sll.sll_family = libc::AF_PACKET as libc::c_ushort;
    sll.sll_protocol = direction.sll_protocol();
    sll.sll_ifindex = index.get() as libc::c_int;

    let len = mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t;
    // SAFETY: `sll` is an initialised `sockaddr_ll` of `len` bytes.
    let addr = unsafe { LinkAddr::from_raw((&sll as *const libc::sockaddr_ll).cast(), Some(len)) }
        .ok_or_else(|| Error::Address(name.to_owned()))?;

    socket::bind(fd.as_raw_fd(), &addr)
        .map_err(|source| Error::Bind { interface: name.to_owned(), source })?;

    tracing::debug!(interface = name, index = index.get(), ?direction, "bound packet socket");

    Ok(File::from(fd))
}
