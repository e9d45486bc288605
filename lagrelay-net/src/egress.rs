use std::{
    fs::File,
    io::{self, Write as _},
};

use lagrelay_core::Egress;

use crate::{
    interface::interface_index,
    socket::{self, Direction},
    Result,
};

/// Transmits frames on one interface through a blocking, transmit-only `AF_PACKET` socket.
#[derive(Debug)]
pub struct PacketEgress {
    file: File,
    interface: String,
}

impl PacketEgress {
    /// Opens a transmit socket on `interface`.
    pub fn bind(interface: &str) -> Result<Self> {
        let index = interface_index(interface)?;
        let file = socket::bind(interface, index, Direction::Transmit)?;

        Ok(Self { file, interface: interface.to_owned() })
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl Egress for PacketEgress {
    fn transmit(&mut self, frame: &[u8]) -> io::Result<usize> {
        self.file.write(frame)
    }
}
