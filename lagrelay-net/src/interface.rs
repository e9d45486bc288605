use std::num::NonZeroU32;

use pnet::datalink::{self, NetworkInterface};

use crate::{Error, Result};

/// Looks up the network interface called `name`.
pub fn find_interface(name: &str) -> Result<NetworkInterface> {
    datalink::interfaces()
        .into_iter()
        .find(|iface| iface.name == name)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_owned()))
}

/// Returns the index of the interface called `name`.
pub fn interface_index(name: &str) -> Result<NonZeroU32> {
    let iface = find_interface(name)?;
    if !iface.is_up() {
        tracing::warn!(interface = name, "interface is down");
    }

    NonZeroU32::new(iface.index).ok_or_else(|| Error::InterfaceNotFound(name.to_owned()))
}
