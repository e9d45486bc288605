use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("interface not found: {0}")]
    InterfaceNotFound(String),
    #[error("socket() failed: {0}")]
    Socket(#[source] nix::Error),
    #[error("bind() to {interface} failed: {source}")]
    Bind {
        interface: String,
        #[source]
        source: nix::Error,
    },
    #[error("invalid link-layer address for {0}")]
    Address(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
