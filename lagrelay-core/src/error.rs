use std::io;

/// Fatal conditions of the relay. None of these are retried: the event loop stops and the
/// error is handed to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("capture failed: {0}")]
    Capture(#[source] io::Error),
    #[error("transmit failed: {0}")]
    Transmit(#[source] io::Error),
    #[error("short write: transmitted {written} of {len} bytes")]
    ShortWrite { written: usize, len: usize },
    #[error("deadline not representable: {delay:?} past the capture instant")]
    DeadlineOverflow { delay: std::time::Duration },
}

pub type Result<T> = std::result::Result<T, Error>;
