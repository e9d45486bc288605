use std::io::{self, Write};

/// A single terminal line, overwritten on every relay cycle, showing how many frames are queued.
///
/// Purely cosmetic: write errors are ignored.
#[derive(Debug)]
pub struct StatusLine<W = io::Stderr> {
    out: W,
    last: Option<usize>,
}

impl StatusLine {
    /// A status line on standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> StatusLine<W> {
    pub const fn new(out: W) -> Self {
        Self { out, last: None }
    }

    /// Shows `queued` frames, skipping the write when the count has not changed.
    pub fn report(&mut self, queued: usize) {
        if self.last == Some(queued) {
            return;
        }
        self.last = Some(queued);

        let _ = write!(self.out, "{queued:>40} frames in buffer.\r");
        let _ = self.out.flush();
    }

    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
