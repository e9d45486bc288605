use std::{convert::Infallible, io, sync::Arc, time::Duration};

use pnet::packet::ethernet::EthernetPacket;
use tracing::Instrument as _;

use crate::{
    config::clamp_frame_size, AddressRewriter, Egress, Enqueued, Error, Frame, FrameQueue, Ingress,
    OverflowPolicy, RelayConfig, RelayStats, Result, Scheduler, StatusLine, TimeoutCalculator,
};

/// Reads the clock the relay schedules against. Goes through tokio so a paused runtime clock
/// drives it in tests.
#[inline]
fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

/// The relay event loop.
///
/// Every cycle of [`Relay::turn`]:
///
/// 1. waits for the ingress to become readable, at most for the current wait bound;
/// 2. attempts one non-blocking capture;
/// 3. if a frame was read, rewrites its addresses, schedules it and appends it to the queue;
/// 4. transmits the queue head if its deadline has passed;
/// 5. recomputes the wait bound from the new head.
///
/// Delivery is checked on every cycle, including wake-ups caused only by the wait bound
/// elapsing, which is what gets a frame out on time when no further input arrives. At most one
/// frame leaves per cycle; when more are ready the next wait bound is zero.
#[derive(Debug)]
pub struct Relay<I, E, W = io::Stderr> {
    ingress: I,
    egress: E,
    rewriter: AddressRewriter,
    scheduler: Scheduler,
    timeouts: TimeoutCalculator,
    queue: FrameQueue,
    /// Capture buffer, reused across reads.
    buf: Box<[u8]>,
    /// Bound of the next wait. Zero at start so the first cycle captures right away.
    wait: Duration,
    stats: Arc<RelayStats>,
    status: Option<StatusLine<W>>,
}

impl<I: Ingress, E: Egress> Relay<I, E> {
    pub fn new(config: RelayConfig, ingress: I, egress: E) -> Self {
        Self {
            ingress,
            egress,
            rewriter: config.rewriter(),
            scheduler: Scheduler::new(config.delay),
            timeouts: TimeoutCalculator::new(config.idle_wait),
            queue: FrameQueue::with_limit(config.capacity, config.overflow),
            buf: vec![0u8; clamp_frame_size(config.max_frame_size)].into_boxed_slice(),
            wait: Duration::ZERO,
            stats: Arc::default(),
            status: None,
        }
    }

    /// Overwrites `status` with the queue depth on every cycle.
    pub fn with_status_line<S: io::Write>(self, status: StatusLine<S>) -> Relay<I, E, S> {
        Relay {
            ingress: self.ingress,
            egress: self.egress,
            rewriter: self.rewriter,
            scheduler: self.scheduler,
            timeouts: self.timeouts,
            queue: self.queue,
            buf: self.buf,
            wait: self.wait,
            stats: self.stats,
            status: Some(status),
        }
    }
}

impl<I: Ingress, E: Egress, W: io::Write> Relay<I, E, W> {
    /// Runs the relay until a fatal error occurs.
    pub async fn run(&mut self) -> Result<Infallible> {
        let span = tracing::info_span!(
            "relay",
            delay = ?self.scheduler.delay(),
            idle_wait = ?self.timeouts.idle_wait()
        );

        async {
            tracing::debug!("relay started");
            loop {
                if let Err(e) = self.turn().await {
                    tracing::error!(?e, "relay failed");
                    return Err(e);
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Runs a single cycle of the event loop.
    pub async fn turn(&mut self) -> Result<()> {
        if let Some(status) = self.status.as_mut() {
            status.report(self.queue.len());
        }

        let len = if self.capture_blocked() {
            tokio::time::sleep(self.wait).await;
            0
        } else {
            self.ingress.capture(&mut self.buf, self.wait).await.map_err(Error::Capture)?
        };

        if len > 0 {
            self.ingest(len)?;
        }

        self.deliver()?;

        self.wait = self.timeouts.next_wait(&self.queue, now());
        self.stats.set_queued(self.queue.len());

        Ok(())
    }

    /// Turns the first `len` bytes of the capture buffer into a scheduled, queued frame.
    fn ingest(&mut self, len: usize) -> Result<()> {
        let now = now();
        let raw = &mut self.buf[..len];

        self.rewriter.rewrite(raw);

        let mut frame = Frame::capture(raw, now);
        let deadline = self.scheduler.schedule(&mut frame, now)?;
        self.stats.record_rx(len);

        tracing::trace!(
            len,
            ?deadline,
            ethertype = ?EthernetPacket::new(frame.payload()).map(|eth| eth.get_ethertype()),
            "captured frame"
        );

        match self.queue.enqueue(frame) {
            Enqueued::Appended => {}
            Enqueued::DroppedNewest(dropped) | Enqueued::DroppedOldest(dropped) => {
                self.stats.record_dropped();
                tracing::warn!(
                    len = dropped.len(),
                    policy = ?self.queue.overflow_policy(),
                    queued = self.queue.len(),
                    "queue full, dropped frame"
                );
            }
        }

        Ok(())
    }

    /// Transmits the queue head if it is ready.
    fn deliver(&mut self) -> Result<()> {
        let now = now();
        let Some(frame) = self.queue.try_dequeue_ready(now) else {
            return Ok(());
        };

        let len = frame.len();
        let written = self.egress.transmit(frame.payload()).map_err(Error::Transmit)?;
        if written != len {
            return Err(Error::ShortWrite { written, len });
        }

        let residency = now.saturating_duration_since(frame.captured_at());
        self.stats.record_tx(len, residency);
        tracing::trace!(len, ?residency, "transmitted frame");

        Ok(())
    }

    /// Under [`OverflowPolicy::BlockCapture`], capture pauses while the queue is full.
    fn capture_blocked(&self) -> bool {
        self.queue.overflow_policy() == OverflowPolicy::BlockCapture && self.queue.is_full()
    }
}

impl<I, E, W> Relay<I, E, W> {
    pub const fn queue(&self) -> &FrameQueue {
        &self.queue
    }

    /// The bound the next cycle will wait for.
    pub const fn next_wait(&self) -> Duration {
        self.wait
    }

    pub fn stats(&self) -> Arc<RelayStats> {
        Arc::clone(&self.stats)
    }

    pub const fn ingress(&self) -> &I {
        &self.ingress
    }

    pub const fn egress(&self) -> &E {
        &self.egress
    }

    pub const fn status_line(&self) -> Option<&StatusLine<W>> {
        self.status.as_ref()
    }
}
