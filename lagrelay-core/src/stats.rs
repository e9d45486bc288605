use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

/// Counters of a running relay. Shared between the relay and any observer through an `Arc`.
#[derive(Debug, Default)]
pub struct RelayStats {
    /// Frames read from the ingress
    frames_rx: AtomicUsize,
    /// Frames written to the egress
    frames_tx: AtomicUsize,
    /// Frames discarded by the overflow policy
    frames_dropped: AtomicUsize,
    /// Total bytes read
    bytes_rx: AtomicUsize,
    /// Total bytes written
    bytes_tx: AtomicUsize,
    /// Frames currently queued
    queued: AtomicUsize,
    /// The cumulative average time between capture and transmission, in microseconds.
    residency: AtomicUsize,
    /// Index used to calculate the residency average
    residency_idx: AtomicUsize,
}

impl RelayStats {
    #[inline]
    pub(crate) fn record_rx(&self, bytes: usize) {
        self.frames_rx.fetch_add(1, Ordering::Relaxed);
        self.bytes_rx.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    /// Records a transmitted frame, updating the residency according to the CA formula:
    /// CA = (residency + n * prev_ca) / (n + 1)
    pub(crate) fn record_tx(&self, bytes: usize, residency: Duration) {
        self.frames_tx.fetch_add(1, Ordering::Relaxed);
        self.bytes_tx.fetch_add(bytes, Ordering::Relaxed);

        let residency_us = residency.as_micros() as usize;
        // Wraps around on overflow, which is what we need
        let idx = self.residency_idx.fetch_add(1, Ordering::Relaxed);
        let prev = self.residency.load(Ordering::Relaxed);

        let new = (residency_us + idx * prev) / (idx + 1);
        self.residency.store(new, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn set_queued(&self, queued: usize) {
        self.queued.store(queued, Ordering::Relaxed);
    }

    #[inline]
    pub fn frames_rx(&self) -> usize {
        self.frames_rx.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn frames_tx(&self) -> usize {
        self.frames_tx.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn frames_dropped(&self) -> usize {
        self.frames_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_rx(&self) -> usize {
        self.bytes_rx.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_tx(&self) -> usize {
        self.bytes_tx.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Relaxed)
    }

    /// Average time frames spent in the relay.
    #[inline]
    pub fn residency(&self) -> Duration {
        Duration::from_micros(self.residency.load(Ordering::Relaxed) as u64)
    }
}
