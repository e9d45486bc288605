use std::{num::NonZeroUsize, time::Duration};

use lagrelay_core::{
    Error, MacAddr, OverflowPolicy, Relay, RelayConfig, StatusLine, MAX_FRAME_SIZE,
};
use pnet::packet::ethernet::EthernetPacket;

use crate::endpoints::{tagged_frame, BrokenIngress, RecordingEgress, ScriptedIngress};

const DELAY: Duration = Duration::from_millis(1500);
const IDLE: Duration = Duration::from_millis(5000);

/// Slack allowed for the timer wheel's millisecond rounding.
const SLACK: Duration = Duration::from_millis(5);

fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Runs the relay for `duration` of (paused) time.
async fn run_for<W: std::io::Write>(
    relay: &mut Relay<ScriptedIngress, RecordingEgress, W>,
    duration: Duration,
) {
    let res = tokio::time::timeout(duration, relay.run()).await;
    assert!(res.is_err(), "relay stopped: {res:?}");
}

#[tokio::test(start_paused = true)]
async fn frame_is_held_for_the_fixed_delay() {
    let _ = tracing_subscriber::fmt::try_init();

    let ingress = ScriptedIngress::new([(ms(0), tagged_frame(1))]);
    let mut relay = Relay::new(RelayConfig::default(), ingress, RecordingEgress::default());

    // First cycle captures right away and leaves the frame queued.
    relay.turn().await.unwrap();
    assert_eq!(relay.queue().len(), 1);
    assert!(relay.egress().sent().is_empty());
    assert_eq!(relay.next_wait(), DELAY);

    run_for(&mut relay, ms(5000)).await;
    let sent = relay.egress().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1.len(), 64);

    let elapsed = sent[0].0 - relay.ingress().start();
    assert!(elapsed >= DELAY, "delivered early: {elapsed:?}");
    assert!(elapsed < DELAY + SLACK, "delivered late: {elapsed:?}");
    assert!(relay.queue().is_empty());
}

#[tokio::test(start_paused = true)]
async fn simultaneous_frames_keep_capture_order() {
    let ingress =
        ScriptedIngress::new((1..=3).map(|tag| (ms(0), tagged_frame(tag))).collect::<Vec<_>>());
    let mut relay = Relay::new(RelayConfig::default(), ingress, RecordingEgress::default());

    run_for(&mut relay, ms(3000)).await;

    assert_eq!(relay.egress().tags(), [1, 2, 3]);
    for (at, _) in relay.egress().sent() {
        assert!(*at - relay.ingress().start() >= DELAY);
    }
}

#[tokio::test(start_paused = true)]
async fn frames_leave_in_order_and_never_early() {
    let offsets = [0, 10, 10, 250, 900, 1499, 1500, 1600, 1601, 3000, 7000];
    let script = offsets.iter().enumerate().map(|(i, at)| (ms(*at), tagged_frame(i as u8)));
    let mut relay =
        Relay::new(RelayConfig::default(), ScriptedIngress::new(script), RecordingEgress::default());

    run_for(&mut relay, ms(20_000)).await;

    let captured = relay.ingress().captured();
    let sent = relay.egress().sent();
    assert_eq!(captured.len(), offsets.len());
    assert_eq!(sent.len(), offsets.len());

    for ((rx_at, rx), (tx_at, tx)) in captured.iter().zip(sent) {
        // Same frame, in the same position, only the addresses differ.
        assert_eq!(rx[12..], tx[12..]);
        assert!(*tx_at - *rx_at >= DELAY, "frame {} left after {:?}", rx[63], *tx_at - *rx_at);
    }

    let stats = relay.stats();
    assert_eq!(stats.frames_rx(), offsets.len());
    assert_eq!(stats.frames_tx(), offsets.len());
    assert_eq!(stats.bytes_tx(), 64 * offsets.len());
    assert_eq!(stats.queued(), 0);
    assert!(stats.residency() >= DELAY);
}

#[tokio::test(start_paused = true)]
async fn silence_waits_for_the_idle_bound() {
    let mut relay =
        Relay::new(RelayConfig::default(), ScriptedIngress::silent(), RecordingEgress::default());

    run_for(&mut relay, ms(60_000)).await;

    let bounds = relay.ingress().bounds();
    assert_eq!(bounds[0], Duration::ZERO);
    assert!(bounds.len() > 5);
    assert!(bounds[1..].iter().all(|bound| *bound == IDLE));
    assert_eq!(relay.next_wait(), IDLE);
    assert!(relay.egress().sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn wait_bound_never_exceeds_idle_when_empty() {
    let idle = ms(250);
    let config = RelayConfig::default().with_idle_wait(idle);
    let ingress = ScriptedIngress::new([(ms(100), tagged_frame(1)), (ms(4000), tagged_frame(2))]);
    let mut relay = Relay::new(config, ingress, RecordingEgress::default());

    run_for(&mut relay, ms(10_000)).await;

    assert_eq!(relay.egress().tags(), [1, 2]);
    assert!(relay.ingress().bounds().iter().all(|bound| *bound <= DELAY.max(idle)));
    assert_eq!(relay.next_wait(), idle);
}

#[tokio::test(start_paused = true)]
async fn addresses_are_rewritten_before_transmission() {
    let source = MacAddr::new(0x02, 0x11, 0x22, 0x33, 0x44, 0x55);
    let destination = MacAddr::new(0x02, 0x66, 0x77, 0x88, 0x99, 0xaa);
    let config = RelayConfig::default().with_addresses(source, destination);

    let ingress = ScriptedIngress::new((0..4).map(|tag| (ms(tag as u64), tagged_frame(tag))));
    let mut relay = Relay::new(config, ingress, RecordingEgress::default());

    run_for(&mut relay, ms(2000)).await;

    assert_eq!(relay.egress().sent().len(), 4);
    for (_, frame) in relay.egress().sent() {
        let eth = EthernetPacket::new(frame).unwrap();
        assert_eq!(eth.get_source(), source);
        assert_eq!(eth.get_destination(), destination);
    }
}

#[tokio::test(start_paused = true)]
async fn drop_newest_discards_frames_beyond_capacity() {
    let config = RelayConfig::default()
        .with_capacity(NonZeroUsize::new(2).unwrap(), OverflowPolicy::DropNewest);
    let ingress = ScriptedIngress::new((1..=4).map(|tag| (ms(0), tagged_frame(tag))));
    let mut relay = Relay::new(config, ingress, RecordingEgress::default());

    run_for(&mut relay, ms(3000)).await;

    assert_eq!(relay.egress().tags(), [1, 2]);
    assert_eq!(relay.stats().frames_dropped(), 2);
    assert_eq!(relay.stats().frames_rx(), 4);
}

#[tokio::test(start_paused = true)]
async fn drop_oldest_keeps_the_latest_frames() {
    let config = RelayConfig::default()
        .with_capacity(NonZeroUsize::new(2).unwrap(), OverflowPolicy::DropOldest);
    let ingress = ScriptedIngress::new((1..=4).map(|tag| (ms(0), tagged_frame(tag))));
    let mut relay = Relay::new(config, ingress, RecordingEgress::default());

    run_for(&mut relay, ms(3000)).await;

    assert_eq!(relay.egress().tags(), [3, 4]);
    assert_eq!(relay.stats().frames_dropped(), 2);
}

#[tokio::test(start_paused = true)]
async fn block_capture_holds_input_until_there_is_room() {
    let config = RelayConfig::default()
        .with_capacity(NonZeroUsize::new(1).unwrap(), OverflowPolicy::BlockCapture);
    let ingress = ScriptedIngress::new([(ms(0), tagged_frame(1)), (ms(0), tagged_frame(2))]);
    let mut relay = Relay::new(config, ingress, RecordingEgress::default());

    run_for(&mut relay, ms(5000)).await;

    assert_eq!(relay.egress().tags(), [1, 2]);
    assert_eq!(relay.stats().frames_dropped(), 0);

    // The second frame is only read once the first one has left.
    let captured = relay.ingress().captured();
    let sent = relay.egress().sent();
    assert!(captured[1].0 >= sent[0].0);
    assert!(sent[1].0 - relay.ingress().start() >= DELAY * 2);
}

#[tokio::test(start_paused = true)]
async fn short_write_is_fatal() {
    let ingress = ScriptedIngress::new([(ms(0), tagged_frame(1))]);
    let mut relay = Relay::new(RelayConfig::default(), ingress, RecordingEgress::short_by(4));

    let err = relay.run().await.unwrap_err();
    assert!(matches!(err, Error::ShortWrite { written: 60, len: 64 }), "{err:?}");
}

#[tokio::test(start_paused = true)]
async fn capture_error_is_fatal() {
    let mut relay = Relay::new(RelayConfig::default(), BrokenIngress, RecordingEgress::default());

    let err = relay.run().await.unwrap_err();
    match err {
        Error::Capture(e) => assert_eq!(e.kind(), std::io::ErrorKind::ConnectionReset),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn oversized_frames_are_truncated_to_the_frame_limit() {
    let config = RelayConfig { max_frame_size: 9000, ..Default::default() };
    let ingress = ScriptedIngress::new([(ms(0), vec![0xab; 9000])]);
    let mut relay = Relay::new(config, ingress, RecordingEgress::default());

    relay.turn().await.unwrap();
    assert_eq!(relay.stats().bytes_rx(), MAX_FRAME_SIZE);

    run_for(&mut relay, ms(3000)).await;
    let sent = relay.egress().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1.len(), MAX_FRAME_SIZE);
}

#[tokio::test(start_paused = true)]
async fn zero_frame_size_still_relays_frames() {
    let config = RelayConfig { max_frame_size: 0, ..Default::default() };
    let ingress = ScriptedIngress::new([(ms(0), tagged_frame(7))]);
    let mut relay = Relay::new(config, ingress, RecordingEgress::default());

    run_for(&mut relay, ms(3000)).await;

    let stats = relay.stats();
    assert_eq!(stats.frames_rx(), 1);
    assert_eq!(stats.frames_tx(), 1);
    assert_eq!(stats.frames_dropped(), 0);
    assert_eq!(relay.egress().sent()[0].1.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn status_line_tracks_queue_depth() {
    let ingress = ScriptedIngress::new([(ms(0), tagged_frame(1)), (ms(10), tagged_frame(2))]);
    let mut relay = Relay::new(RelayConfig::default(), ingress, RecordingEgress::default())
        .with_status_line(StatusLine::new(Vec::new()));

    run_for(&mut relay, ms(5000)).await;
    assert_eq!(relay.egress().tags(), [1, 2]);

    // One line per change: both frames queue up, then leave one at a time.
    let out = relay.status_line().map(|line| line.get_ref().clone()).unwrap();
    let expected: String =
        [0, 1, 2, 1, 0].iter().map(|n| format!("{n:>40} frames in buffer.\r")).collect();
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}
