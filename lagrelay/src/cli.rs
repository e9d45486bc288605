use std::{num::NonZeroUsize, time::Duration};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use lagrelay_core::{MacAddr, OverflowPolicy, RelayConfig, MAX_FRAME_SIZE};

/// Everything the binary needs to start a relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Options {
    pub(crate) ingress: String,
    pub(crate) egress: String,
    pub(crate) status: bool,
    pub(crate) config: RelayConfig,
}

pub(crate) fn command() -> Command {
    Command::new("lagrelay")
        .about("Replays every frame captured on one interface on another, after a fixed delay")
        .arg(
            Arg::new("ingress")
                .long("ingress")
                .short('i')
                .default_value("nic2")
                .help("Interface to capture frames on"),
        )
        .arg(
            Arg::new("egress")
                .long("egress")
                .short('o')
                .default_value("nic1")
                .help("Interface to transmit delayed frames on"),
        )
        .arg(
            Arg::new("delay-ms")
                .long("delay-ms")
                .value_parser(value_parser!(u64))
                .default_value("1500")
                .help("How long every frame is held, in milliseconds"),
        )
        .arg(
            Arg::new("idle-ms")
                .long("idle-ms")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("5000")
                .help("Longest wait while no frame is queued, in milliseconds"),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .value_parser(parse_mac)
                .default_value("f5:00:00:00:00:01")
                .help("Source address written into every frame"),
        )
        .arg(
            Arg::new("destination")
                .long("destination")
                .value_parser(parse_mac)
                .default_value("f5:00:00:00:00:02")
                .help("Destination address written into every frame"),
        )
        .arg(
            Arg::new("max-frame-size")
                .long("max-frame-size")
                .value_parser(value_parser!(u64).range(1..=MAX_FRAME_SIZE as u64))
                .default_value("4096")
                .help("Capture buffer size; longer frames are truncated"),
        )
        .arg(
            Arg::new("capacity")
                .long("capacity")
                .value_parser(value_parser!(NonZeroUsize))
                .help("Maximum number of queued frames [default: unbounded]"),
        )
        .arg(
            Arg::new("overflow")
                .long("overflow")
                .value_parser(["drop-newest", "drop-oldest", "block"])
                .requires("capacity")
                .help("What to do when the queue is at capacity [default: drop-newest]"),
        )
        .arg(
            Arg::new("status")
                .long("status")
                .action(ArgAction::SetTrue)
                .help("Keep a line on stderr updated with the number of queued frames"),
        )
}

fn parse_mac(s: &str) -> Result<MacAddr, String> {
    s.parse().map_err(|_| format!("invalid MAC address: {s}"))
}

impl Options {
    pub(crate) fn from_matches(matches: &ArgMatches) -> Self {
        // Every argument below has a default or is optional, so lookups cannot miss.
        let string = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();
        let millis = |id: &str| {
            Duration::from_millis(matches.get_one::<u64>(id).copied().unwrap_or_default())
        };
        let mac = |id: &str| matches.get_one::<MacAddr>(id).copied().unwrap_or_else(MacAddr::zero);

        let source = mac("source");
        let destination = mac("destination");
        let max_frame_size = matches.get_one::<u64>("max-frame-size").copied().unwrap_or_default();

        let mut config = RelayConfig::default()
            .with_delay(millis("delay-ms"))
            .with_idle_wait(millis("idle-ms"))
            .with_addresses(source, destination)
            .with_max_frame_size(max_frame_size as usize);

        if let Some(capacity) = matches.get_one::<NonZeroUsize>("capacity") {
            let overflow = match string("overflow").as_str() {
                "drop-oldest" => OverflowPolicy::DropOldest,
                "block" => OverflowPolicy::BlockCapture,
                _ => OverflowPolicy::DropNewest,
            };
            config = config.with_capacity(*capacity, overflow);
        }

        Self {
            ingress: string("ingress"),
            egress: string("egress"),
            status: matches.get_flag("status"),
            config,
        }
    }
}
