//! Captures link-layer frames on one interface and replays them on another after a fixed delay.
//!
//! ```bash
//! sudo RUST_LOG=debug lagrelay --ingress nic2 --egress nic1 --delay-ms 1500 --status
//! ```

use std::process::ExitCode;

use lagrelay_core::{Relay, StatusLine};
use lagrelay_net::{PacketEgress, PacketIngress};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::Options;

fn main() -> ExitCode {
    let options = Options::from_matches(&cli::command().get_matches());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // The relay is a single sequential loop; one thread is all it needs.
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(?e, "failed to build runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(options)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(%e, "relay terminated");
            ExitCode::FAILURE
        }
    }
}

async fn run(options: Options) -> Result<(), Box<dyn std::error::Error>> {
    let ingress = PacketIngress::bind(&options.ingress)?;
    let egress = PacketEgress::bind(&options.egress)?;

    let mut relay = Relay::new(options.config, ingress, egress);
    if options.status {
        relay = relay.with_status_line(StatusLine::stderr());
    }
    let stats = relay.stats();

    tracing::info!(
        ingress = relay.ingress().interface(),
        egress = relay.egress().interface(),
        delay = ?options.config.delay,
        source = %options.config.source,
        destination = %options.config.destination,
        capacity = ?options.config.capacity,
        "relaying frames"
    );

    tokio::select! {
        res = relay.run() => match res {
            Ok(never) => match never {},
            Err(e) => return Err(e.into()),
        },
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("interrupted, discarding queued frames");
        }
    }

    tracing::info!(
        frames_rx = stats.frames_rx(),
        frames_tx = stats.frames_tx(),
        frames_dropped = stats.frames_dropped(),
        bytes_rx = stats.bytes_rx(),
        bytes_tx = stats.bytes_tx(),
        queued = stats.queued(),
        residency = ?stats.residency(),
        "relay stopped"
    );

    Ok(())
}
