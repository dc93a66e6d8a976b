//! # Bridge Runtime
//!
//! Runs a scripted game session against the in-memory demo host and prints
//! a summary. Configuration comes from `BRIDGE_*` / `HOST_*` environment
//! variables, overridden by command-line flags.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use bridge_runtime::run_demo;
use bridge_telemetry::{init_logging, TelemetryConfig};
use game_bridge::BridgeConfig;
use host_responder::HostConfig;

/// Game bridge demo: a game session served by an in-memory host
#[derive(Parser, Debug)]
#[command(name = "bridge-runtime")]
#[command(about = "Play a scripted game session over the game bridge")]
struct Args {
    /// Number of rounds to play
    #[arg(short, long, default_value = "3", env = "BRIDGE_DEMO_ROUNDS")]
    rounds: u32,

    /// Per-request timeout in seconds (0 disables timeouts)
    #[arg(short, long)]
    timeout_secs: Option<u64>,

    /// Protocol tag stamped on requests
    #[arg(long)]
    protocol_tag: Option<String>,

    /// Starting energy of the demo player
    #[arg(long)]
    energy: Option<i64>,

    /// Key the host signs results with
    #[arg(long)]
    signing_key: Option<String>,

    /// Log level filter
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &args.log_level {
        telemetry = telemetry.with_log_level(level);
    }
    if args.json_logs {
        telemetry = telemetry.with_json_logs(true);
    }
    init_logging(&telemetry).context("Failed to initialize logging")?;

    let mut bridge = BridgeConfig::from_env();
    if let Some(secs) = args.timeout_secs {
        bridge.default_timeout = Duration::from_secs(secs);
    }
    if let Some(tag) = &args.protocol_tag {
        bridge.protocol_tag = tag.clone();
    }

    let mut host = HostConfig::from_env();
    host.protocol_tag = bridge.protocol_tag.clone();
    if let Some(energy) = args.energy {
        host.player.energy = energy;
    }
    if let Some(key) = args.signing_key {
        host.signing_key = Some(key);
    }

    info!(
        rounds = args.rounds,
        protocol_tag = %bridge.protocol_tag,
        timeout_secs = bridge.default_timeout.as_secs(),
        "Starting demo session"
    );

    let report = run_demo(bridge, host, args.rounds).await?;

    println!("player:        {}", report.player_id);
    println!(
        "tournament:    {}",
        report.tournament_id.as_deref().unwrap_or("practice")
    );
    println!("rounds played: {}", report.rounds_played);
    println!("total score:   {}", report.total_score);
    println!("NPS balance:   {}", report.balance_nps);
    println!("energy left:   {}", report.energy_left);
    if let Some(reason) = &report.stopped_early {
        println!("stopped early: {reason}");
    }
    for (round, signature) in report.signatures.iter().enumerate() {
        println!("round {:>2} sig:  {signature}", round + 1);
    }

    Ok(())
}
