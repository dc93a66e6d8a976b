//! # Bridge Runtime
//!
//! Wires a scripted game session to the demo host over an in-memory
//! channel.
//!
//! ## Startup Sequence
//!
//! 1. Load and validate bridge and host configuration
//! 2. Open an in-memory duplex channel
//! 3. Spawn the host responder on the host end
//! 4. Create the bridge context on the frame end
//! 5. Play the session and report

pub mod session;

use anyhow::{Context, Result};
use game_bridge::transport::memory::duplex;
use game_bridge::{BridgeConfig, BridgeContext};
use host_responder::{DemoHost, HostConfig, HostResponder};
use std::sync::Arc;
use tracing::{debug, info};

pub use session::{play_session, SessionReport};

/// Run one demo session end to end.
pub async fn run_demo(bridge: BridgeConfig, host: HostConfig, rounds: u32) -> Result<SessionReport> {
    let (frame, host_end) = duplex(bridge.channel_buffer.max(1));

    let demo = Arc::new(DemoHost::new(&host));
    let responder = HostResponder::from_config(&host, demo.registry())
        .context("Failed to build host responder")?;
    let host_task = tokio::spawn(async move {
        let result = responder.run(&host_end, &host_end).await;
        debug!(?result, "Host responder stopped");
        result
    });

    let frame = Arc::new(frame);
    let ctx = BridgeContext::new(bridge, frame.clone(), frame)
        .context("Invalid bridge configuration")?;
    let sdk = ctx.sdk();

    let report = play_session(&sdk, "bridge-runtime", rounds)
        .await
        .context("Game session failed")?;

    info!(
        rounds = report.rounds_played,
        total_score = report.total_score,
        balance_nps = report.balance_nps,
        "Session complete"
    );

    drop(sdk);
    drop(ctx);
    host_task
        .await
        .context("Host task panicked")?
        .context("Host responder failed")?;

    Ok(report)
}
