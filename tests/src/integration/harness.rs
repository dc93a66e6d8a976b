//! Test harness: a bridge channel whose host end is driven by the test.
//!
//! The test reads requests off the host end and posts whatever responses it
//! likes, in whatever order, so correlation can be checked without a real
//! host in the way.

use game_bridge::transport::memory::{duplex, MemoryEndpoint};
use game_bridge::{BridgeChannel, BridgeConfig, MessagePort, MessageSource};
use host_responder::{DemoHost, HostConfig, HostResponder};
use serde_json::{json, Value};
use shared_protocol::{RequestEnvelope, RequestId, PROTOCOL_TAG};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Bridge channel plus the raw host end of its transport.
pub struct Harness {
    pub channel: Arc<BridgeChannel>,
    pub host: MemoryEndpoint,
}

impl Harness {
    /// Must be called inside a tokio runtime.
    pub fn new(config: BridgeConfig) -> Self {
        let (frame, host) = duplex(config.channel_buffer);
        let frame = Arc::new(frame);
        let channel = match BridgeChannel::open(config, frame.clone(), frame) {
            Ok(channel) => Arc::new(channel),
            Err(e) => panic!("invalid test config: {e}"),
        };
        Self { channel, host }
    }

    pub fn with_defaults() -> Self {
        Self::new(BridgeConfig::default())
    }

    /// Next request the game posted.
    pub async fn next_request(&self) -> RequestEnvelope {
        let message = match self.host.next_message().await {
            Ok(message) => message,
            Err(e) => panic!("host end closed: {e}"),
        };
        match RequestEnvelope::from_message(&message, PROTOCOL_TAG) {
            Ok(request) => request,
            Err(e) => panic!("not a request: {e}: {message}"),
        }
    }

    /// Post a raw message to the game side.
    pub async fn post(&self, message: Value) {
        if let Err(e) = self.host.post_message(message).await {
            panic!("game end closed: {e}");
        }
    }

    /// Answer `request_id` with an explicit payload.
    pub async fn reply(&self, request_id: RequestId, payload: Value) {
        self.post(json!({"requestId": request_id, "_payload": payload}))
            .await;
    }

    /// Let spawned tasks (the listener in particular) catch up.
    pub async fn settle(&self) {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }
}

/// A bridge channel served by a [`DemoHost`] on a background task.
pub struct DemoSession {
    pub channel: Arc<BridgeChannel>,
    pub host: Arc<DemoHost>,
    pub responder: JoinHandle<()>,
}

impl DemoSession {
    /// Must be called inside a tokio runtime.
    pub fn start(bridge: BridgeConfig, host_config: HostConfig) -> Self {
        let (frame, host_end) = duplex(bridge.channel_buffer);

        let host = Arc::new(DemoHost::new(&host_config));
        let responder = HostResponder::new(&host_config.protocol_tag, host.registry());
        let responder = tokio::spawn(async move {
            let _ = responder.run(&host_end, &host_end).await;
        });

        let frame = Arc::new(frame);
        let channel = match BridgeChannel::open(bridge, frame.clone(), frame) {
            Ok(channel) => Arc::new(channel),
            Err(e) => panic!("invalid test config: {e}"),
        };

        Self {
            channel,
            host,
            responder,
        }
    }

    pub fn with_defaults() -> Self {
        Self::start(BridgeConfig::default(), HostConfig::default())
    }
}
