//! Channel ownership.
//!
//! A [`BridgeChannel`] owns everything one message channel needs: the
//! pending table, the dispatcher and exactly one inbound listener. A
//! [`BridgeContext`] is created once at startup and passed to whoever needs
//! the bridge; it opens its channel on first use.

use crate::domain::{
    BridgeConfig, BridgeResult, ConfigError, PendingReply, PendingRequestTable, PendingStats,
};
use crate::ipc::{Dispatcher, InboundRouter, ResponseListener, RouteOutcome};
use crate::sdk::GameSdk;
use crate::transport::{MessagePort, MessageSource};
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// A live bridge over one message channel.
pub struct BridgeChannel {
    config: BridgeConfig,
    pending: Arc<PendingRequestTable>,
    dispatcher: Dispatcher,
    router: InboundRouter,
    listener: JoinHandle<()>,
}

impl BridgeChannel {
    /// Validate `config` and start the channel.
    pub fn open(
        config: BridgeConfig,
        port: Arc<dyn MessagePort>,
        source: Arc<dyn MessageSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(config, port, source))
    }

    /// Start the channel with an already validated config.
    ///
    /// Spawns the inbound listener, so this must run inside a tokio runtime.
    fn start(
        config: BridgeConfig,
        port: Arc<dyn MessagePort>,
        source: Arc<dyn MessageSource>,
    ) -> Self {
        let pending = Arc::new(PendingRequestTable::new());
        let dispatcher = Dispatcher::new(pending.clone(), port, &config);
        let router = InboundRouter::new(pending.clone());
        let listener = tokio::spawn(ResponseListener::new(router.clone(), source).run());

        debug!(protocol_tag = %config.protocol_tag, "Opened bridge channel");

        Self {
            config,
            pending,
            dispatcher,
            router,
            listener,
        }
    }

    /// Send a request and wait for its answer, using the default timeout.
    pub async fn dispatch(&self, action: &str, data: Option<Value>) -> BridgeResult<Option<Value>> {
        self.dispatcher.dispatch(action, data).await
    }

    /// Send a request and wait for its answer. `Duration::ZERO` waits indefinitely.
    pub async fn dispatch_with_timeout(
        &self,
        action: &str,
        data: Option<Value>,
        timeout: Duration,
    ) -> BridgeResult<Option<Value>> {
        self.dispatcher
            .dispatch_with_timeout(action, data, timeout)
            .await
    }

    /// Post a request and return a handle to its answer.
    pub async fn send_request(
        &self,
        action: &str,
        data: Option<Value>,
        timeout: Duration,
    ) -> BridgeResult<PendingReply> {
        self.dispatcher.send_request(action, data, timeout).await
    }

    /// Feed one inbound message directly, for environments that push
    /// messages through a callback instead of a [`MessageSource`].
    pub fn on_message(&self, message: &Value) -> RouteOutcome {
        self.router.route(message)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn pending_count(&self) -> usize {
        self.pending.pending_count()
    }

    pub fn stats(&self) -> &PendingStats {
        self.pending.stats()
    }

    /// Whether the inbound listener is still running.
    pub fn is_listening(&self) -> bool {
        !self.listener.is_finished()
    }
}

impl Drop for BridgeChannel {
    fn drop(&mut self) {
        self.listener.abort();
        self.pending.close();
    }
}

/// Startup-created owner of the process's bridge channel.
pub struct BridgeContext {
    config: BridgeConfig,
    port: Arc<dyn MessagePort>,
    source: Arc<dyn MessageSource>,
    channel: OnceLock<Arc<BridgeChannel>>,
}

impl BridgeContext {
    pub fn new(
        config: BridgeConfig,
        port: Arc<dyn MessagePort>,
        source: Arc<dyn MessageSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            port,
            source,
            channel: OnceLock::new(),
        })
    }

    /// The channel, opened on first call. Every call returns the same one.
    ///
    /// The first call must happen inside a tokio runtime.
    pub fn channel(&self) -> Arc<BridgeChannel> {
        self.channel
            .get_or_init(|| {
                Arc::new(BridgeChannel::start(
                    self.config.clone(),
                    self.port.clone(),
                    self.source.clone(),
                ))
            })
            .clone()
    }

    pub fn is_open(&self) -> bool {
        self.channel.get().is_some()
    }

    /// Typed SDK over this context's channel.
    pub fn sdk(&self) -> GameSdk {
        GameSdk::new(self.channel())
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}
