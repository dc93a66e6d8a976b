//! # Game Bridge
//!
//! Request/response correlation for a game running inside a host frame.
//!
//! The only link between game and host is a fire-and-forget message
//! channel. This crate gives each outbound call a fresh request id, parks
//! the caller in a pending table, and settles it when a response echoing
//! that id arrives, when the per-request timer runs out, or when the post
//! itself fails.
//!
//! ## Architecture
//!
//! ```text
//!   GameSdk ──► Dispatcher ──register──► PendingRequestTable ◄──complete── InboundRouter
//!                   │                         ▲ expire                          ▲
//!                   │ post_message            │                                 │ route
//!                   ▼                      timer task                   ResponseListener
//!              MessagePort                                                      ▲
//!                   │                                                           │ next_message
//!                   └──────────────────────► host frame ──────────────────► MessageSource
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use game_bridge::{BridgeConfig, BridgeContext};
//! use game_bridge::transport::memory::duplex;
//!
//! let (frame, host) = duplex(64);
//! let frame = Arc::new(frame);
//! let ctx = BridgeContext::new(BridgeConfig::from_env(), frame.clone(), frame)?;
//! let player = ctx.sdk().get_player().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod channel;
pub mod domain;
pub mod ipc;
pub mod sdk;
pub mod transport;

// Re-exports for public API
pub use channel::{BridgeChannel, BridgeContext};
pub use domain::{
    BridgeConfig, BridgeError, BridgeResult, ConfigError, PendingReply, PendingRequestTable,
    PendingStatsSnapshot,
};
pub use ipc::{Dispatcher, InboundRouter, ResponseListener, RouteOutcome};
pub use sdk::GameSdk;
pub use transport::{MessagePort, MessageSource, ReceiveBackoff, TransportError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
