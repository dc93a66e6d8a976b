//! # Host Responder
//!
//! The host side of the game bridge. Decodes requests arriving from the
//! game frame, routes them to the handler registered for their action, and
//! posts back exactly one response per request.
//!
//! ```text
//!  game frame ──request──► HostResponder ──► ActionRegistry ──► ActionHandler
//!      ▲                        │
//!      └───────response─────────┘
//! ```
//!
//! Unknown or unregistered actions are answered with a system error rather
//! than left to time out on the game side.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod demo;
pub mod error;
pub mod registry;
pub mod responder;

pub use config::{HostConfig, PlayerSeed};
pub use demo::DemoHost;
pub use error::HostError;
pub use registry::{ActionHandler, ActionRegistry, FnHandler, HandlerResult};
pub use responder::HostResponder;
