//! Domain types for the bridge client.
//!
//! Configuration, errors, request id allocation and the pending request
//! table. Nothing here touches the transport.

pub mod config;
pub mod correlation;
pub mod error;
pub mod pending;

// Re-exports for convenience
pub use config::{BridgeConfig, ConfigError};
pub use correlation::RequestIdAllocator;
pub use error::{BridgeError, BridgeResult};
pub use pending::{
    PendingReply, PendingRequestTable, PendingStats, PendingStatsSnapshot, Settlement,
};
