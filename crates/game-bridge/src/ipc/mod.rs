//! Request/response plumbing over the message channel.

pub mod dispatcher;
pub mod router;

pub use dispatcher::Dispatcher;
pub use router::{InboundRouter, ResponseListener, RouteOutcome};
