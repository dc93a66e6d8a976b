//! Integration flows.

pub mod correlation;
pub mod harness;
pub mod host_flows;
pub mod ordering;
