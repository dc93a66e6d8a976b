//! # Game Bridge Test Suite
//!
//! Cross-crate integration flows between the game-side bridge and the host
//! responder.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs       # Bridge channel wired to a scriptable host end
//!     ├── correlation.rs   # Request/response matching, timeouts, errors
//!     ├── ordering.rs      # Property: any reply order settles every caller
//!     └── host_flows.rs    # Full sessions against the demo host
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p bridge-tests
//!
//! # By category
//! cargo test -p bridge-tests integration::correlation::
//! cargo test -p bridge-tests integration::host_flows::
//! ```

pub mod integration;
