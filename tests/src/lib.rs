//! # Mailbox IPC Test Suite
//!
//! Unified test crate for behaviour that spans the workspace crates.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Endpoints talking through a shared document
//!     ├── messaging.rs  # send / get / recv_once round trips
//!     ├── filtering.rs  # receive filter dimensions and self-exclusion
//!     └── lifecycle.rs  # batching, subscription scope, cancellation
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p mailbox-tests
//!
//! # By category
//! cargo test -p mailbox-tests integration::filtering
//!
//! # Benchmarks
//! cargo bench -p mailbox-tests
//! ```
