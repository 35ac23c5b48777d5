//! # Mailbox DOM - In-Memory Document
//!
//! A host document for mailbox endpoints that runs without a browser.
//! Elements store string attributes and broadcast an attribute-change record
//! on every write, the way a mutation observer sees a DOM element.
//!
//! ```text
//! ┌──────────────┐  set_attribute()   ┌───────────────┐
//! │  Endpoint A  │ ─────────────────▶ │ MemoryElement │
//! └──────────────┘                    │  attributes   │
//!                                     │  broadcast    │
//! ┌──────────────┐  observe()         └───────┬───────┘
//! │  Endpoint B  │ ◀──────────────────────────┘
//! └──────────────┘
//! ```
//!
//! ## Semantics
//!
//! - **Last write wins** per attribute, no history.
//! - **Every write notifies**, including a write of an identical value.
//! - **No replay**: observers only see writes made after they subscribed.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod document;
pub mod element;

pub use document::MemoryDocument;
pub use element::MemoryElement;

/// Mutations buffered per observer before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
