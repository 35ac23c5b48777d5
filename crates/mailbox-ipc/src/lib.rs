//! # Mailbox IPC
//!
//! Typed key/value messaging between isolated script contexts that share one
//! document element. Each message is an attribute write; receivers learn
//! about it from the element's change notifications.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): configuration and filtering, no I/O
//!   - `EndpointConfig` / `EndpointConfigBuilder`: endpoint identity and mailbox location
//!   - `RecvParams` / `RecvParamsBuilder`: receive allow-lists
//!   - `ReceiveFilter`: compiled match predicate
//!
//! - **Endpoint** (`endpoint`): `send`, `get`, `recv_once`, `recv`
//!
//! - **Stream** (`stream`): `ValueStream` and its `CancelHandle`
//!
//! The mailbox itself is reached through the `Mailbox` and
//! `MailboxAccessor` traits from `mailbox-types`; `mailbox-dom` provides an
//! in-memory implementation.
//!
//! ## Wire Format
//!
//! ```text
//! <value text> U+001E <type tag> U+001F <sender id>
//! ```
//!
//! ## Usage Example
//!
//! ```ignore
//! use mailbox_dom::MemoryDocument;
//! use mailbox_ipc::{EndpointConfigBuilder, RecvParams};
//!
//! let document = MemoryDocument::new();
//! let alice = EndpointConfigBuilder::new()
//!     .create_mailbox()
//!     .identify_as("alice")
//!     .connect(&document)?;
//! let bob = EndpointConfigBuilder::new()
//!     .identify_as("bob")
//!     .connect(&document)?;
//!
//! let pending = bob.recv_once(&RecvParams::builder().only_keys("status").build());
//! alice.send("status", 42)?;
//!
//! let message = pending.await.expect("mailbox alive");
//! assert_eq!(message.value.as_f64(), Some(42.0));
//! ```

pub mod domain;
pub mod endpoint;
pub mod stream;
mod subscription;

pub use domain::{
    EndpointConfig, EndpointConfigBuilder, OneOrMany, ReceiveFilter, RecvParams,
    RecvParamsBuilder, Rejection, DEFAULT_MAILBOX_ID, DEFAULT_MAILBOX_TAG,
};
pub use endpoint::IpcEndpoint;
pub use stream::{CancelHandle, ValueStream};

// Re-export the value model so most callers need only this crate.
pub use mailbox_types::{
    CodecError, ConfigurationError, IntoIpcValue, IpcError, IpcValue, Mailbox, MailboxAccessor,
    TypeTag, ValueDescriptor,
};
