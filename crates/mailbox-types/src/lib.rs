//! # Mailbox Types Crate
//!
//! Everything two endpoints must agree on to talk through a shared mailbox
//! element: the value model, the wire codec, the descriptor parser, the error
//! types, and the traits the host document has to provide.
//!
//! ## Wire Format
//!
//! ```text
//! <value text> U+001E <type tag> U+001F <sender id>
//! ```
//!
//! The format is a bit-exact contract between independent endpoints. Nothing
//! in it is escaped: a value or sender id containing either delimiter is
//! rejected before it reaches the mailbox.

pub mod codec;
pub mod descriptor;
pub mod errors;
pub mod mailbox;
pub mod value;

pub use codec::{SENDER_DELIM, TYPE_DELIM};
pub use descriptor::{RawDescriptor, ValueDescriptor};
pub use errors::*;
pub use mailbox::{AttributeMutation, Mailbox, MailboxAccessor, MutationStream};
pub use value::{IntoIpcValue, IpcValue, TypeTag};
