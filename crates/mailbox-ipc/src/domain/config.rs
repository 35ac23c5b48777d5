//! Endpoint configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use mailbox_ipc::EndpointConfigBuilder;
//!
//! let endpoint = EndpointConfigBuilder::new()
//!     .mailbox_id("ipc-mailbox")
//!     .create_mailbox()
//!     .identify_as("alice")
//!     .connect(&document)?;
//! ```

use crate::endpoint::IpcEndpoint;
use mailbox_telemetry::is_truthy;
use mailbox_types::codec::contains_delimiter;
use mailbox_types::{ConfigurationError, IpcError, MailboxAccessor};
use serde::{Deserialize, Serialize};

/// Tag used when the endpoint creates its mailbox.
pub const DEFAULT_MAILBOX_TAG: &str = "div";

/// Id of the shared mailbox element.
pub const DEFAULT_MAILBOX_ID: &str = "ipc-mailbox";

/// Endpoint configuration
///
/// Missing fields fall back to the defaults when deserialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Tag name for a created mailbox
    pub mailbox_tag: String,
    /// Id of the mailbox element
    pub mailbox_id: String,
    /// Create the mailbox instead of looking it up
    pub creates_mailbox: bool,
    /// Sender identity stamped on every write
    pub sender_id: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            mailbox_tag: DEFAULT_MAILBOX_TAG.to_string(),
            mailbox_id: DEFAULT_MAILBOX_ID.to_string(),
            creates_mailbox: false,
            sender_id: None,
        }
    }
}

impl EndpointConfig {
    /// Load from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `MAILBOX_TAG` | `div` |
    /// | `MAILBOX_ID` | `ipc-mailbox` |
    /// | `MAILBOX_CREATE` | `false` |
    /// | `MAILBOX_SENDER_ID` | none |
    #[must_use]
    pub fn from_env() -> Self {
        let mut builder = EndpointConfigBuilder::new();

        if let Ok(tag) = std::env::var("MAILBOX_TAG") {
            builder = builder.mailbox_tag(tag);
        }
        if let Ok(id) = std::env::var("MAILBOX_ID") {
            builder = builder.mailbox_id(id);
        }
        if std::env::var("MAILBOX_CREATE").is_ok_and(|v| is_truthy(&v)) {
            builder = builder.create_mailbox();
        }
        if let Ok(sender_id) = std::env::var("MAILBOX_SENDER_ID") {
            builder = builder.identify_as(sender_id);
        }

        builder.build()
    }

    /// Validate the sender identity and return it.
    ///
    /// # Errors
    ///
    /// - `MissingSenderId` if no sender id is set, or it is empty
    /// - `InvalidSenderId` if it contains a wire delimiter
    pub fn validate(&self) -> Result<&str, ConfigurationError> {
        let sender_id = match self.sender_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => return Err(ConfigurationError::MissingSenderId),
        };

        // A delimiter here would corrupt every descriptor this endpoint writes.
        if contains_delimiter(sender_id) {
            return Err(ConfigurationError::InvalidSenderId {
                sender_id: sender_id.to_string(),
            });
        }

        Ok(sender_id)
    }
}

/// Builder for EndpointConfig
///
/// Empty strings are treated as unset and fall back to the defaults.
///
/// # Example
///
/// ```ignore
/// let config = EndpointConfigBuilder::new()
///     .mailbox_tag("span")
///     .mailbox_id("side-channel")
///     .identify_as("worker-1")
///     .build();
/// ```
#[derive(Clone, Debug, Default)]
pub struct EndpointConfigBuilder {
    mailbox_tag: Option<String>,
    mailbox_id: Option<String>,
    creates_mailbox: bool,
    sender_id: Option<String>,
}

impl EndpointConfigBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag name used when creating the mailbox
    #[must_use]
    pub fn mailbox_tag(mut self, tag: impl Into<String>) -> Self {
        self.mailbox_tag = Some(tag.into());
        self
    }

    /// Set the mailbox element id
    #[must_use]
    pub fn mailbox_id(mut self, id: impl Into<String>) -> Self {
        self.mailbox_id = Some(id.into());
        self
    }

    /// Create the mailbox on connect instead of looking it up
    #[must_use]
    pub fn create_mailbox(mut self) -> Self {
        self.creates_mailbox = true;
        self
    }

    /// Set the sender identity
    #[must_use]
    pub fn identify_as(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    /// Build the EndpointConfig
    ///
    /// The sender id is checked when the endpoint is constructed, not here.
    #[must_use]
    pub fn build(self) -> EndpointConfig {
        let defaults = EndpointConfig::default();

        EndpointConfig {
            mailbox_tag: non_empty(self.mailbox_tag).unwrap_or(defaults.mailbox_tag),
            mailbox_id: non_empty(self.mailbox_id).unwrap_or(defaults.mailbox_id),
            creates_mailbox: self.creates_mailbox,
            sender_id: self.sender_id,
        }
    }

    /// Build the config and construct an endpoint from it.
    ///
    /// # Errors
    ///
    /// See [`IpcEndpoint::new`].
    pub fn connect(self, accessor: &dyn MailboxAccessor) -> Result<IpcEndpoint, IpcError> {
        IpcEndpoint::new(self.build(), accessor)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
