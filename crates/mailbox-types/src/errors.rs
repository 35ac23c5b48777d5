//! # Error Types
//!
//! Defines the errors an endpoint can surface. Decode problems are not
//! errors: they degrade to `IpcValue::Undefined`.

use thiserror::Error;

/// Errors raised while turning a value into its wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The value has no encoder (objects, arrays).
    #[error("Unsupported type: value of type {type_name} cannot be sent")]
    UnsupportedType { type_name: String },

    /// The value text contains one of the reserved wire delimiters.
    #[error("Value text contains a reserved wire delimiter")]
    DelimiterInValue,
}

/// Errors raised while constructing an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No sender id was given, or it was empty.
    #[error("Sender id must be specified and non-empty")]
    MissingSenderId,

    /// The sender id contains a reserved wire delimiter.
    #[error("Sender id {sender_id:?} contains a reserved wire delimiter")]
    InvalidSenderId { sender_id: String },

    /// Lookup mode was requested but no element carries the id.
    #[error("Mailbox element not found: {id}")]
    MailboxNotFound { id: String },
}

/// Top-level error for endpoint operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IpcError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

impl IpcError {
    /// Short label used for metrics and structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Codec(CodecError::UnsupportedType { .. }) => "unsupported_type",
            Self::Codec(CodecError::DelimiterInValue) => "delimiter_in_value",
        }
    }
}
