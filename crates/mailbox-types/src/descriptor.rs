//! # Descriptor Parser
//!
//! Splits a raw attribute value into its three wire fields and carries the
//! decoded result handed to receivers.

use crate::codec::{decode, SENDER_DELIM, TYPE_DELIM};
use crate::value::IpcValue;
use serde::{Deserialize, Serialize};

/// The three wire fields of an attribute value, not yet decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDescriptor {
    /// Value text, everything before the first type delimiter.
    pub value: Option<String>,
    /// Type tag literal.
    pub type_tag: Option<String>,
    /// Sender id.
    pub sender: Option<String>,
}

impl RawDescriptor {
    /// Decode the value text according to the type tag.
    #[must_use]
    pub fn decode(&self) -> IpcValue {
        decode(self.value.as_deref(), self.type_tag.as_deref())
    }

    /// Whether every field is missing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.type_tag.is_none() && self.sender.is_none()
    }
}

/// Split a raw wire string.
///
/// Splits once on the type delimiter, then splits the remainder once on the
/// sender delimiter. An empty string yields an all-`None` descriptor.
#[must_use]
pub fn split(raw: &str) -> RawDescriptor {
    if raw.is_empty() {
        return RawDescriptor::default();
    }

    let Some((value, rest)) = raw.split_once(TYPE_DELIM) else {
        return RawDescriptor {
            value: Some(raw.to_owned()),
            ..RawDescriptor::default()
        };
    };

    let (type_tag, sender) = match rest.split_once(SENDER_DELIM) {
        Some((tag, sender)) => (tag, Some(sender.to_owned())),
        None => (rest, None),
    };

    RawDescriptor {
        value: Some(value.to_owned()),
        type_tag: Some(type_tag.to_owned()),
        sender,
    }
}

/// Split an attribute that may be absent.
#[must_use]
pub fn split_attribute(raw: Option<&str>) -> RawDescriptor {
    raw.map(split).unwrap_or_default()
}

/// A decoded message as delivered to receivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDescriptor {
    /// Attribute name the value was written under.
    pub key: String,
    /// Decoded value.
    pub value: IpcValue,
    /// Sender id, if the descriptor carried one.
    pub sender: Option<String>,
}

impl ValueDescriptor {
    /// Build a descriptor from a key and its raw wire fields.
    #[must_use]
    pub fn from_raw(key: impl Into<String>, raw: &RawDescriptor) -> Self {
        Self {
            key: key.into(),
            value: raw.decode(),
            sender: raw.sender.clone(),
        }
    }
}
