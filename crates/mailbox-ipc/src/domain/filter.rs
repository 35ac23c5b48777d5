//! # Receive Filter
//!
//! Decides which change events a receive operation accepts.
//!
//! Each dimension is an allow-list; an empty list accepts anything. Matching
//! is inclusive-OR within a dimension and AND across dimensions:
//!
//! ```text
//! (no key filter    OR key    ∈ keys)
//! AND (no sender filter OR sender ∈ senders)
//! AND (no value filter  OR raw value ∈ values)
//! ```
//!
//! The endpoint's own writes are excluded unless the parameters opt in with
//! `accept_from_myself`, in which case the own id joins the sender list.

use mailbox_types::RawDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Receive filter parameters
///
/// Value entries are compared with the raw value text as written on the
/// wire (`"42"`, `"true"`, `"null"`), not with the decoded value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecvParams {
    /// Accepted sender ids
    pub sender_ids: Vec<String>,
    /// Accepted attribute names
    pub keys: Vec<String>,
    /// Accepted raw value texts
    pub values: Vec<String>,
    /// Also accept writes made by the receiving endpoint
    pub accept_from_myself: bool,
}

impl RecvParams {
    /// Parameters that accept every write from other endpoints.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Start building parameters.
    #[must_use]
    pub fn builder() -> RecvParamsBuilder {
        RecvParamsBuilder::new()
    }
}

/// A single entry or a collection of entries for one filter dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(entry) => vec![entry],
            Self::Many(entries) => entries,
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(entry: &str) -> Self {
        Self::One(entry.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(entry: String) -> Self {
        Self::One(entry)
    }
}

impl From<&String> for OneOrMany {
    fn from(entry: &String) -> Self {
        Self::One(entry.clone())
    }
}

impl<S: Into<String>> From<Vec<S>> for OneOrMany {
    fn from(entries: Vec<S>) -> Self {
        Self::Many(entries.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for OneOrMany {
    fn from(entries: [S; N]) -> Self {
        Self::Many(entries.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String> + Clone> From<&[S]> for OneOrMany {
    fn from(entries: &[S]) -> Self {
        Self::Many(entries.iter().cloned().map(Into::into).collect())
    }
}

impl<S: Into<String>> FromIterator<S> for OneOrMany {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::Many(iter.into_iter().map(Into::into).collect())
    }
}

/// Builder for RecvParams
///
/// Repeated calls extend a dimension rather than replacing it.
///
/// # Example
///
/// ```ignore
/// let params = RecvParamsBuilder::new()
///     .only_from(["alice", "carol"])
///     .only_keys("status")
///     .build();
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecvParamsBuilder {
    params: RecvParams,
}

impl RecvParamsBuilder {
    /// Create a builder that accepts everything from other endpoints
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept writes from the given sender id(s)
    #[must_use]
    pub fn only_from(mut self, senders: impl Into<OneOrMany>) -> Self {
        self.params.sender_ids.extend(senders.into().into_vec());
        self
    }

    /// Accept writes to the given key(s)
    #[must_use]
    pub fn only_keys(mut self, keys: impl Into<OneOrMany>) -> Self {
        self.params.keys.extend(keys.into().into_vec());
        self
    }

    /// Accept the given raw value text(s)
    #[must_use]
    pub fn only_values(mut self, values: impl Into<OneOrMany>) -> Self {
        self.params.values.extend(values.into().into_vec());
        self
    }

    /// Also accept writes made by the receiving endpoint
    #[must_use]
    pub fn accept_from_myself(mut self) -> Self {
        self.params.accept_from_myself = true;
        self
    }

    #[must_use]
    pub fn build(self) -> RecvParams {
        self.params
    }
}

/// Why a change event was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Key not in the key allow-list
    Key,
    /// Sender missing or not in the sender allow-list
    Sender,
    /// Written by the receiving endpoint itself
    OwnWrite,
    /// Raw value missing or not in the value allow-list
    Value,
}

impl Rejection {
    /// Metric label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Sender => "sender",
            Self::OwnWrite => "self",
            Self::Value => "value",
        }
    }
}

/// A compiled receive filter bound to one endpoint identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReceiveFilter {
    senders: HashSet<String>,
    keys: HashSet<String>,
    values: HashSet<String>,
    excluded_sender: Option<String>,
}

impl ReceiveFilter {
    /// Compile `params` for an endpoint identified as `own_sender_id`.
    #[must_use]
    pub fn new(params: &RecvParams, own_sender_id: &str) -> Self {
        let mut senders: HashSet<String> = params.sender_ids.iter().cloned().collect();

        let excluded_sender = if params.accept_from_myself {
            senders.insert(own_sender_id.to_string());
            None
        } else {
            Some(own_sender_id.to_string())
        };

        Self {
            senders,
            keys: params.keys.iter().cloned().collect(),
            values: params.values.iter().cloned().collect(),
            excluded_sender,
        }
    }

    /// Check an attribute name against the key allow-list.
    pub fn check_key(&self, key: &str) -> Result<(), Rejection> {
        if self.keys.is_empty() || self.keys.contains(key) {
            Ok(())
        } else {
            Err(Rejection::Key)
        }
    }

    /// Check a parsed descriptor against the sender and value allow-lists.
    pub fn check_descriptor(&self, raw: &RawDescriptor) -> Result<(), Rejection> {
        let sender = raw.sender.as_deref();

        if self.excluded_sender.is_some() && sender == self.excluded_sender.as_deref() {
            return Err(Rejection::OwnWrite);
        }

        if !self.senders.is_empty() && !sender.is_some_and(|s| self.senders.contains(s)) {
            return Err(Rejection::Sender);
        }

        if !self.values.is_empty()
            && !raw
                .value
                .as_deref()
                .is_some_and(|v| self.values.contains(v))
        {
            return Err(Rejection::Value);
        }

        Ok(())
    }

    /// Whether an event for `key` carrying `raw` passes every dimension.
    #[must_use]
    pub fn matches(&self, key: &str, raw: &RawDescriptor) -> bool {
        self.check_key(key).is_ok() && self.check_descriptor(raw).is_ok()
    }
}
