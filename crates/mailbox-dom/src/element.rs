//! # Memory Element
//!
//! An attribute store that notifies observers of every write.

use crate::DEFAULT_CHANNEL_CAPACITY;
use mailbox_types::{AttributeMutation, Mailbox, MutationStream};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// In-memory element used as a mailbox.
///
/// Uses `tokio::sync::broadcast` so any number of observers see the same
/// ordered sequence of mutation records.
pub struct MemoryElement {
    /// Element tag name.
    tag: String,

    /// Element id.
    id: String,

    /// Current attribute values.
    attributes: RwLock<HashMap<String, String>>,

    /// Broadcast sender for mutation records.
    sender: broadcast::Sender<AttributeMutation>,

    /// Total attribute writes.
    mutations_recorded: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl MemoryElement {
    /// Create an element with the default observer capacity.
    #[must_use]
    pub fn new(tag: impl Into<String>, id: impl Into<String>) -> Self {
        Self::with_capacity(tag, id, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create an element with a specific observer capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(tag: impl Into<String>, id: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            tag: tag.into(),
            id: id.into(),
            attributes: RwLock::new(HashMap::new()),
            sender,
            mutations_recorded: AtomicU64::new(0),
            capacity,
        }
    }

    /// Names of every attribute written so far.
    #[must_use]
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.attributes.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Total number of attribute writes.
    #[must_use]
    pub fn mutations_recorded(&self) -> u64 {
        self.mutations_recorded.load(Ordering::Relaxed)
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryElement")
            .field("tag", &self.tag)
            .field("id", &self.id)
            .field("observers", &self.sender.receiver_count())
            .finish_non_exhaustive()
    }
}

impl Mailbox for MemoryElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    fn get_attribute(&self, name: &str) -> Option<String> {
        self.attributes.read().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        // The value is stored before the record goes out, so observers
        // reading on notification always see this write or a later one.
        self.attributes
            .write()
            .insert(name.to_owned(), value.to_owned());
        self.mutations_recorded.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(AttributeMutation::new(name)) {
            Ok(observers) => {
                trace!(element = %self.id, attribute = name, observers, "Attribute written");
            }
            Err(_) => {
                trace!(element = %self.id, attribute = name, "Attribute written (no observers)");
            }
        }
    }

    fn observe(&self) -> MutationStream {
        let receiver = self.sender.subscribe();
        debug!(
            element = %self.id,
            observers = self.sender.receiver_count(),
            "Observer attached"
        );
        MutationStream::new(receiver)
    }

    fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
