//! # Memory Document
//!
//! Owns the elements attached under the document body and resolves them by
//! id for endpoints.

use crate::element::MemoryElement;
use crate::DEFAULT_CHANNEL_CAPACITY;
use mailbox_types::{Mailbox, MailboxAccessor};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// An in-memory document body.
///
/// Lookups return the first attached element with the requested id; an
/// element created later with a duplicate id is attached but never found.
#[derive(Debug)]
pub struct MemoryDocument {
    /// Elements in attachment order.
    body: RwLock<Vec<Arc<MemoryElement>>>,

    /// Observer capacity for new elements.
    capacity: usize,
}

impl MemoryDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create an empty document whose elements buffer `capacity` mutations
    /// per observer. Zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            body: RwLock::new(Vec::new()),
            capacity,
        }
    }

    /// Number of elements attached under the body.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.body.read().len()
    }

    /// Typed lookup, for callers that need `MemoryElement` specifics.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<Arc<MemoryElement>> {
        self.body.read().iter().find(|e| e.id() == id).cloned()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MailboxAccessor for MemoryDocument {
    fn create_element(&self, tag: &str, id: &str) -> Arc<dyn Mailbox> {
        let element = Arc::new(MemoryElement::with_capacity(tag, id, self.capacity));
        self.body.write().push(Arc::clone(&element));
        debug!(tag, id, "Element attached to body");
        element
    }

    fn get_element_by_id(&self, id: &str) -> Option<Arc<dyn Mailbox>> {
        self.element(id).map(|e| e as Arc<dyn Mailbox>)
    }
}
