//! # Mailbox Collaborator
//!
//! The host-side surface the endpoint depends on: an element that stores
//! string attributes and reports attribute changes, and an accessor that
//! creates or finds that element in the document.
//!
//! Change notifications are delivered in batches. Every mutation recorded
//! before the observer next runs is handed over together, in write order.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// A single attribute-change record.
///
/// Like a DOM mutation record it names the attribute only; observers read
/// the current value from the element when they process the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMutation {
    /// Name of the attribute that was written.
    pub attribute_name: String,
}

impl AttributeMutation {
    #[must_use]
    pub fn new(attribute_name: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
        }
    }
}

/// A live subscription to an element's attribute changes.
///
/// Dropping the stream releases the subscription.
#[derive(Debug)]
pub struct MutationStream {
    receiver: broadcast::Receiver<AttributeMutation>,
}

impl MutationStream {
    /// Wrap the receiving half of an element's mutation channel.
    #[must_use]
    pub fn new(receiver: broadcast::Receiver<AttributeMutation>) -> Self {
        Self { receiver }
    }

    /// Wait for the next batch of mutations.
    ///
    /// Suspends until at least one mutation is available, then drains every
    /// mutation already queued behind it.
    ///
    /// # Returns
    ///
    /// - `Some(batch)` - One or more mutations in write order
    /// - `None` - The element was dropped
    pub async fn next_batch(&mut self) -> Option<Vec<AttributeMutation>> {
        let first = loop {
            match self.receiver.recv().await {
                Ok(mutation) => break mutation,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Observer lagged, mutations dropped");
                }
            }
        };

        let mut batch = vec![first];
        loop {
            match self.receiver.try_recv() {
                Ok(mutation) => batch.push(mutation),
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    debug!(lagged = count, "Observer lagged, mutations dropped");
                }
                Err(_) => break,
            }
        }

        Some(batch)
    }
}

/// An element used as a shared mailbox.
pub trait Mailbox: Send + Sync {
    /// The element id.
    fn id(&self) -> &str;

    /// The element tag name.
    fn tag(&self) -> &str;

    /// Read an attribute. `None` if it was never written.
    fn get_attribute(&self, name: &str) -> Option<String>;

    /// Write an attribute and notify observers.
    fn set_attribute(&self, name: &str, value: &str);

    /// Start observing attribute changes.
    fn observe(&self) -> MutationStream;

    /// Number of live observers.
    fn observer_count(&self) -> usize;
}

/// Locates or creates mailbox elements in the host document.
pub trait MailboxAccessor: Send + Sync {
    /// Create an element and attach it under the document body.
    fn create_element(&self, tag: &str, id: &str) -> Arc<dyn Mailbox>;

    /// Look up an attached element by id.
    fn get_element_by_id(&self, id: &str) -> Option<Arc<dyn Mailbox>>;
}
