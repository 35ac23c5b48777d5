//! # Scoped Subscription
//!
//! A mailbox observer owned by one receive operation, plus the loop that
//! runs change events through a receive filter.

use crate::domain::ReceiveFilter;
use mailbox_telemetry::{
    metric_inc, time_histogram, ACTIVE_SUBSCRIPTIONS, FILTER_REJECTIONS, MESSAGES_RECEIVED,
};
use mailbox_types::descriptor::split_attribute;
use mailbox_types::{Mailbox, MutationStream, ValueDescriptor};
use std::sync::Arc;
use tracing::{debug, trace};

/// Receives matching descriptors from one mailbox.
///
/// The observer is attached on construction and released on drop, so a
/// receive never holds a subscription longer than the value that owns it.
pub(crate) struct Receiver {
    mailbox: Arc<dyn Mailbox>,
    filter: ReceiveFilter,
    mutations: MutationStream,
}

impl Receiver {
    pub(crate) fn subscribe(mailbox: Arc<dyn Mailbox>, filter: ReceiveFilter) -> Self {
        let mutations = mailbox.observe();
        ACTIVE_SUBSCRIPTIONS.inc();
        debug!(mailbox = mailbox.id(), "Subscription opened");

        Self {
            mailbox,
            filter,
            mutations,
        }
    }

    /// Wait for the first change event that passes the filter.
    ///
    /// Returns `None` if the mailbox closes its change stream.
    pub(crate) async fn next_match(&mut self) -> Option<ValueDescriptor> {
        let _timer = time_histogram!(mailbox_telemetry::RECEIVE_WAIT);

        loop {
            let batch = self.mutations.next_batch().await?;
            trace!(events = batch.len(), "Mutation batch");

            // The first accepted event resolves; the rest of the batch is dropped.
            if let Some(descriptor) = batch
                .iter()
                .find_map(|mutation| self.evaluate(&mutation.attribute_name))
            {
                MESSAGES_RECEIVED.inc();
                debug!(
                    key = %descriptor.key,
                    sender = ?descriptor.sender,
                    "Message received"
                );
                return Some(descriptor);
            }
        }
    }

    fn evaluate(&self, key: &str) -> Option<ValueDescriptor> {
        if let Err(rejection) = self.filter.check_key(key) {
            metric_inc!(FILTER_REJECTIONS, &[rejection.as_str()]);
            return None;
        }

        // Read at processing time: a later write to the same key wins.
        let raw = split_attribute(self.mailbox.get_attribute(key).as_deref());

        if let Err(rejection) = self.filter.check_descriptor(&raw) {
            trace!(key, reason = rejection.as_str(), "Event filtered");
            metric_inc!(FILTER_REJECTIONS, &[rejection.as_str()]);
            return None;
        }

        Some(ValueDescriptor::from_raw(key, &raw))
    }
}

impl Drop for Receiver {
    fn drop(&mut self) {
        ACTIVE_SUBSCRIPTIONS.dec();
        debug!(mailbox = self.mailbox.id(), "Subscription released");
    }
}
