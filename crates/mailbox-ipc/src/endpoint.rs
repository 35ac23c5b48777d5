//! # Ipc Endpoint
//!
//! One participant on a shared mailbox. An endpoint writes typed values under
//! attribute keys, stamped with its sender id, and receives the writes of
//! other endpoints through filtered change notifications.

use crate::domain::{EndpointConfig, ReceiveFilter, RecvParams};
use crate::stream::ValueStream;
use crate::subscription::Receiver;
use mailbox_telemetry::{endpoint_span, metric_inc, MESSAGES_SENT, SEND_ERRORS};
use mailbox_types::codec::{add_sender, encode};
use mailbox_types::descriptor::split_attribute;
use mailbox_types::{
    ConfigurationError, IntoIpcValue, IpcError, Mailbox, MailboxAccessor, ValueDescriptor,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A mailbox endpoint.
///
/// Cloning shares the mailbox and identity.
#[derive(Clone)]
pub struct IpcEndpoint {
    config: EndpointConfig,
    sender_id: String,
    mailbox: Arc<dyn Mailbox>,
}

impl IpcEndpoint {
    /// Construct an endpoint and resolve its mailbox.
    ///
    /// The mailbox is created or looked up exactly once, here, and held for
    /// the lifetime of the endpoint.
    ///
    /// # Errors
    ///
    /// - `MissingSenderId` / `InvalidSenderId` for a bad sender identity
    /// - `MailboxNotFound` when looking up an element that does not exist
    pub fn new(config: EndpointConfig, accessor: &dyn MailboxAccessor) -> Result<Self, IpcError> {
        let sender_id = config.validate()?.to_string();

        let mailbox = if config.creates_mailbox {
            accessor.create_element(&config.mailbox_tag, &config.mailbox_id)
        } else {
            accessor
                .get_element_by_id(&config.mailbox_id)
                .ok_or_else(|| {
                    warn!(id = %config.mailbox_id, "Mailbox element not found");
                    ConfigurationError::MailboxNotFound {
                        id: config.mailbox_id.clone(),
                    }
                })?
        };

        info!(
            sender = %sender_id,
            mailbox = %config.mailbox_id,
            created = config.creates_mailbox,
            "Endpoint connected"
        );

        Ok(Self {
            config,
            sender_id,
            mailbox,
        })
    }

    /// The identity stamped on every write.
    #[must_use]
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// The resolved mailbox.
    #[must_use]
    pub fn mailbox(&self) -> &Arc<dyn Mailbox> {
        &self.mailbox
    }

    #[must_use]
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Write `value` under `key`.
    ///
    /// Nothing is written when the value cannot be encoded.
    ///
    /// # Errors
    ///
    /// - `UnsupportedType` for objects and arrays
    /// - `DelimiterInValue` when the value text contains a wire delimiter
    pub fn send(&self, key: &str, value: impl IntoIpcValue) -> Result<(), IpcError> {
        let _span = endpoint_span!("send", sender = %self.sender_id, key).entered();

        let encoded = value
            .into_ipc_value()
            .and_then(|value| {
                let encoded = encode(&value)?;
                Ok((value.type_tag(), encoded))
            })
            .map_err(|e| {
                let err = IpcError::from(e);
                metric_inc!(SEND_ERRORS, &[err.kind()]);
                warn!(error = %err, "Send rejected");
                err
            });
        let (type_tag, encoded) = encoded?;

        self.mailbox
            .set_attribute(key, &add_sender(&encoded, &self.sender_id));

        metric_inc!(MESSAGES_SENT, &[type_tag.as_str()]);
        debug!(%type_tag, "Message sent");
        Ok(())
    }

    /// Read and decode the current value under `key`.
    ///
    /// Returns `None` when the attribute is absent or empty.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ValueDescriptor> {
        let raw = split_attribute(self.mailbox.get_attribute(key).as_deref());
        if raw.is_empty() {
            return None;
        }
        Some(ValueDescriptor::from_raw(key, &raw))
    }

    /// Compile receive parameters against this endpoint's identity.
    #[must_use]
    pub fn receive_filter(&self, params: &RecvParams) -> ReceiveFilter {
        ReceiveFilter::new(params, &self.sender_id)
    }

    /// Wait for the first write that passes `params`.
    ///
    /// The subscription is opened when this method is called, not when the
    /// future is first polled, so writes made after the call are seen. It is
    /// released when the future completes or is dropped.
    ///
    /// Resolves to `None` only if the mailbox closes its change stream. The
    /// subscription keeps the mailbox alive, so a `MemoryElement` never does.
    pub fn recv_once(
        &self,
        params: &RecvParams,
    ) -> impl Future<Output = Option<ValueDescriptor>> + Send + 'static {
        let mut receiver = self.subscribe(params);
        async move { receiver.next_match().await }
    }

    /// Receive every write that passes `params`, as a stream.
    ///
    /// Each call opens an independent subscription. Writes made while the
    /// consumer is busy are queued, but within one notification batch only
    /// the first match is yielded.
    #[must_use]
    pub fn recv(&self, params: &RecvParams) -> ValueStream {
        ValueStream::new(self.subscribe(params))
    }

    fn subscribe(&self, params: &RecvParams) -> Receiver {
        debug!(sender = %self.sender_id, ?params, "Opening receive");
        Receiver::subscribe(Arc::clone(&self.mailbox), self.receive_filter(params))
    }
}

impl std::fmt::Debug for IpcEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpcEndpoint")
            .field("sender_id", &self.sender_id)
            .field("mailbox_id", &self.mailbox.id())
            .field("mailbox_tag", &self.mailbox.tag())
            .finish()
    }
}
