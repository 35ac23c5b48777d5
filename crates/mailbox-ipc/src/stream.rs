//! # Value Stream
//!
//! Continuous receive. A `ValueStream` yields one descriptor per matching
//! change event until it is cancelled or dropped. It also ends if the mailbox
//! closes its change stream, which a `MemoryElement` never does while the
//! stream holds a reference to it.

use crate::subscription::Receiver;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use mailbox_types::ValueDescriptor;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::watch;
use tracing::debug;

/// Stops a [`ValueStream`] from another task.
///
/// Cloning is cheap; every clone cancels the same stream.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    shutdown_tx: std::sync::Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Cancel the stream. It yields `None` on its next poll.
    pub fn cancel(&self) {
        // send_replace stores the flag even with no receiver left.
        self.shutdown_tx.send_replace(true);
    }

    /// Whether `cancel` has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.shutdown_tx.borrow()
    }
}

/// An unbounded stream of received descriptors.
pub struct ValueStream {
    inner: Option<BoxStream<'static, ValueDescriptor>>,
    cancel: CancelHandle,
}

impl ValueStream {
    pub(crate) fn new(receiver: Receiver) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let inner = stream::unfold(
            (receiver, shutdown_rx),
            |(mut receiver, mut shutdown_rx)| async move {
                if *shutdown_rx.borrow() {
                    return None;
                }

                let next = tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => None,
                    descriptor = receiver.next_match() => descriptor,
                };

                next.map(|descriptor| (descriptor, (receiver, shutdown_rx)))
            },
        )
        .boxed();

        Self {
            inner: Some(inner),
            cancel: CancelHandle {
                shutdown_tx: std::sync::Arc::new(shutdown_tx),
            },
        }
    }

    /// A handle that cancels this stream.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Cancel this stream.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the stream has ended.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

impl Stream for ValueStream {
    type Item = ValueDescriptor;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(inner) = self.inner.as_mut() else {
            return Poll::Ready(None);
        };

        match inner.as_mut().poll_next(cx) {
            Poll::Ready(None) => {
                // Drop the receiver now rather than with the stream.
                self.inner = None;
                debug!("Value stream ended");
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl std::fmt::Debug for ValueStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueStream")
            .field("terminated", &self.is_terminated())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
