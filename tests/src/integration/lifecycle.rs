//! # Receive Lifecycle
//!
//! Notification batching, subscription scope, and stream cancellation.

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use std::time::Duration;
    use tokio::time::timeout;

    use mailbox_ipc::{IpcValue, Mailbox, RecvParams};
    use mailbox_telemetry::{MESSAGES_RECEIVED, MESSAGES_SENT};

    use crate::integration::connect_all;

    const WAIT: Duration = Duration::from_millis(200);
    const QUIET: Duration = Duration::from_millis(30);

    // =============================================================================
    // BATCHING
    // =============================================================================

    #[tokio::test]
    async fn test_batch_resolves_with_first_match() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob"])?;
        let bob = &others[0];

        let params = RecvParams::builder().only_keys(["a", "b"]).build();
        let mut messages = bob.recv(&params);

        // Written back to back, so delivered as one batch.
        alice.send("a", 1)?;
        alice.send("b", 2)?;

        let message = timeout(WAIT, messages.next()).await?.expect("message");
        assert_eq!(message.key, "a");

        // "b" shared the batch and is not delivered on its own.
        assert!(timeout(QUIET, messages.next()).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_batch_reads_latest_value() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob"])?;
        let bob = &others[0];

        let pending = bob.recv_once(&RecvParams::any());
        alice.send("counter", 1)?;
        alice.send("counter", 2)?;
        alice.send("counter", 3)?;

        let message = timeout(WAIT, pending).await?.expect("message");
        assert_eq!(message.value, IpcValue::Number(3.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_identical_write_is_observed() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob"])?;
        let bob = &others[0];

        alice.send("ping", true)?;
        let pending = bob.recv_once(&RecvParams::any());
        alice.send("ping", true)?;

        let message = timeout(WAIT, pending).await?.expect("message");
        assert_eq!(message.value, IpcValue::Boolean(true));
        Ok(())
    }

    // =============================================================================
    // SUBSCRIPTION SCOPE
    // =============================================================================

    #[tokio::test]
    async fn test_recv_once_is_scoped() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob"])?;
        let bob = &others[0];
        let mailbox = alice.mailbox();
        let baseline = mailbox.observer_count();

        let pending = bob.recv_once(&RecvParams::any());
        assert_eq!(mailbox.observer_count(), baseline + 1);
        alice.send("k", "v")?;
        timeout(WAIT, pending).await?.expect("message");
        assert_eq!(mailbox.observer_count(), baseline);

        // Abandoned by timeout.
        let pending = bob.recv_once(&RecvParams::builder().only_keys("never").build());
        assert!(timeout(QUIET, pending).await.is_err());
        assert_eq!(mailbox.observer_count(), baseline);
        Ok(())
    }

    #[tokio::test]
    async fn test_streams_are_independent() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob"])?;
        let bob = &others[0];

        let mut first = bob.recv(&RecvParams::any());
        let mut second = bob.recv(&RecvParams::any());
        assert_eq!(alice.mailbox().observer_count(), 2);

        alice.send("k", "shared")?;
        let a = timeout(WAIT, first.next()).await?.expect("message");
        let b = timeout(WAIT, second.next()).await?.expect("message");
        assert_eq!(a, b);

        first.cancel();
        assert!(timeout(WAIT, first.next()).await?.is_none());
        assert_eq!(alice.mailbox().observer_count(), 1);

        alice.send("k", "again")?;
        let b = timeout(WAIT, second.next()).await?.expect("message");
        assert_eq!(b.value, IpcValue::String("again".to_string()));
        Ok(())
    }

    // =============================================================================
    // CANCELLATION
    // =============================================================================

    #[tokio::test]
    async fn test_cancel_from_another_task() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob"])?;
        let bob = others[0].clone();

        let mut messages = bob.recv(&RecvParams::any());
        let handle = messages.cancel_handle();

        let consumer = tokio::spawn(async move {
            let mut received = Vec::new();
            while let Some(message) = messages.next().await {
                received.push(message.value);
            }
            received
        });

        for i in 0..3 {
            alice.send("tick", i)?;
            tokio::task::yield_now().await;
        }
        handle.cancel();

        let received = timeout(WAIT, consumer).await??;
        assert_eq!(
            received,
            vec![
                IpcValue::Number(0.0),
                IpcValue::Number(1.0),
                IpcValue::Number(2.0)
            ]
        );
        assert_eq!(alice.mailbox().observer_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_dropped_stream_releases_subscription() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob"])?;

        let messages = others[0].recv(&RecvParams::any());
        assert_eq!(alice.mailbox().observer_count(), 1);
        drop(messages);
        assert_eq!(alice.mailbox().observer_count(), 0);
        Ok(())
    }

    // =============================================================================
    // TELEMETRY
    // =============================================================================

    #[tokio::test]
    async fn test_counters_advance() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob"])?;
        let sent_before = MESSAGES_SENT.with_label_values(&["string"]).get();
        let received_before = MESSAGES_RECEIVED.get();

        let pending = others[0].recv_once(&RecvParams::any());
        alice.send("k", "counted")?;
        timeout(WAIT, pending).await?.expect("message");

        assert!(MESSAGES_SENT.with_label_values(&["string"]).get() > sent_before);
        assert!(MESSAGES_RECEIVED.get() > received_before);
        Ok(())
    }
}
