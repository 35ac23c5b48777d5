//! # Receive Filtering
//!
//! Filter dimensions combine with AND, entries within a dimension with OR,
//! and an endpoint never hears itself unless it asks to.

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use std::time::Duration;
    use tokio::time::timeout;

    use mailbox_ipc::{IpcValue, RecvParams};

    use crate::integration::connect_all;

    const WAIT: Duration = Duration::from_millis(200);
    const QUIET: Duration = Duration::from_millis(30);

    #[tokio::test]
    async fn test_filter_conjunction() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob", "carol"])?;
        let (bob, carol) = (&others[0], &others[1]);

        let params = RecvParams::builder()
            .only_from("alice")
            .only_keys("status")
            .only_values("ready")
            .build();
        let mut messages = bob.recv(&params);

        // Each write fails exactly one dimension.
        carol.send("status", "ready")?;
        assert!(timeout(QUIET, messages.next()).await.is_err());
        alice.send("other", "ready")?;
        assert!(timeout(QUIET, messages.next()).await.is_err());
        alice.send("status", "busy")?;
        assert!(timeout(QUIET, messages.next()).await.is_err());

        alice.send("status", "ready")?;
        let message = timeout(WAIT, messages.next()).await?.expect("message");
        assert_eq!(message.key, "status");
        assert_eq!(message.value, IpcValue::String("ready".to_string()));
        assert_eq!(message.sender.as_deref(), Some("alice"));
        Ok(())
    }

    #[tokio::test]
    async fn test_senders_are_alternatives() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob", "carol", "dave"])?;
        let (bob, carol, dave) = (&others[0], &others[1], &others[2]);

        let params = RecvParams::builder().only_from(["alice", "carol"]).build();

        let pending = bob.recv_once(&params);
        dave.send("k", 1)?;
        carol.send("k", 2)?;
        let message = timeout(WAIT, pending).await?.expect("message");
        assert_eq!(message.sender.as_deref(), Some("carol"));

        let pending = bob.recv_once(&params);
        alice.send("k", 3)?;
        let message = timeout(WAIT, pending).await?.expect("message");
        assert_eq!(message.sender.as_deref(), Some("alice"));
        Ok(())
    }

    #[tokio::test]
    async fn test_key_isolation() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob"])?;
        let bob = &others[0];

        let pending = bob.recv_once(&RecvParams::builder().only_keys("wanted").build());
        alice.send("noise", 1)?;
        alice.send("wanted", 2)?;
        alice.send("noise", 3)?;

        let message = timeout(WAIT, pending).await?.expect("message");
        assert_eq!(message.key, "wanted");
        assert_eq!(message.value, IpcValue::Number(2.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_value_filter_matches_wire_text() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob"])?;
        let bob = &others[0];

        let params = RecvParams::builder().only_values(["true", "7"]).build();

        let pending = bob.recv_once(&params);
        alice.send("n", 7.0)?;
        let message = timeout(WAIT, pending).await?.expect("message");
        assert_eq!(message.value, IpcValue::Number(7.0));

        // The string "true" has the same raw text as the boolean.
        let pending = bob.recv_once(&params);
        alice.send("s", "true")?;
        let message = timeout(WAIT, pending).await?.expect("message");
        assert_eq!(message.value, IpcValue::String("true".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_self_exclusion() -> anyhow::Result<()> {
        let (_document, alice, _others) = connect_all("alice", &["bob"])?;

        let pending = alice.recv_once(&RecvParams::any());
        alice.send("k", "echo")?;
        assert!(timeout(QUIET, pending).await.is_err());

        // Listing itself as a sender does not lift the exclusion.
        let pending = alice.recv_once(&RecvParams::builder().only_from("alice").build());
        alice.send("k", "echo")?;
        assert!(timeout(QUIET, pending).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_accept_from_myself() -> anyhow::Result<()> {
        let (_document, alice, others) = connect_all("alice", &["bob"])?;
        let bob = &others[0];

        let params = RecvParams::builder().accept_from_myself().build();

        // Only its own writes pass when no other sender is listed.
        let mut pending = Box::pin(alice.recv_once(&params));
        bob.send("k", "from bob")?;
        assert!(timeout(QUIET, &mut pending).await.is_err());
        alice.send("k", "from alice")?;
        let message = timeout(WAIT, pending).await?.expect("message");
        assert_eq!(message.sender.as_deref(), Some("alice"));
        Ok(())
    }
}
