//! Chat capability: player messaging and announcement bridges.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::CapabilitySlot;

/// Access to the chat bridge.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Whether a chat bridge is installed.
    fn is_available(&self) -> bool;

    /// Broadcast a message on a named channel.
    async fn broadcast(&self, channel: &str, message: &str) -> Result<()>;

    /// Send a message to one player.
    async fn send_to_player(&self, player: &str, message: &str) -> Result<()>;
}

/// Fallback bound when no chat bridge is installed.
#[derive(Debug, Default)]
pub struct UnavailableChat;

impl UnavailableChat {
    const REASON: &'static str = "no chat bridge plugin is installed";

    fn fail(operation: &'static str) -> Error {
        Error::unavailable(CapabilitySlot::Chat, operation, Self::REASON)
    }
}

#[async_trait]
impl ChatProvider for UnavailableChat {
    fn is_available(&self) -> bool {
        false
    }

    async fn broadcast(&self, _channel: &str, _message: &str) -> Result<()> {
        Err(Self::fail("broadcast"))
    }

    async fn send_to_player(&self, _player: &str, _message: &str) -> Result<()> {
        Err(Self::fail("send_to_player"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fallback_fails_every_operation() {
        let chat = UnavailableChat;

        assert!(!chat.is_available());
        assert!(chat.broadcast("market", "hello").await.is_err());

        let err = chat.send_to_player("alice", "hi").await.unwrap_err();
        match err {
            Error::CapabilityUnavailable {
                capability,
                operation,
                ..
            } => {
                assert_eq!(capability, CapabilitySlot::Chat);
                assert_eq!(operation, "send_to_player");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
