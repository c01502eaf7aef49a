//! Network capability: cross-server messaging.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::CapabilitySlot;

/// Access to the cross-server network (proxy) layer.
#[async_trait]
pub trait NetworkProvider: Send + Sync {
    /// Whether a proxy/network bridge is installed.
    fn is_available(&self) -> bool;

    /// Name of this server within the network.
    fn server_name(&self) -> &str;

    /// Broadcast a payload on a named channel to all servers.
    async fn broadcast(&self, channel: &str, payload: &str) -> Result<()>;

    /// Send a payload to one named server.
    async fn send_to(&self, server: &str, channel: &str, payload: &str) -> Result<()>;
}

/// Fallback bound when the server is not part of a network.
#[derive(Debug, Default)]
pub struct UnavailableNetwork;

impl UnavailableNetwork {
    const REASON: &'static str = "no cross-server network bridge is installed";

    fn fail(operation: &'static str) -> Error {
        Error::unavailable(CapabilitySlot::Network, operation, Self::REASON)
    }
}

#[async_trait]
impl NetworkProvider for UnavailableNetwork {
    fn is_available(&self) -> bool {
        false
    }

    fn server_name(&self) -> &str {
        "standalone"
    }

    async fn broadcast(&self, _channel: &str, _payload: &str) -> Result<()> {
        Err(Self::fail("broadcast"))
    }

    async fn send_to(&self, _server: &str, _channel: &str, _payload: &str) -> Result<()> {
        Err(Self::fail("send_to"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fallback_fails_every_operation() {
        let network = UnavailableNetwork;

        assert!(!network.is_available());
        assert!(network.broadcast("trades", "{}").await.is_err());

        let err = network.send_to("hub", "trades", "{}").await.unwrap_err();
        match err {
            Error::CapabilityUnavailable {
                capability,
                operation,
                ..
            } => {
                assert_eq!(capability, CapabilitySlot::Network);
                assert_eq!(operation, "send_to");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
