//! UI capability: rendering trade menus and notifications.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::trading::offer::TradeOffer;

use super::CapabilitySlot;

/// Access to the UI renderer front-ends use to present trades.
#[async_trait]
pub trait UiProvider: Send + Sync {
    /// Whether a UI renderer is installed.
    fn is_available(&self) -> bool;

    /// Open a trade menu for a player showing an entity's current offers.
    async fn open_trade_menu(
        &self,
        player: &str,
        title: &str,
        offers: &[TradeOffer],
    ) -> Result<()>;

    /// Show a short notification to a player.
    async fn notify(&self, player: &str, message: &str) -> Result<()>;
}

/// Fallback bound when no UI renderer is installed.
#[derive(Debug, Default)]
pub struct UnavailableUi;

impl UnavailableUi {
    const REASON: &'static str = "no UI renderer plugin is installed";

    fn fail(operation: &'static str) -> Error {
        Error::unavailable(CapabilitySlot::Ui, operation, Self::REASON)
    }
}

#[async_trait]
impl UiProvider for UnavailableUi {
    fn is_available(&self) -> bool {
        false
    }

    async fn open_trade_menu(
        &self,
        _player: &str,
        _title: &str,
        _offers: &[TradeOffer],
    ) -> Result<()> {
        Err(Self::fail("open_trade_menu"))
    }

    async fn notify(&self, _player: &str, _message: &str) -> Result<()> {
        Err(Self::fail("notify"))
    }
}
