//! Item-catalog capability: custom item definitions and per-item pricing.
//!
//! This is the pricing source the trade-set generator consults: an item with
//! no catalog entry, or a non-positive sell price, produces no offer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::item::ItemKey;

use super::CapabilitySlot;

/// A catalog entry for one item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// The item key.
    pub item: ItemKey,
    /// Display name shown to players.
    pub display_name: String,
    /// Configured sell price in currency units, if priced.
    pub sell_price: Option<f64>,
}

/// Access to the custom-item catalog and pricing tables.
#[async_trait]
pub trait ItemCatalogProvider: Send + Sync {
    /// Whether a catalog backend is installed.
    fn is_available(&self) -> bool;

    /// Look up a catalog entry. `Ok(None)` means the item is simply not
    /// cataloged, which is not an error.
    async fn lookup(&self, item: &ItemKey) -> Result<Option<CatalogItem>>;

    /// The configured sell price for an item, if any.
    async fn sell_price(&self, item: &ItemKey) -> Result<Option<f64>>;

    /// Display name for an item, falling back to the raw key when the item
    /// is not cataloged.
    async fn display_name(&self, item: &ItemKey) -> Result<String>;
}

/// Fallback bound when no item-catalog plugin is installed.
#[derive(Debug, Default)]
pub struct UnavailableItemCatalog;

impl UnavailableItemCatalog {
    const REASON: &'static str = "no custom item catalog plugin is installed";

    fn fail(operation: &'static str) -> Error {
        Error::unavailable(CapabilitySlot::ItemCatalog, operation, Self::REASON)
    }
}

#[async_trait]
impl ItemCatalogProvider for UnavailableItemCatalog {
    fn is_available(&self) -> bool {
        false
    }

    async fn lookup(&self, _item: &ItemKey) -> Result<Option<CatalogItem>> {
        Err(Self::fail("lookup"))
    }

    async fn sell_price(&self, _item: &ItemKey) -> Result<Option<f64>> {
        Err(Self::fail("sell_price"))
    }

    async fn display_name(&self, _item: &ItemKey) -> Result<String> {
        Err(Self::fail("display_name"))
    }
}
