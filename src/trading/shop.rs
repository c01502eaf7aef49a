//! Player-owned shop: a virtual ledger with owner-configurable prices.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::config::TradingConfig;
use crate::error::Result;
use crate::item::{Inventory, ItemKey, ItemStack};

use super::offer::TradeOffer;
use super::{generator, EntityId, EntityKind, PlayerActor, TradingEntity};

/// A shop owned by a player, backed by a per-owner virtual ledger.
///
/// The owner stocks the ledger and sets a price per item; only priced items
/// are offered. Payments land in the same ledger, so the owner collects them
/// when restocking. Price and stock mutations do not touch any cached trade
/// set — callers invalidate through the trading service.
pub struct PlayerShopEntity {
    id: EntityId,
    name: String,
    owner: String,
    ledger: RwLock<Inventory>,
    prices: RwLock<HashMap<ItemKey, f64>>,
    config: TradingConfig,
}

impl PlayerShopEntity {
    /// Create an empty shop for an owner.
    pub fn new(name: impl Into<String>, owner: impl Into<String>, config: TradingConfig) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            owner: owner.into(),
            ledger: RwLock::new(Inventory::new()),
            prices: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// The owning player's name.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Add stock to the ledger.
    pub fn restock(&self, stack: &ItemStack) {
        self.ledger.write().unwrap_or_else(|e| e.into_inner()).add(stack);
    }

    /// Take stock (or collected payments) out of the ledger.
    pub fn withdraw_stock(&self, stack: &ItemStack) -> Result<()> {
        self.ledger
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(stack)
    }

    /// Set the owner's price for an item. Takes effect on the next
    /// generation; existing offers are never edited in place.
    pub fn set_price(&self, item: ItemKey, price: f64) {
        debug!("shop '{}' priced '{}' at {}", self.name, item, price);
        self.prices
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(item, price);
    }

    /// Remove the owner's price for an item, delisting it.
    pub fn clear_price(&self, item: &ItemKey) {
        self.prices.write().unwrap_or_else(|e| e.into_inner()).remove(item);
    }
}

#[async_trait]
impl TradingEntity for PlayerShopEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntityKind {
        EntityKind::PlayerShop
    }

    async fn trade_inventory(&self) -> Result<Option<Vec<ItemStack>>> {
        Ok(Some(
            self.ledger.read().unwrap_or_else(|e| e.into_inner()).stacks(),
        ))
    }

    async fn list_offers(&self) -> Result<Vec<TradeOffer>> {
        let stacks = self.ledger.read().unwrap_or_else(|e| e.into_inner()).stacks();
        let prices = self.prices.read().unwrap_or_else(|e| e.into_inner());

        let mut offers = Vec::new();
        for stack in stacks {
            let Some(price) = prices.get(&stack.item).copied() else {
                continue;
            };
            if price <= 0.0 {
                continue;
            }
            let Some((input, second_input)) = generator::payment_for(price, &self.config) else {
                continue;
            };
            let units = generator::price_to_units(price, self.config.rounding);
            offers.push(TradeOffer::unlimited(
                input,
                second_input,
                ItemStack::new(stack.item.clone(), 1),
                units,
            ));
        }
        Ok(offers)
    }

    async fn can_execute(&self, offer: &TradeOffer, actor: &PlayerActor) -> Result<bool> {
        if !actor.can_pay(offer) {
            return Ok(false);
        }
        Ok(self
            .ledger
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&offer.output))
    }

    async fn receive_payment(&self, stack: &ItemStack) -> Result<()> {
        self.ledger.write().unwrap_or_else(|e| e.into_inner()).add(stack);
        Ok(())
    }

    async fn supply_goods(&self, stack: &ItemStack) -> Result<()> {
        self.ledger
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(stack)
    }

    async fn reclaim_payment(&self, stack: &ItemStack) -> Result<()> {
        self.ledger
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(stack)
    }
}
