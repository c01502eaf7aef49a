//! Guild-backed trading entity: offers generated from a shared land-storage
//! pool.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::capability::{ProviderRegistry, StorageId};
use crate::config::TradingConfig;
use crate::error::Result;
use crate::item::ItemStack;

use super::offer::TradeOffer;
use super::{generator, EntityId, EntityKind, PlayerActor, TradingEntity};

/// A trading post backed by a guild's shared land-storage pool.
///
/// The pool is not stack-based from the trading side, so there is no trade
/// inventory; the offer list is derived from the pool contents and the
/// item-catalog pricing on every (uncached) generation.
pub struct GuildEntity {
    id: EntityId,
    name: String,
    storage: StorageId,
    registry: Arc<ProviderRegistry>,
    config: Arc<TradingConfig>,
}

impl GuildEntity {
    /// Create a guild trading post over a storage pool.
    pub fn new(
        name: impl Into<String>,
        storage: StorageId,
        registry: Arc<ProviderRegistry>,
        config: Arc<TradingConfig>,
    ) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            storage,
            registry,
            config,
        }
    }

    /// The backing storage pool.
    pub fn storage(&self) -> StorageId {
        self.storage
    }

    async fn stock_of(&self, stack: &ItemStack) -> Result<bool> {
        let contents = self.registry.land_storage().contents(self.storage).await?;
        Ok(contents
            .iter()
            .any(|held| held.item == stack.item && held.quantity >= stack.quantity))
    }
}

#[async_trait]
impl TradingEntity for GuildEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Guild
    }

    async fn trade_inventory(&self) -> Result<Option<Vec<ItemStack>>> {
        // Pooled storage, not stack-based: no trade inventory.
        Ok(None)
    }

    async fn list_offers(&self) -> Result<Vec<TradeOffer>> {
        let contents = self.registry.land_storage().contents(self.storage).await?;
        let catalog = self.registry.item_catalog();
        let offers = generator::generate_offers(&contents, catalog.as_ref(), &self.config).await?;
        debug!(
            "guild post '{}' generated {} offer(s) from pool {}",
            self.name,
            offers.len(),
            self.storage
        );
        Ok(offers)
    }

    async fn can_execute(&self, offer: &TradeOffer, actor: &PlayerActor) -> Result<bool> {
        if !actor.can_pay(offer) {
            return Ok(false);
        }
        self.stock_of(&offer.output).await
    }

    async fn receive_payment(&self, stack: &ItemStack) -> Result<()> {
        self.registry
            .land_storage()
            .deposit(self.storage, stack)
            .await
    }

    async fn supply_goods(&self, stack: &ItemStack) -> Result<()> {
        self.registry
            .land_storage()
            .withdraw(self.storage, stack)
            .await
    }

    async fn reclaim_payment(&self, stack: &ItemStack) -> Result<()> {
        self.registry
            .land_storage()
            .withdraw(self.storage, stack)
            .await
    }
}
