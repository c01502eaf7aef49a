//! Roaming trader: carries its own inventory and leaves after a while.

use std::sync::Arc;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::info;

use crate::capability::{NpcId, ProviderRegistry};
use crate::config::TradingConfig;
use crate::error::Result;
use crate::item::{Inventory, ItemStack};

use super::offer::TradeOffer;
use super::{generator, EntityId, EntityKind, PlayerActor, TradingEntity};

/// A wandering trader with a carried inventory and a limited stay.
///
/// Offers are generated from the carried goods priced through the
/// item-catalog capability. Once the stay expires the trader stops offering
/// and refusing trades is the expected outcome; despawning its NPC body (if
/// it has one) is the host's cleanup step.
pub struct RoamingEntity {
    id: EntityId,
    name: String,
    carried: RwLock<Inventory>,
    departs_at: Instant,
    body: Option<NpcId>,
    registry: Arc<ProviderRegistry>,
    config: Arc<TradingConfig>,
}

impl RoamingEntity {
    /// Create a roaming trader that stays for `stay`.
    pub fn new(
        name: impl Into<String>,
        stay: Duration,
        registry: Arc<ProviderRegistry>,
        config: Arc<TradingConfig>,
    ) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            carried: RwLock::new(Inventory::new()),
            departs_at: Instant::now() + stay,
            body: None,
            registry,
            config,
        }
    }

    /// Attach the NPC body spawned for this trader.
    pub fn with_body(mut self, body: NpcId) -> Self {
        self.body = Some(body);
        self
    }

    /// Put goods into the carried inventory.
    pub fn carry(&self, stack: &ItemStack) {
        self.carried
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .add(stack);
    }

    /// Whether the trader's stay is over.
    pub fn is_departed(&self) -> bool {
        Instant::now() >= self.departs_at
    }

    /// The attached NPC body, if any.
    pub fn body(&self) -> Option<NpcId> {
        self.body
    }

    /// Remove the trader's NPC body from the world, if one was attached and
    /// the NPC engine is available. Degrades to a no-op otherwise.
    pub async fn despawn_body(&self) -> Result<()> {
        let Some(body) = self.body else {
            return Ok(());
        };
        let npc_engine = self.registry.npc_engine();
        if !npc_engine.is_available() {
            return Ok(());
        }
        npc_engine.despawn(body).await?;
        info!("despawned body of roaming trader '{}'", self.name);
        Ok(())
    }
}

#[async_trait]
impl TradingEntity for RoamingEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Roaming
    }

    async fn trade_inventory(&self) -> Result<Option<Vec<ItemStack>>> {
        Ok(Some(
            self.carried
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .stacks(),
        ))
    }

    async fn list_offers(&self) -> Result<Vec<TradeOffer>> {
        if self.is_departed() {
            return Ok(Vec::new());
        }
        let stacks = self
            .carried
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .stacks();
        let catalog = self.registry.item_catalog();
        generator::generate_offers(&stacks, catalog.as_ref(), &self.config).await
    }

    async fn can_execute(&self, offer: &TradeOffer, actor: &PlayerActor) -> Result<bool> {
        if self.is_departed() {
            return Ok(false);
        }
        if !actor.can_pay(offer) {
            return Ok(false);
        }
        Ok(self
            .carried
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&offer.output))
    }

    async fn receive_payment(&self, stack: &ItemStack) -> Result<()> {
        self.carried
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .add(stack);
        Ok(())
    }

    async fn supply_goods(&self, stack: &ItemStack) -> Result<()> {
        self.carried
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(stack)
    }

    async fn reclaim_payment(&self, stack: &ItemStack) -> Result<()> {
        self.carried
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{CatalogItem, ItemCatalogProvider, NpcEngineProvider, WorldPosition};
    use crate::item::ItemKey;
    use crate::trading::TradePhase;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct TableCatalog {
        prices: HashMap<ItemKey, f64>,
    }

    #[async_trait]
    impl ItemCatalogProvider for TableCatalog {
        fn is_available(&self) -> bool {
            true
        }

        async fn lookup(&self, item: &ItemKey) -> Result<Option<CatalogItem>> {
            Ok(self.prices.get(item).map(|price| CatalogItem {
                item: item.clone(),
                display_name: item.to_string(),
                sell_price: Some(*price),
            }))
        }

        async fn sell_price(&self, item: &ItemKey) -> Result<Option<f64>> {
            Ok(self.prices.get(item).copied())
        }

        async fn display_name(&self, item: &ItemKey) -> Result<String> {
            Ok(item.to_string())
        }
    }

    struct CountingNpcEngine {
        despawned: Mutex<Vec<NpcId>>,
    }

    #[async_trait]
    impl NpcEngineProvider for CountingNpcEngine {
        fn is_available(&self) -> bool {
            true
        }

        async fn spawn(&self, _name: &str, _position: &WorldPosition) -> Result<NpcId> {
            Ok(NpcId::new())
        }

        async fn despawn(&self, npc: NpcId) -> Result<()> {
            self.despawned.lock().unwrap().push(npc);
            Ok(())
        }

        async fn exists(&self, _npc: NpcId) -> Result<bool> {
            Ok(true)
        }

        async fn move_to(&self, _npc: NpcId, _position: &WorldPosition) -> Result<()> {
            Ok(())
        }
    }

    fn registry_with_catalog(prices: &[(&str, f64)]) -> Arc<ProviderRegistry> {
        let mut registry = ProviderRegistry::with_fallbacks();
        registry.bind_item_catalog(Arc::new(TableCatalog {
            prices: prices
                .iter()
                .map(|(item, price)| (ItemKey::new(*item), *price))
                .collect(),
        }));
        Arc::new(registry)
    }

    fn trader(stay: Duration) -> RoamingEntity {
        let trader = RoamingEntity::new(
            "Wandering Marta",
            stay,
            registry_with_catalog(&[("spyglass", 35.0)]),
            Arc::new(TradingConfig::default()),
        );
        trader.carry(&ItemStack::new("spyglass", 2));
        trader
    }

    #[tokio::test]
    async fn test_offers_come_from_carried_goods() {
        let trader = trader(Duration::from_secs(600));

        let offers = trader.list_offers().await.unwrap();

        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].output, ItemStack::new("spyglass", 1));
        assert_eq!(offers[0].input, ItemStack::new("gold_ingot", 3));
        assert_eq!(offers[0].second_input, Some(ItemStack::new("gold_nugget", 5)));
        assert!(trader.trade_inventory().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_departed_trader_offers_nothing_and_rejects() {
        let trader = trader(Duration::ZERO);
        let offer = TradeOffer::unlimited(
            ItemStack::new("gold_ingot", 3),
            None,
            ItemStack::new("spyglass", 1),
            30,
        );
        let mut actor = PlayerActor::new("alice");
        actor.inventory.add(&ItemStack::new("gold_ingot", 3));

        assert!(trader.is_departed());
        assert!(trader.list_offers().await.unwrap().is_empty());

        let outcome = trader.execute(&offer, &mut actor).await.unwrap();
        assert_eq!(outcome.phase(), TradePhase::Rejected);
        assert_eq!(actor.inventory.count(&ItemKey::new("gold_ingot")), 3);
    }

    #[tokio::test]
    async fn test_despawn_body_uses_the_npc_engine() {
        let npc_engine = Arc::new(CountingNpcEngine {
            despawned: Mutex::new(Vec::new()),
        });
        let mut registry = ProviderRegistry::with_fallbacks();
        registry.bind_npc_engine(Arc::clone(&npc_engine) as Arc<dyn NpcEngineProvider>);
        let body = NpcId::new();
        let trader = RoamingEntity::new(
            "Wandering Marta",
            Duration::from_secs(1),
            Arc::new(registry),
            Arc::new(TradingConfig::default()),
        )
        .with_body(body);

        trader.despawn_body().await.unwrap();

        assert_eq!(*npc_engine.despawned.lock().unwrap(), vec![body]);
    }

    #[tokio::test]
    async fn test_despawn_body_degrades_without_an_npc_engine() {
        let trader = RoamingEntity::new(
            "Wandering Marta",
            Duration::from_secs(1),
            Arc::new(ProviderRegistry::with_fallbacks()),
            Arc::new(TradingConfig::default()),
        )
        .with_body(NpcId::new());

        // No NPC engine bound: a quiet no-op, not an error.
        assert!(trader.despawn_body().await.is_ok());
    }
}
