//! Provider registry - one active provider per capability slot.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use super::{
    CapabilitySlot, ChatProvider, EconomyProvider, ItemCatalogProvider, LandProvider,
    LandStorageProvider, NetworkProvider, NpcEngineProvider, UiProvider, UnavailableChat,
    UnavailableEconomy, UnavailableItemCatalog, UnavailableLand, UnavailableLandStorage,
    UnavailableNetwork, UnavailableNpcEngine, UnavailableUi,
};

/// Holds exactly one active provider per capability slot.
///
/// Every getter always succeeds: an unbound slot holds that capability's
/// fallback, so no consumer ever sees an absent reference or needs a null
/// check. Binding happens during the controlled startup/reload phase only,
/// while the registry is still exclusively owned (`&mut self`); freezing it
/// behind an `Arc` afterwards is what publishes the bindings to consumers,
/// which is the required visibility barrier between bind and first use.
///
/// The registry never second-guesses an adapter: binding one that currently
/// reports itself unavailable still installs it, and its own `is_available()`
/// is consulted at call time.
pub struct ProviderRegistry {
    economy: Arc<dyn EconomyProvider>,
    land: Arc<dyn LandProvider>,
    land_storage: Arc<dyn LandStorageProvider>,
    item_catalog: Arc<dyn ItemCatalogProvider>,
    npc_engine: Arc<dyn NpcEngineProvider>,
    network: Arc<dyn NetworkProvider>,
    chat: Arc<dyn ChatProvider>,
    ui: Arc<dyn UiProvider>,
    bound: HashSet<CapabilitySlot>,
}

impl ProviderRegistry {
    /// Create a registry with every slot holding its fallback.
    pub fn with_fallbacks() -> Self {
        Self {
            economy: Arc::new(UnavailableEconomy),
            land: Arc::new(UnavailableLand),
            land_storage: Arc::new(UnavailableLandStorage),
            item_catalog: Arc::new(UnavailableItemCatalog),
            npc_engine: Arc::new(UnavailableNpcEngine),
            network: Arc::new(UnavailableNetwork),
            chat: Arc::new(UnavailableChat),
            ui: Arc::new(UnavailableUi),
            bound: HashSet::new(),
        }
    }

    fn record_bind(&mut self, slot: CapabilitySlot) {
        if !self.bound.insert(slot) {
            info!("Rebinding capability slot '{}'", slot);
        } else {
            info!("Bound adapter for capability slot '{}'", slot);
        }
    }

    /// Bind the economy adapter.
    pub fn bind_economy(&mut self, provider: Arc<dyn EconomyProvider>) {
        self.economy = provider;
        self.record_bind(CapabilitySlot::Economy);
    }

    /// Bind the land adapter.
    pub fn bind_land(&mut self, provider: Arc<dyn LandProvider>) {
        self.land = provider;
        self.record_bind(CapabilitySlot::Land);
    }

    /// Bind the land-storage adapter.
    pub fn bind_land_storage(&mut self, provider: Arc<dyn LandStorageProvider>) {
        self.land_storage = provider;
        self.record_bind(CapabilitySlot::LandStorage);
    }

    /// Bind the item-catalog adapter.
    pub fn bind_item_catalog(&mut self, provider: Arc<dyn ItemCatalogProvider>) {
        self.item_catalog = provider;
        self.record_bind(CapabilitySlot::ItemCatalog);
    }

    /// Bind the NPC-engine adapter.
    pub fn bind_npc_engine(&mut self, provider: Arc<dyn NpcEngineProvider>) {
        self.npc_engine = provider;
        self.record_bind(CapabilitySlot::NpcEngine);
    }

    /// Bind the network adapter.
    pub fn bind_network(&mut self, provider: Arc<dyn NetworkProvider>) {
        self.network = provider;
        self.record_bind(CapabilitySlot::Network);
    }

    /// Bind the chat adapter.
    pub fn bind_chat(&mut self, provider: Arc<dyn ChatProvider>) {
        self.chat = provider;
        self.record_bind(CapabilitySlot::Chat);
    }

    /// Bind the UI adapter.
    pub fn bind_ui(&mut self, provider: Arc<dyn UiProvider>) {
        self.ui = provider;
        self.record_bind(CapabilitySlot::Ui);
    }

    /// The active economy provider (adapter or fallback).
    pub fn economy(&self) -> Arc<dyn EconomyProvider> {
        Arc::clone(&self.economy)
    }

    /// The active land provider (adapter or fallback).
    pub fn land(&self) -> Arc<dyn LandProvider> {
        Arc::clone(&self.land)
    }

    /// The active land-storage provider (adapter or fallback).
    pub fn land_storage(&self) -> Arc<dyn LandStorageProvider> {
        Arc::clone(&self.land_storage)
    }

    /// The active item-catalog provider (adapter or fallback).
    pub fn item_catalog(&self) -> Arc<dyn ItemCatalogProvider> {
        Arc::clone(&self.item_catalog)
    }

    /// The active NPC-engine provider (adapter or fallback).
    pub fn npc_engine(&self) -> Arc<dyn NpcEngineProvider> {
        Arc::clone(&self.npc_engine)
    }

    /// The active network provider (adapter or fallback).
    pub fn network(&self) -> Arc<dyn NetworkProvider> {
        Arc::clone(&self.network)
    }

    /// The active chat provider (adapter or fallback).
    pub fn chat(&self) -> Arc<dyn ChatProvider> {
        Arc::clone(&self.chat)
    }

    /// The active UI provider (adapter or fallback).
    pub fn ui(&self) -> Arc<dyn UiProvider> {
        Arc::clone(&self.ui)
    }

    /// Availability of a slot's active provider, uniform across slots.
    pub fn is_available(&self, slot: CapabilitySlot) -> bool {
        match slot {
            CapabilitySlot::Economy => self.economy.is_available(),
            CapabilitySlot::Land => self.land.is_available(),
            CapabilitySlot::LandStorage => self.land_storage.is_available(),
            CapabilitySlot::ItemCatalog => self.item_catalog.is_available(),
            CapabilitySlot::NpcEngine => self.npc_engine.is_available(),
            CapabilitySlot::Network => self.network.is_available(),
            CapabilitySlot::Chat => self.chat.is_available(),
            CapabilitySlot::Ui => self.ui.is_available(),
        }
    }

    /// Slots with an explicitly bound adapter, for startup logging.
    pub fn bound_slots(&self) -> Vec<CapabilitySlot> {
        CapabilitySlot::ALL
            .into_iter()
            .filter(|slot| self.bound.contains(slot))
            .collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_fallbacks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use async_trait::async_trait;

    struct FlatEconomy {
        available: bool,
    }

    #[async_trait]
    impl EconomyProvider for FlatEconomy {
        fn is_available(&self) -> bool {
            self.available
        }

        async fn balance(&self, _player: &str) -> Result<f64> {
            Ok(100.0)
        }

        async fn withdraw(&self, _player: &str, _amount: f64) -> Result<()> {
            Ok(())
        }

        async fn deposit(&self, _player: &str, _amount: f64) -> Result<()> {
            Ok(())
        }

        fn currency_name(&self) -> &str {
            "gold"
        }
    }

    #[test]
    fn test_unbound_slots_hold_fallbacks() {
        let registry = ProviderRegistry::with_fallbacks();

        for slot in CapabilitySlot::ALL {
            assert!(!registry.is_available(slot), "slot {slot} should be unavailable");
        }
        assert!(registry.bound_slots().is_empty());
    }

    #[tokio::test]
    async fn test_unbound_economy_fails_with_capability_unavailable() {
        let registry = ProviderRegistry::with_fallbacks();

        let err = registry.economy().withdraw("alice", 5.0).await.unwrap_err();

        match err {
            Error::CapabilityUnavailable {
                capability,
                operation,
                ..
            } => {
                assert_eq!(capability, CapabilitySlot::Economy);
                assert_eq!(operation, "withdraw");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_after_bind_returns_the_bound_instance() {
        let mut registry = ProviderRegistry::with_fallbacks();
        let adapter: Arc<dyn EconomyProvider> = Arc::new(FlatEconomy { available: true });

        registry.bind_economy(Arc::clone(&adapter));

        assert!(Arc::ptr_eq(&registry.economy(), &adapter));
        assert!(registry.is_available(CapabilitySlot::Economy));
        assert_eq!(registry.bound_slots(), vec![CapabilitySlot::Economy]);
        assert_eq!(registry.economy().balance("alice").await.unwrap(), 100.0);
    }

    #[test]
    fn test_last_bind_wins() {
        let mut registry = ProviderRegistry::with_fallbacks();
        let first: Arc<dyn EconomyProvider> = Arc::new(FlatEconomy { available: true });
        let second: Arc<dyn EconomyProvider> = Arc::new(FlatEconomy { available: true });

        registry.bind_economy(Arc::clone(&first));
        registry.bind_economy(Arc::clone(&second));

        assert!(Arc::ptr_eq(&registry.economy(), &second));
    }

    #[test]
    fn test_binding_an_unavailable_adapter_still_installs_it() {
        let mut registry = ProviderRegistry::with_fallbacks();
        let adapter: Arc<dyn EconomyProvider> = Arc::new(FlatEconomy { available: false });

        registry.bind_economy(Arc::clone(&adapter));

        // Installed, but availability is the adapter's own answer.
        assert!(Arc::ptr_eq(&registry.economy(), &adapter));
        assert!(!registry.is_available(CapabilitySlot::Economy));
    }
}
