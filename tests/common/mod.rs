//! Common test utilities for tradehall integration tests.
//!
//! Provides in-memory capability adapters (economy ledger, land-storage
//! pools, item catalog, chat recorder) and fixture helpers shared across the
//! integration suite.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tradehall::{
    CatalogItem, ChatProvider, EconomyProvider, Error, Inventory, ItemCatalogProvider, ItemKey,
    ItemStack, LandStorageProvider, ProviderRegistry, Result, StorageId, TradingConfig,
};

/// Initialize quiet test logging once per process.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

// ========== In-memory adapters ==========

/// An in-memory currency ledger.
pub struct MemoryEconomy {
    balances: Mutex<HashMap<String, f64>>,
}

impl MemoryEconomy {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl EconomyProvider for MemoryEconomy {
    fn is_available(&self) -> bool {
        true
    }

    async fn balance(&self, player: &str) -> Result<f64> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(player)
            .copied()
            .unwrap_or(0.0))
    }

    async fn withdraw(&self, player: &str, amount: f64) -> Result<()> {
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(player.to_string()).or_insert(0.0);
        if *balance < amount {
            return Err(Error::operation_failed("withdraw", "insufficient funds"));
        }
        *balance -= amount;
        Ok(())
    }

    async fn deposit(&self, player: &str, amount: f64) -> Result<()> {
        *self
            .balances
            .lock()
            .unwrap()
            .entry(player.to_string())
            .or_insert(0.0) += amount;
        Ok(())
    }

    fn currency_name(&self) -> &str {
        "gold"
    }
}

/// In-memory shared land-storage pools.
pub struct MemoryLandStorage {
    pools: Mutex<HashMap<StorageId, Inventory>>,
}

impl MemoryLandStorage {
    pub fn new() -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
        }
    }

    /// Seed a pool with stock.
    pub fn fill(&self, storage: StorageId, stacks: &[ItemStack]) {
        let mut pools = self.pools.lock().unwrap();
        let pool = pools.entry(storage).or_default();
        for stack in stacks {
            pool.add(stack);
        }
    }

    /// Current quantity of one item in a pool.
    pub fn count(&self, storage: StorageId, item: &ItemKey) -> u32 {
        self.pools
            .lock()
            .unwrap()
            .get(&storage)
            .map_or(0, |pool| pool.count(item))
    }
}

#[async_trait]
impl LandStorageProvider for MemoryLandStorage {
    fn is_available(&self) -> bool {
        true
    }

    async fn contents(&self, storage: StorageId) -> Result<Vec<ItemStack>> {
        Ok(self
            .pools
            .lock()
            .unwrap()
            .get(&storage)
            .map(Inventory::stacks)
            .unwrap_or_default())
    }

    async fn deposit(&self, storage: StorageId, stack: &ItemStack) -> Result<()> {
        self.pools
            .lock()
            .unwrap()
            .entry(storage)
            .or_default()
            .add(stack);
        Ok(())
    }

    async fn withdraw(&self, storage: StorageId, stack: &ItemStack) -> Result<()> {
        let mut pools = self.pools.lock().unwrap();
        let pool = pools
            .get_mut(&storage)
            .ok_or_else(|| Error::operation_failed("withdraw", "unknown storage pool"))?;
        pool.remove(stack)
    }
}

/// An item catalog with a mutable price table.
pub struct MemoryCatalog {
    prices: Mutex<HashMap<ItemKey, f64>>,
}

impl MemoryCatalog {
    pub fn new(prices: &[(&str, f64)]) -> Self {
        Self {
            prices: Mutex::new(
                prices
                    .iter()
                    .map(|(item, price)| (ItemKey::new(*item), *price))
                    .collect(),
            ),
        }
    }

    /// Change a price; callers invalidate affected trade sets themselves.
    pub fn set_price(&self, item: &str, price: f64) {
        self.prices
            .lock()
            .unwrap()
            .insert(ItemKey::new(item), price);
    }
}

#[async_trait]
impl ItemCatalogProvider for MemoryCatalog {
    fn is_available(&self) -> bool {
        true
    }

    async fn lookup(&self, item: &ItemKey) -> Result<Option<CatalogItem>> {
        Ok(self.prices.lock().unwrap().get(item).map(|price| CatalogItem {
            item: item.clone(),
            display_name: item.to_string(),
            sell_price: Some(*price),
        }))
    }

    async fn sell_price(&self, item: &ItemKey) -> Result<Option<f64>> {
        Ok(self.prices.lock().unwrap().get(item).copied())
    }

    async fn display_name(&self, item: &ItemKey) -> Result<String> {
        Ok(item.to_string())
    }
}

/// A chat bridge that records every broadcast.
pub struct RecordingChat {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingChat {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatProvider for RecordingChat {
    fn is_available(&self) -> bool {
        true
    }

    async fn broadcast(&self, _channel: &str, message: &str) -> Result<()> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }

    async fn send_to_player(&self, player: &str, message: &str) -> Result<()> {
        self.messages
            .lock()
            .unwrap()
            .push(format!("{player}: {message}"));
        Ok(())
    }
}

// ========== Fixtures ==========

/// A full test world: registry with in-memory adapters plus handles to them.
pub struct TestWorld {
    pub registry: Arc<ProviderRegistry>,
    pub storage: Arc<MemoryLandStorage>,
    pub catalog: Arc<MemoryCatalog>,
    pub chat: Arc<RecordingChat>,
    pub config: Arc<TradingConfig>,
}

impl TestWorld {
    /// Build a world with the given price table bound into the registry.
    pub fn new(prices: &[(&str, f64)]) -> Self {
        let storage = Arc::new(MemoryLandStorage::new());
        let catalog = Arc::new(MemoryCatalog::new(prices));
        let chat = Arc::new(RecordingChat::new());

        let mut registry = ProviderRegistry::with_fallbacks();
        registry.bind_economy(Arc::new(MemoryEconomy::new()));
        registry.bind_land_storage(Arc::clone(&storage) as Arc<dyn LandStorageProvider>);
        registry.bind_item_catalog(Arc::clone(&catalog) as Arc<dyn ItemCatalogProvider>);
        registry.bind_chat(Arc::clone(&chat) as Arc<dyn ChatProvider>);

        Self {
            registry: Arc::new(registry),
            storage,
            catalog,
            chat,
            config: Arc::new(TradingConfig::default()),
        }
    }
}
