//! Tradehall Engine Library
//!
//! This crate provides the capability-provider registry and barter trading
//! engine a game server embeds to integrate with a variable set of optional
//! external subsystems (economy ledger, land ownership, shared land storage,
//! custom-item catalogs, NPC engines, cross-server networking, chat bridges,
//! UI renderers) without any caller knowing which concrete backend is
//! installed, and to run uniform barter trades against entities whose
//! inventories live in completely different storage substrates.

pub mod capability;
pub mod config;
pub mod error;
pub mod item;
pub mod trading;

pub use capability::{
    CapabilitySlot, CatalogItem, ChatProvider, EconomyProvider, ItemCatalogProvider, LandProvider,
    LandStorageProvider, NetworkProvider, NpcEngineProvider, NpcId, PlotHandle, PlotId, PlotTrait,
    ProviderRegistry, StorageId, UiProvider, WorldPosition,
};
pub use config::{
    BankerConfig, BankerRate, CacheConfig, DenominationTier, RoundingPolicy, TradingConfig,
};
pub use error::{Error, Result};
pub use item::{Inventory, ItemKey, ItemStack};
pub use trading::{
    BankerEntity, CacheStats, EntityId, EntityKind, GuildEntity, InvalidationHandle, OfferId,
    PlayerActor, PlayerShopEntity, RoamingEntity, TradeOffer, TradeOutcome, TradePhase,
    TradeSetCache, TradingEntity, TradingService, UNLIMITED_USES,
};
