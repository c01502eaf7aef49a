//! The trading engine: entities, offers, generation, caching and execution.
//!
//! A [`TradingEntity`] is the uniform handle a player trades against, no
//! matter which substrate backs it: a shared land-storage pool (guild post),
//! a per-owner virtual ledger (player shop), a carried inventory (roaming
//! trader) or nothing at all (banker). Front-ends only ever see the trait;
//! the [`executor`](crate::trading::executor) never depends on the variant.
//!
//! All of this runs on the host's single simulation tick thread. Offers are
//! generated lazily, cached per entity in the [`TradeSetCache`], and
//! invalidated on every mutating event; execution runs to a terminal state
//! before returning control (no cancellation, no internal timeouts).

pub mod banker;
pub mod cache;
pub mod executor;
pub mod generator;
pub mod guild;
pub mod offer;
pub mod roaming;
pub mod service;
pub mod shop;

pub use banker::BankerEntity;
pub use cache::{CacheStats, TradeSetCache};
pub use executor::{TradeOutcome, TradePhase};
pub use guild::GuildEntity;
pub use offer::{OfferId, TradeOffer, UNLIMITED_USES};
pub use roaming::RoamingEntity;
pub use service::{InvalidationHandle, TradingService};
pub use shop::PlayerShopEntity;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::item::{Inventory, ItemStack};

/// Stable identity of a trading entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a fresh entity id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four trading-entity variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// Backed by a shared land-storage pool.
    Guild,
    /// Player-owned shop with a virtual ledger and owner-set prices.
    PlayerShop,
    /// Roaming trader carrying its own inventory, present for a limited time.
    Roaming,
    /// Unlimited synthetic source with fixed exchange rates.
    Banker,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Guild => "guild",
            Self::PlayerShop => "player-shop",
            Self::Roaming => "roaming",
            Self::Banker => "banker",
        };
        write!(f, "{name}")
    }
}

/// The player side of a trade: a name and a mutable inventory.
#[derive(Debug, Clone)]
pub struct PlayerActor {
    /// Player identity.
    pub id: Uuid,
    /// Player name, used in logs and chat announcements.
    pub name: String,
    /// The actor's inventory, mutated by the executor.
    pub inventory: Inventory,
}

impl PlayerActor {
    /// Create an actor with an empty inventory.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            inventory: Inventory::new(),
        }
    }

    /// Whether the actor holds every input the offer requires.
    pub fn can_pay(&self, offer: &TradeOffer) -> bool {
        offer.inputs().all(|stack| self.inventory.contains(stack))
    }
}

/// Something a player can trade with, regardless of backing substrate.
///
/// `can_execute` is side-effect-free and idempotent. `execute` re-runs the
/// same checks internally before mutating; it never trusts a caller-supplied
/// "already validated" claim, because anything can change across a suspension
/// point. The `receive_payment` / `supply_goods` / `reclaim_payment` hooks
/// are driven by the executor in a fixed order and are not meant for
/// front-end use.
#[async_trait]
pub trait TradingEntity: Send + Sync {
    /// Entity identity.
    fn id(&self) -> EntityId;

    /// Name shown to players.
    fn display_name(&self) -> &str;

    /// Which variant this entity is.
    fn kind(&self) -> EntityKind;

    /// The entity's stack-based trade inventory, when it has one. Guild and
    /// banker entities have none: guild storage is pooled, the banker is
    /// synthetic.
    async fn trade_inventory(&self) -> Result<Option<Vec<ItemStack>>>;

    /// Generate the current offer list from the backing substrate. This is
    /// the uncached generation path; callers wanting memoization go through
    /// [`TradingService::offers`](crate::trading::TradingService::offers).
    async fn list_offers(&self) -> Result<Vec<TradeOffer>>;

    /// Whether the offer could execute right now for this actor. Must not
    /// mutate anything on either side.
    async fn can_execute(&self, offer: &TradeOffer, actor: &PlayerActor) -> Result<bool>;

    /// Accept a payment stack into the entity's receiving storage.
    async fn receive_payment(&self, stack: &ItemStack) -> Result<()>;

    /// Remove an output stack from the entity's supplying storage. Fails
    /// when the substrate no longer covers the stack.
    async fn supply_goods(&self, stack: &ItemStack) -> Result<()>;

    /// Compensation hook: take back a payment stack that `receive_payment`
    /// accepted, used when a later step of the same trade failed.
    async fn reclaim_payment(&self, stack: &ItemStack) -> Result<()>;

    /// Validate and perform one exchange, running the trade state machine to
    /// a terminal state. The default drives
    /// [`executor::run_trade`](crate::trading::executor::run_trade).
    async fn execute(&self, offer: &TradeOffer, actor: &mut PlayerActor) -> Result<TradeOutcome> {
        executor::run_trade(self, offer, actor).await
    }
}
