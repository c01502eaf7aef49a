//! Capability provider contracts and the provider registry.
//!
//! Every optional external subsystem the engine can integrate with (economy
//! ledger, land/plot ownership, shared land storage, custom-item catalog, NPC
//! engine, cross-server network, chat bridge, UI rendering) is reached through
//! exactly one provider trait defined here. Concrete adapters for third-party
//! plugins implement these traits and are bound into the [`ProviderRegistry`]
//! at startup; when no adapter is installed, the slot holds a fallback that is
//! never available and fails every operation with a typed
//! [`CapabilityUnavailable`](crate::Error::CapabilityUnavailable) error.
//!
//! The rule every provider obeys: if `is_available()` is false, every other
//! operation fails with `CapabilityUnavailable`. Availability is checked once
//! per call and trusted for that call; it must not flip mid-operation.
//!
//! # Example
//!
//! ```rust,ignore
//! use tradehall::capability::{CapabilitySlot, ProviderRegistry};
//!
//! let mut registry = ProviderRegistry::with_fallbacks();
//! registry.bind_economy(Arc::new(MyVaultAdapter::new()));
//! let registry = Arc::new(registry); // frozen; visible to all consumers
//!
//! if !registry.is_available(CapabilitySlot::Chat) {
//!     // degrade gracefully, no null checks anywhere
//! }
//! ```

mod catalog;
mod chat;
mod economy;
mod land;
mod npc;
mod network;
mod registry;
mod storage;
mod ui;

pub use catalog::{CatalogItem, ItemCatalogProvider, UnavailableItemCatalog};
pub use chat::{ChatProvider, UnavailableChat};
pub use economy::{EconomyProvider, UnavailableEconomy};
pub use land::{LandProvider, PlotHandle, PlotId, PlotTrait, UnavailableLand, WorldPosition};
pub use network::{NetworkProvider, UnavailableNetwork};
pub use npc::{NpcEngineProvider, NpcId, UnavailableNpcEngine};
pub use registry::ProviderRegistry;
pub use storage::{LandStorageProvider, StorageId, UnavailableLandStorage};
pub use ui::{UiProvider, UnavailableUi};

use std::fmt;

use serde::{Deserialize, Serialize};

/// The enumerated capability slots. Exactly one provider instance is bound
/// per slot for the lifetime of the process; rebinding only happens at a
/// controlled reload boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilitySlot {
    /// Currency ledger (balances, withdraw/deposit).
    Economy,
    /// Land/plot ownership.
    Land,
    /// Shared land-storage pools.
    LandStorage,
    /// Custom-item catalog and per-item pricing.
    ItemCatalog,
    /// NPC engine (spawning and moving world bodies).
    NpcEngine,
    /// Cross-server networking.
    Network,
    /// Chat bridge.
    Chat,
    /// UI rendering.
    Ui,
}

impl CapabilitySlot {
    /// All slots, in a stable order.
    pub const ALL: [CapabilitySlot; 8] = [
        CapabilitySlot::Economy,
        CapabilitySlot::Land,
        CapabilitySlot::LandStorage,
        CapabilitySlot::ItemCatalog,
        CapabilitySlot::NpcEngine,
        CapabilitySlot::Network,
        CapabilitySlot::Chat,
        CapabilitySlot::Ui,
    ];

    /// Stable string name for logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::Land => "land",
            Self::LandStorage => "land-storage",
            Self::ItemCatalog => "item-catalog",
            Self::NpcEngine => "npc-engine",
            Self::Network => "network",
            Self::Chat => "chat",
            Self::Ui => "ui",
        }
    }
}

impl fmt::Display for CapabilitySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
