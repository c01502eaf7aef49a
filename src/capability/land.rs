//! Land capability: plot ownership and plot traits.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

use super::CapabilitySlot;

/// Stable unique identity of a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotId(pub Uuid);

impl PlotId {
    /// Generate a fresh plot id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A representative position in the game world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    /// World name.
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Optional capability flags a plot may carry.
///
/// Queried via [`LandProvider::has_trait`] instead of downcasting against
/// adapter-native subclasses: one plot record, composable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlotTrait {
    /// The plot hosts a trading shop.
    Shop,
    /// The plot contributes to the shared land-storage pool.
    Storage,
    /// The plot is an embassy (owned inside foreign land).
    Embassy,
    /// The plot is for sale.
    ForSale,
}

/// An opaque handle to an adapter-owned plot.
///
/// Created by the land provider, read-only to every other component.
/// Equality and hashing are defined solely on the unique id.
#[derive(Debug, Clone)]
pub struct PlotHandle {
    /// Stable unique id.
    pub id: PlotId,
    /// Human-readable identifier (e.g. town/plot name).
    pub name: String,
    /// A representative world position inside the plot.
    pub position: WorldPosition,
    /// Opaque key into the adapter's native object table.
    pub native_key: String,
}

impl PartialEq for PlotHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PlotHandle {}

impl Hash for PlotHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Access to land/plot ownership data.
#[async_trait]
pub trait LandProvider: Send + Sync {
    /// Whether a land-management backend is installed.
    fn is_available(&self) -> bool;

    /// The plot covering a world position, if any.
    async fn plot_at(&self, position: &WorldPosition) -> Result<Option<PlotHandle>>;

    /// All plots owned by a player or guild name.
    async fn plots_of(&self, owner: &str) -> Result<Vec<PlotHandle>>;

    /// Owner name of a plot. Fails with `OperationFailed` when the plot no
    /// longer exists.
    async fn owner_of(&self, plot: &PlotHandle) -> Result<String>;

    /// Whether a plot carries an optional trait flag.
    async fn has_trait(&self, plot: &PlotHandle, plot_trait: PlotTrait) -> Result<bool>;
}

/// Fallback bound when no land-management plugin is installed.
#[derive(Debug, Default)]
pub struct UnavailableLand;

impl UnavailableLand {
    const REASON: &'static str = "no land management plugin is installed";

    fn fail(operation: &'static str) -> Error {
        Error::unavailable(CapabilitySlot::Land, operation, Self::REASON)
    }
}

#[async_trait]
impl LandProvider for UnavailableLand {
    fn is_available(&self) -> bool {
        false
    }

    async fn plot_at(&self, _position: &WorldPosition) -> Result<Option<PlotHandle>> {
        Err(Self::fail("plot_at"))
    }

    async fn plots_of(&self, _owner: &str) -> Result<Vec<PlotHandle>> {
        Err(Self::fail("plots_of"))
    }

    async fn owner_of(&self, _plot: &PlotHandle) -> Result<String> {
        Err(Self::fail("owner_of"))
    }

    async fn has_trait(&self, _plot: &PlotHandle, _plot_trait: PlotTrait) -> Result<bool> {
        Err(Self::fail("has_trait"))
    }
}
