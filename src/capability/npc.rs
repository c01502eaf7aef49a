//! NPC-engine capability: world bodies for trading entities.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

use super::{CapabilitySlot, WorldPosition};

/// Stable identity of a spawned NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NpcId(pub Uuid);

impl NpcId {
    /// Generate a fresh NPC id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NpcId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access to the NPC engine that gives trading entities a world body.
#[async_trait]
pub trait NpcEngineProvider: Send + Sync {
    /// Whether an NPC engine is installed.
    fn is_available(&self) -> bool;

    /// Spawn a named NPC at a position.
    async fn spawn(&self, name: &str, position: &WorldPosition) -> Result<NpcId>;

    /// Remove a spawned NPC. Fails with `OperationFailed` when unknown.
    async fn despawn(&self, npc: NpcId) -> Result<()>;

    /// Whether an NPC is currently present in the world.
    async fn exists(&self, npc: NpcId) -> Result<bool>;

    /// Move an NPC to a position.
    async fn move_to(&self, npc: NpcId, position: &WorldPosition) -> Result<()>;
}

/// Fallback bound when no NPC engine plugin is installed.
#[derive(Debug, Default)]
pub struct UnavailableNpcEngine;

impl UnavailableNpcEngine {
    const REASON: &'static str = "no NPC engine plugin is installed";

    fn fail(operation: &'static str) -> Error {
        Error::unavailable(CapabilitySlot::NpcEngine, operation, Self::REASON)
    }
}

#[async_trait]
impl NpcEngineProvider for UnavailableNpcEngine {
    fn is_available(&self) -> bool {
        false
    }

    async fn spawn(&self, _name: &str, _position: &WorldPosition) -> Result<NpcId> {
        Err(Self::fail("spawn"))
    }

    async fn despawn(&self, _npc: NpcId) -> Result<()> {
        Err(Self::fail("despawn"))
    }

    async fn exists(&self, _npc: NpcId) -> Result<bool> {
        Err(Self::fail("exists"))
    }

    async fn move_to(&self, _npc: NpcId, _position: &WorldPosition) -> Result<()> {
        Err(Self::fail("move_to"))
    }
}
