//! Land-storage capability: shared item pools backing guild trading posts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::item::ItemStack;

use super::CapabilitySlot;

/// Stable identity of one shared storage pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageId(pub Uuid);

impl StorageId {
    /// Generate a fresh storage id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StorageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StorageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access to shared land-storage pools.
///
/// A pool is not stack-based from the caller's perspective: `contents`
/// reports one aggregated entry per distinct item type.
#[async_trait]
pub trait LandStorageProvider: Send + Sync {
    /// Whether a land-storage backend is installed.
    fn is_available(&self) -> bool;

    /// Current contents of a pool as item-quantity pairs.
    async fn contents(&self, storage: StorageId) -> Result<Vec<ItemStack>>;

    /// Add a stack to a pool.
    async fn deposit(&self, storage: StorageId, stack: &ItemStack) -> Result<()>;

    /// Remove a stack from a pool. Fails with `OperationFailed` when the pool
    /// holds less than the requested quantity; no partial removal occurs.
    async fn withdraw(&self, storage: StorageId, stack: &ItemStack) -> Result<()>;
}

/// Fallback bound when no land-storage backend is installed.
#[derive(Debug, Default)]
pub struct UnavailableLandStorage;

impl UnavailableLandStorage {
    const REASON: &'static str = "no land storage backend is installed";

    fn fail(operation: &'static str) -> Error {
        Error::unavailable(CapabilitySlot::LandStorage, operation, Self::REASON)
    }
}

#[async_trait]
impl LandStorageProvider for UnavailableLandStorage {
    fn is_available(&self) -> bool {
        false
    }

    async fn contents(&self, _storage: StorageId) -> Result<Vec<ItemStack>> {
        Err(Self::fail("contents"))
    }

    async fn deposit(&self, _storage: StorageId, _stack: &ItemStack) -> Result<()> {
        Err(Self::fail("deposit"))
    }

    async fn withdraw(&self, _storage: StorageId, _stack: &ItemStack) -> Result<()> {
        Err(Self::fail("withdraw"))
    }
}
