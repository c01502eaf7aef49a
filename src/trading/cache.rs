//! Per-entity memoization of generated trade sets.
//!
//! A plain identity-keyed map with explicit, named invalidation. An entry is
//! removed, never left stale, whenever the inventory or pricing that produced
//! it changes; absence of an entry means "regenerate on next request", not
//! "no offers". There is no TTL and no background refresh — a miss
//! regenerates synchronously on the next `listOffers` request, and all
//! access happens on the host's single tick thread.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use tracing::debug;

use super::offer::TradeOffer;
use super::EntityId;

/// Cache statistics.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: AtomicU64,
    /// Number of cache misses.
    pub misses: AtomicU64,
    /// Number of stored entries over the cache's lifetime.
    pub stores: AtomicU64,
    /// Number of explicit invalidations that removed an entry.
    pub invalidations: AtomicU64,
}

impl CacheStats {
    /// Hit rate over all lookups (0.0 - 1.0); 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

/// The trade-set cache: entity identity to its currently valid offer list.
pub struct TradeSetCache {
    entries: RwLock<HashMap<EntityId, Vec<TradeOffer>>>,
    stats: CacheStats,
    enabled: bool,
}

impl TradeSetCache {
    /// Create an enabled cache.
    pub fn new() -> Self {
        Self::with_enabled(true)
    }

    /// Create a cache that can be switched off entirely (every lookup
    /// misses, nothing is stored).
    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: CacheStats::default(),
            enabled,
        }
    }

    /// Look up the cached offer list for an entity.
    pub fn get(&self, entity: EntityId) -> Option<Vec<TradeOffer>> {
        if !self.enabled {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        match entries.get(&entity) {
            Some(offers) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(offers.clone())
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store the current offer list for an entity.
    pub fn store(&self, entity: EntityId, offers: Vec<TradeOffer>) {
        if !self.enabled {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(entity, offers);
        self.stats.stores.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove the entry for an entity. Called on every mutating event:
    /// successful execution, direct storage mutation, pricing change, or
    /// explicit admin action.
    pub fn invalidate(&self, entity: EntityId) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.remove(&entity).is_some() {
            self.stats.invalidations.fetch_add(1, Ordering::Relaxed);
            debug!("invalidated trade set for entity {entity}");
        }
    }

    /// Drop every entry (e.g. on a global pricing reload).
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let removed = entries.len() as u64;
        entries.clear();
        self.stats.invalidations.fetch_add(removed, Ordering::Relaxed);
    }

    /// Number of currently cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl Default for TradeSetCache {
    fn default() -> Self {
        Self::new()
    }
}
