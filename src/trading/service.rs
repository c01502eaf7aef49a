//! The trading service: entity bindings, cached offers, execution.
//!
//! This is the façade the surrounding plugin talks to. It owns the mapping
//! from entity ids to trading entities (`bind_entity`/`unbind_entity`), the
//! per-entity trade-set cache, and the commit-time bookkeeping around the
//! executor: invalidating the entity's cached trade set and announcing the
//! trade over the chat capability when one is available.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::capability::{CapabilitySlot, ProviderRegistry};
use crate::config::TradingConfig;
use crate::error::{Error, Result};

use super::cache::TradeSetCache;
use super::executor::TradeOutcome;
use super::offer::{OfferId, TradeOffer};
use super::{EntityId, PlayerActor, TradingEntity};

/// Chat channel trade announcements go out on.
const TRADE_CHANNEL: &str = "trade";

/// Network channel committed trades are published on.
const TRADE_NETWORK_CHANNEL: &str = "tradehall:trade";

/// A cloneable handle for invalidations arriving from asynchronous contexts
/// (chat-bridge commands, remote adapters). Sends are queued, never applied
/// directly; the tick thread applies them via
/// [`TradingService::drain_deferred`].
#[derive(Clone)]
pub struct InvalidationHandle {
    tx: mpsc::UnboundedSender<EntityId>,
}

impl InvalidationHandle {
    /// Queue an invalidation for the tick thread.
    pub fn invalidate(&self, id: EntityId) {
        // A closed queue means the service is gone; nothing left to bust.
        let _ = self.tx.send(id);
    }
}

/// The trade engine façade: entity registry + trade-set cache + executor.
pub struct TradingService {
    registry: Arc<ProviderRegistry>,
    entities: RwLock<HashMap<EntityId, Arc<dyn TradingEntity>>>,
    cache: TradeSetCache,
    uses: RwLock<HashMap<(EntityId, OfferId), i32>>,
    deferred_tx: mpsc::UnboundedSender<EntityId>,
    deferred_rx: Mutex<mpsc::UnboundedReceiver<EntityId>>,
}

impl TradingService {
    /// Create a service over a frozen provider registry.
    pub fn new(registry: Arc<ProviderRegistry>, config: &TradingConfig) -> Self {
        let (deferred_tx, deferred_rx) = mpsc::unbounded_channel();
        Self {
            registry,
            entities: RwLock::new(HashMap::new()),
            cache: TradeSetCache::with_enabled(config.cache.enabled),
            uses: RwLock::new(HashMap::new()),
            deferred_tx,
            deferred_rx: Mutex::new(deferred_rx),
        }
    }

    /// Register a trading entity. Rebinding an id replaces the old entity
    /// and drops its cached trade set.
    pub fn bind_entity(&self, entity: Arc<dyn TradingEntity>) {
        let id = entity.id();
        let replaced = self
            .entities
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, Arc::clone(&entity))
            .is_some();
        if replaced {
            self.cache.invalidate(id);
            self.forget_uses(id);
        }
        info!(
            "bound {} trading entity '{}' ({id})",
            entity.kind(),
            entity.display_name()
        );
    }

    /// Unregister a trading entity, dropping its cached trade set.
    pub fn unbind_entity(&self, id: EntityId) -> Option<Arc<dyn TradingEntity>> {
        let removed = self
            .entities
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
        match &removed {
            Some(entity) => {
                self.cache.invalidate(id);
                self.forget_uses(id);
                info!("unbound trading entity '{}' ({id})", entity.display_name());
            }
            None => warn!("unbind of unknown trading entity {id}"),
        }
        removed
    }

    /// Look up a bound entity.
    pub fn entity(&self, id: EntityId) -> Option<Arc<dyn TradingEntity>> {
        self.entities
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    /// Number of bound entities.
    pub fn entity_count(&self) -> usize {
        self.entities.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// The entity's current trade set, from cache when valid, regenerated
    /// synchronously on a miss.
    pub async fn offers(&self, id: EntityId) -> Result<Vec<TradeOffer>> {
        let entity = self
            .entity(id)
            .ok_or_else(|| Error::operation_failed("offers", "unknown trading entity"))?;

        if let Some(offers) = self.cache.get(id) {
            return Ok(offers);
        }
        let offers = entity.list_offers().await?;
        self.cache.store(id, offers.clone());
        Ok(offers)
    }

    /// Execute one offer (by id, resolved against the entity's current trade
    /// set) for an actor. Finite-use offers are refused once their recorded
    /// commits reach `max_uses`. A committed trade invalidates the entity's
    /// cached trade set and is announced over chat when that capability is
    /// present; a failed trade also invalidates, since the failure proves the
    /// cached set was stale.
    pub async fn execute(
        &self,
        id: EntityId,
        offer_id: OfferId,
        actor: &mut PlayerActor,
    ) -> Result<TradeOutcome> {
        let entity = self
            .entity(id)
            .ok_or_else(|| Error::operation_failed("execute", "unknown trading entity"))?;

        // Resolve against the current set. A stale id from before an
        // invalidation is a rejection, never an execution at new terms.
        let offers = self.offers(id).await?;
        let Some(offer) = offers.into_iter().find(|offer| offer.id == offer_id) else {
            debug!("offer {offer_id} no longer in trade set of entity {id}");
            return Ok(TradeOutcome::Rejected {
                reason: "That offer is no longer available.".to_string(),
            });
        };

        if !offer.is_unlimited() {
            let used = self
                .uses
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .get(&(id, offer_id))
                .copied()
                .unwrap_or(0);
            if used >= offer.max_uses {
                debug!("offer {offer_id} of entity {id} is spent after {used} use(s)");
                return Ok(TradeOutcome::Rejected {
                    reason: "That offer has been used up.".to_string(),
                });
            }
        }

        let outcome = entity.execute(&offer, actor).await?;

        match &outcome {
            TradeOutcome::Committed => {
                if !offer.is_unlimited() {
                    *self
                        .uses
                        .write()
                        .unwrap_or_else(|e| e.into_inner())
                        .entry((id, offer_id))
                        .or_insert(0) += 1;
                }
                self.cache.invalidate(id);
                self.announce(&entity, &offer, actor).await;
            }
            TradeOutcome::Failed { .. } => self.cache.invalidate(id),
            TradeOutcome::Rejected { .. } => {}
        }
        Ok(outcome)
    }

    /// Explicit cache busting for external mutators: storage rescans, price
    /// changes, admin action. Also resets use counts for the entity's offers,
    /// since regeneration issues new terms. The commit path deliberately does
    /// not: entities serving persistent offers keep their spent counts.
    pub fn invalidate(&self, id: EntityId) {
        self.cache.invalidate(id);
        self.forget_uses(id);
    }

    /// Drop every cached trade set and use count (e.g. after a global
    /// pricing reload).
    pub fn invalidate_all(&self) {
        self.cache.clear();
        self.uses.write().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn forget_uses(&self, id: EntityId) {
        self.uses
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|(entity, _), _| *entity != id);
    }

    /// A handle asynchronous contexts use to queue invalidations instead of
    /// touching the cache directly.
    pub fn invalidation_handle(&self) -> InvalidationHandle {
        InvalidationHandle {
            tx: self.deferred_tx.clone(),
        }
    }

    /// Apply queued invalidations. The host calls this from its tick;
    /// returns how many entries were processed.
    pub fn drain_deferred(&self) -> usize {
        let mut rx = self.deferred_rx.lock().unwrap_or_else(|e| e.into_inner());
        let mut drained = 0;
        while let Ok(id) = rx.try_recv() {
            self.invalidate(id);
            drained += 1;
        }
        drained
    }

    /// The trade-set cache, for operator inspection.
    pub fn cache(&self) -> &TradeSetCache {
        &self.cache
    }

    /// Announce a committed trade over the chat and network capabilities.
    /// Each degrades to silence when its bridge is not bound; a bridge
    /// failure is logged, never surfaced to the trading caller.
    async fn announce(&self, entity: &Arc<dyn TradingEntity>, offer: &TradeOffer, actor: &PlayerActor) {
        if self.registry.is_available(CapabilitySlot::Chat) {
            let message = format!(
                "{} bought {} from {}",
                actor.name,
                offer.output,
                entity.display_name()
            );
            if let Err(e) = self.registry.chat().broadcast(TRADE_CHANNEL, &message).await {
                debug!("trade announcement dropped: {e}");
            }
        }

        if self.registry.is_available(CapabilitySlot::Network) {
            let network = self.registry.network();
            let payload = serde_json::json!({
                "server": network.server_name(),
                "player": actor.name,
                "entity": entity.display_name(),
                "kind": entity.kind(),
                "item": offer.output.item,
                "quantity": offer.output.quantity,
                "price": offer.buy_price,
            })
            .to_string();
            if let Err(e) = network.broadcast(TRADE_NETWORK_CHANNEL, &payload).await {
                debug!("cross-server trade publication dropped: {e}");
            }
        }
    }
}
