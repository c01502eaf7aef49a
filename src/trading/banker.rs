//! Banker entity: unlimited synthetic exchange at fixed rates.

use async_trait::async_trait;

use crate::config::BankerRate;
use crate::error::Result;
use crate::item::ItemStack;

use super::offer::TradeOffer;
use super::{EntityId, EntityKind, PlayerActor, TradingEntity};

/// A banker: no backing inventory at all.
///
/// Its exchange rates are fixed configuration, never derived from stock;
/// payments are absorbed and goods are minted, so every offer is executable
/// forever as long as the actor can pay.
pub struct BankerEntity {
    id: EntityId,
    name: String,
    rates: Vec<BankerRate>,
}

impl BankerEntity {
    /// Create a banker with fixed exchange rates.
    pub fn new(name: impl Into<String>, rates: Vec<BankerRate>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            rates,
        }
    }
}

#[async_trait]
impl TradingEntity for BankerEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Banker
    }

    async fn trade_inventory(&self) -> Result<Option<Vec<ItemStack>>> {
        // Synthetic source: nothing to show.
        Ok(None)
    }

    async fn list_offers(&self) -> Result<Vec<TradeOffer>> {
        Ok(self
            .rates
            .iter()
            .map(|rate| {
                TradeOffer::unlimited(rate.take.clone(), None, rate.give.clone(), rate.price)
            })
            .collect())
    }

    async fn can_execute(&self, offer: &TradeOffer, actor: &PlayerActor) -> Result<bool> {
        Ok(actor.can_pay(offer))
    }

    async fn receive_payment(&self, _stack: &ItemStack) -> Result<()> {
        // Absorbed.
        Ok(())
    }

    async fn supply_goods(&self, _stack: &ItemStack) -> Result<()> {
        // Minted.
        Ok(())
    }

    async fn reclaim_payment(&self, _stack: &ItemStack) -> Result<()> {
        Ok(())
    }
}
