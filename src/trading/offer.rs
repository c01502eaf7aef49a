//! Immutable trade offers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::ItemStack;

/// Use-count sentinel for unlimited offers.
pub const UNLIMITED_USES: i32 = -1;

/// Stable identity of one generated offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(pub Uuid);

impl OfferId {
    /// Generate a fresh offer id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OfferId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One executable barter exchange: up to two required input stacks for
/// exactly one output stack.
///
/// Offers are immutable once created. A price or inventory change produces a
/// new offer under a new id; nothing ever edits an offer in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOffer {
    /// Offer identity, unique per generation.
    pub id: OfferId,
    /// First required input stack.
    pub input: ItemStack,
    /// Optional second required input stack.
    pub second_input: Option<ItemStack>,
    /// The output stack handed to the actor.
    pub output: ItemStack,
    /// Price at which the entity sells the output, in currency units.
    pub buy_price: u64,
    /// Price at which the entity would buy the output back, in currency units.
    pub sell_price: u64,
    /// Remaining uses; [`UNLIMITED_USES`] (−1) means unlimited.
    pub max_uses: i32,
}

impl TradeOffer {
    /// Create an unlimited-use offer with equal buy/sell price.
    pub fn unlimited(
        input: ItemStack,
        second_input: Option<ItemStack>,
        output: ItemStack,
        price: u64,
    ) -> Self {
        Self {
            id: OfferId::new(),
            input,
            second_input,
            output,
            buy_price: price,
            sell_price: price,
            max_uses: UNLIMITED_USES,
        }
    }

    /// Create a finite-use offer with equal buy/sell price.
    pub fn limited(
        input: ItemStack,
        second_input: Option<ItemStack>,
        output: ItemStack,
        price: u64,
        max_uses: i32,
    ) -> Self {
        Self {
            max_uses,
            ..Self::unlimited(input, second_input, output, price)
        }
    }

    /// Both required inputs, in slot order.
    pub fn inputs(&self) -> impl Iterator<Item = &ItemStack> {
        std::iter::once(&self.input).chain(self.second_input.as_ref())
    }

    /// Whether the offer has no use limit.
    pub fn is_unlimited(&self) -> bool {
        self.max_uses == UNLIMITED_USES
    }
}
