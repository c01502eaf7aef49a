//! Item keys, stacks and counted inventories.
//!
//! These are the plain data types every other component trades in: an item is
//! identified by a catalog-scoped string key, quantities are always paired
//! with a key as an [`ItemStack`], and actor/ledger state is an [`Inventory`]
//! keyed by item.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A catalog-scoped item identifier (e.g. `"minecraft:iron_ingot"` or a
/// custom-item key owned by the item-catalog capability).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    /// Create a new item key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// An item type with a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// The item type.
    pub item: ItemKey,
    /// The stack quantity (always non-zero in well-formed stacks).
    pub quantity: u32,
}

impl ItemStack {
    /// Create a new stack.
    pub fn new(item: impl Into<ItemKey>, quantity: u32) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.quantity, self.item)
    }
}

/// A counted, keyed inventory: actor backpacks and per-entity virtual ledgers.
///
/// `remove` is shortfall-checked and fails with `OperationFailed` rather than
/// going negative; callers that need all-or-nothing multi-stack mutation do
/// their own precondition checks first (see the trade executor).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: HashMap<ItemKey, u32>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity currently held for an item (0 when absent).
    pub fn count(&self, item: &ItemKey) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Whether the inventory covers the whole stack.
    pub fn contains(&self, stack: &ItemStack) -> bool {
        self.count(&stack.item) >= stack.quantity
    }

    /// Add a stack.
    pub fn add(&mut self, stack: &ItemStack) {
        *self.items.entry(stack.item.clone()).or_insert(0) += stack.quantity;
    }

    /// Remove a stack; fails without mutating when the held quantity is short.
    pub fn remove(&mut self, stack: &ItemStack) -> Result<()> {
        let held = self.count(&stack.item);
        if held < stack.quantity {
            return Err(Error::operation_failed(
                "inventory_remove",
                format!(
                    "need {} x {}, only {} held",
                    stack.quantity, stack.item, held
                ),
            ));
        }
        if held == stack.quantity {
            self.items.remove(&stack.item);
        } else {
            self.items.insert(stack.item.clone(), held - stack.quantity);
        }
        Ok(())
    }

    /// Snapshot the contents as stacks, one per distinct item, zero-quantity
    /// entries elided. Order is unspecified.
    pub fn stacks(&self) -> Vec<ItemStack> {
        self.items
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(item, qty)| ItemStack {
                item: item.clone(),
                quantity: *qty,
            })
            .collect()
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.items.values().all(|qty| *qty == 0)
    }
}
