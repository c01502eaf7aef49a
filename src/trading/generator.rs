//! Trade-set generation: pricing, denomination selection, offer lists.
//!
//! The representative policy (used by guild posts) is: read the storage
//! contents, price each distinct item through the item-catalog capability,
//! convert each price into at most two payment stacks whose combined value
//! covers it, and emit one unlimited-use offer per priced item. Items
//! without a positive price, and prices that round to zero payment units,
//! simply produce no offer — never an error.

use tracing::{debug, trace, warn};

use crate::capability::ItemCatalogProvider;
use crate::config::{RoundingPolicy, TradingConfig};
use crate::error::Result;
use crate::item::ItemStack;

use super::offer::TradeOffer;

/// Convert a fractional price into whole payment units per policy.
///
/// Non-finite and non-positive prices yield zero units.
pub fn price_to_units(price: f64, policy: RoundingPolicy) -> u64 {
    if !price.is_finite() || price <= 0.0 {
        return 0;
    }
    let rounded = match policy {
        RoundingPolicy::Truncate => price.floor(),
        RoundingPolicy::Nearest => (price + 0.5).floor(),
        RoundingPolicy::Ceil => price.ceil(),
    };
    rounded as u64
}

/// Clamp a payment count into a stack quantity. A count past the stack limit
/// is capped with a warning, never wrapped.
fn stack_quantity(count: u64) -> u32 {
    u32::try_from(count).unwrap_or_else(|_| {
        warn!("payment count {count} exceeds the stack quantity limit, capping");
        u32::MAX
    })
}

/// Convert a price into an offer's payment requirement: at most two stacks
/// whose combined value is never below the price.
///
/// The first stack takes as many of the largest fitting tier as the price
/// holds. The entire remainder goes into one lower tier: the largest tier
/// dividing it exactly when one exists, otherwise the lowest tier with the
/// count rounded up. Returns `None` when the price rounds to zero units —
/// such items get no offer.
pub fn payment_for(price: f64, config: &TradingConfig) -> Option<(ItemStack, Option<ItemStack>)> {
    let units = price_to_units(price, config.rounding);
    if units == 0 {
        return None;
    }
    let tiers = &config.denominations;

    let Some(top) = tiers.iter().find(|tier| tier.value <= units) else {
        // The price sits below every tier; one unit of the lowest covers it.
        let lowest = tiers.last()?;
        trace!(
            "price {price} is below the lowest denomination, charging one {}",
            lowest.item
        );
        return Some((ItemStack::new(lowest.item.clone(), 1), None));
    };
    let first = ItemStack::new(top.item.clone(), stack_quantity(units / top.value));
    let remainder = units % top.value;
    if remainder == 0 {
        return Some((first, None));
    }

    let second = match tiers
        .iter()
        .find(|tier| tier.value <= remainder && remainder % tier.value == 0)
    {
        Some(tier) => ItemStack::new(tier.item.clone(), stack_quantity(remainder / tier.value)),
        None => {
            let lowest = tiers.last()?;
            let count = remainder.div_ceil(lowest.value);
            debug!(
                "payment for price {price} rounds a {remainder}-unit remainder up to {count} x {}",
                lowest.item
            );
            ItemStack::new(lowest.item.clone(), stack_quantity(count))
        }
    };
    Some((first, Some(second)))
}

/// Generate the offer list for an entity whose supply is a list of
/// item-quantity pairs.
///
/// One unlimited-use offer per distinct priced item: input is the computed
/// payment pile, output is a single unit of the item, buy and sell price are
/// both the rounded price. Empty or fully unpriced contents yield an empty
/// list.
pub async fn generate_offers(
    contents: &[ItemStack],
    catalog: &dyn ItemCatalogProvider,
    config: &TradingConfig,
) -> Result<Vec<TradeOffer>> {
    let mut offers = Vec::new();

    for stack in contents {
        if stack.quantity == 0 {
            continue;
        }
        let price = match catalog.sell_price(&stack.item).await? {
            Some(price) if price > 0.0 => price,
            _ => {
                trace!("item '{}' has no positive price, skipping", stack.item);
                continue;
            }
        };
        let Some((input, second_input)) = payment_for(price, config) else {
            trace!("price {price} for '{}' rounds to zero units, skipping", stack.item);
            continue;
        };

        let units = price_to_units(price, config.rounding);
        offers.push(TradeOffer::unlimited(
            input,
            second_input,
            ItemStack::new(stack.item.clone(), 1),
            units,
        ));
    }

    debug!(
        "generated {} offer(s) from {} storage entr(ies)",
        offers.len(),
        contents.len()
    );
    Ok(offers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CatalogItem;
    use crate::config::DenominationTier;
    use crate::error::Result;
    use crate::item::ItemKey;
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn config_with(values: &[(&str, u64)]) -> TradingConfig {
        TradingConfig {
            denominations: values
                .iter()
                .map(|(item, value)| DenominationTier {
                    item: ItemKey::new(*item),
                    value: *value,
                })
                .collect(),
            ..TradingConfig::default()
        }
    }

    struct TableCatalog {
        prices: HashMap<ItemKey, f64>,
    }

    impl TableCatalog {
        fn new(prices: &[(&str, f64)]) -> Self {
            Self {
                prices: prices
                    .iter()
                    .map(|(item, price)| (ItemKey::new(*item), *price))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl ItemCatalogProvider for TableCatalog {
        fn is_available(&self) -> bool {
            true
        }

        async fn lookup(&self, item: &ItemKey) -> Result<Option<CatalogItem>> {
            Ok(self.prices.get(item).map(|price| CatalogItem {
                item: item.clone(),
                display_name: item.to_string(),
                sell_price: Some(*price),
            }))
        }

        async fn sell_price(&self, item: &ItemKey) -> Result<Option<f64>> {
            Ok(self.prices.get(item).copied())
        }

        async fn display_name(&self, item: &ItemKey) -> Result<String> {
            Ok(item.to_string())
        }
    }

    /// Combined value of a payment, looked up against the config's tiers.
    fn payment_value(config: &TradingConfig, payment: &(ItemStack, Option<ItemStack>)) -> u64 {
        let tier_value = |stack: &ItemStack| {
            let tier = config
                .denominations
                .iter()
                .find(|tier| tier.item == stack.item)
                .expect("payment stack uses a configured tier");
            tier.value * u64::from(stack.quantity)
        };
        tier_value(&payment.0) + payment.1.as_ref().map_or(0, tier_value)
    }

    #[test]
    fn test_rounding_policies() {
        assert_eq!(price_to_units(2.7, RoundingPolicy::Truncate), 2);
        assert_eq!(price_to_units(2.7, RoundingPolicy::Nearest), 3);
        assert_eq!(price_to_units(2.3, RoundingPolicy::Nearest), 2);
        assert_eq!(price_to_units(2.1, RoundingPolicy::Ceil), 3);
        assert_eq!(price_to_units(0.0, RoundingPolicy::Ceil), 0);
        assert_eq!(price_to_units(-4.0, RoundingPolicy::Truncate), 0);
        assert_eq!(price_to_units(f64::NAN, RoundingPolicy::Truncate), 0);
    }

    #[test]
    fn test_selection_takes_the_largest_tier_first() {
        let config = config_with(&[("block", 100), ("ingot", 10), ("nugget", 1)]);

        let (first, second) = payment_for(510.0, &config).unwrap();

        assert_eq!(first, ItemStack::new("block", 5));
        assert_eq!(second, Some(ItemStack::new("ingot", 1)));
    }

    #[test]
    fn test_three_denomination_price_still_covers_with_two_stacks() {
        let config = TradingConfig::default();

        // 512 needs blocks, ingots and nuggets; the remainder after the
        // blocks is carried entirely by nuggets instead of being dropped.
        let payment = payment_for(512.0, &config).unwrap();

        assert_eq!(payment.0, ItemStack::new("gold_block", 5));
        assert_eq!(payment.1, Some(ItemStack::new("gold_nugget", 12)));
        assert_eq!(payment_value(&config, &payment), 512);
    }

    #[test]
    fn test_payment_never_falls_short_of_the_price() {
        let config = TradingConfig::default();

        for price in [1.0, 7.0, 35.0, 512.0, 999.0, 12345.0] {
            let payment = payment_for(price, &config).unwrap();
            let units = price_to_units(price, config.rounding);
            assert!(
                payment_value(&config, &payment) >= units,
                "payment for price {price} falls short"
            );
        }
    }

    #[test]
    fn test_selection_without_the_top_tier() {
        // Price 500 with no 100-tier pays as 50 of the 10-tier.
        let config = config_with(&[("ingot", 10), ("nugget", 1)]);

        let (first, second) = payment_for(500.0, &config).unwrap();

        assert_eq!(first, ItemStack::new("ingot", 50));
        assert_eq!(second, None);
    }

    #[test]
    fn test_selection_of_small_price_uses_lowest_tier() {
        let config = TradingConfig::default();

        let (first, second) = payment_for(5.0, &config).unwrap();

        assert_eq!(first, ItemStack::new("gold_nugget", 5));
        assert_eq!(second, None);
    }

    #[test]
    fn test_non_dividing_remainder_rounds_the_count_up() {
        let config = config_with(&[("bar", 7), ("chip", 3)]);

        // 11 = 1 bar + 4 units; 4 is not a multiple of 3, so the chip count
        // rounds up and the payment overshoots rather than undershoots.
        let payment = payment_for(11.0, &config).unwrap();

        assert_eq!(payment.0, ItemStack::new("bar", 1));
        assert_eq!(payment.1, Some(ItemStack::new("chip", 2)));
        assert_eq!(payment_value(&config, &payment), 13);
    }

    #[test]
    fn test_price_below_every_tier_charges_one_of_the_lowest() {
        let config = config_with(&[("ingot", 10), ("chunk", 5)]);

        let (first, second) = payment_for(3.0, &config).unwrap();

        assert_eq!(first, ItemStack::new("chunk", 1));
        assert_eq!(second, None);
    }

    #[test]
    fn test_astronomical_price_caps_the_stack_quantity() {
        let config = config_with(&[("nugget", 1)]);

        let (first, second) = payment_for(5_000_000_000.0, &config).unwrap();

        assert_eq!(first.quantity, u32::MAX);
        assert_eq!(second, None);
    }

    #[test]
    fn test_selection_is_idempotent() {
        let config = TradingConfig::default();

        assert_eq!(payment_for(730.0, &config), payment_for(730.0, &config));
    }

    #[test]
    fn test_payment_for_zero_price_is_none() {
        let config = TradingConfig::default();

        assert!(payment_for(0.4, &config).is_none());
        assert!(payment_for(0.0, &config).is_none());
    }

    #[tokio::test]
    async fn test_generate_offers_prices_each_item() {
        // Arrange
        let config = TradingConfig::default();
        let catalog = TableCatalog::new(&[("bread", 2.0), ("saddle", 150.0)]);
        let contents = vec![
            ItemStack::new("bread", 10),
            ItemStack::new("saddle", 1),
            ItemStack::new("dirt", 64), // unpriced
        ];

        // Act
        let mut offers = generate_offers(&contents, &catalog, &config).await.unwrap();

        // Assert
        offers.sort_by_key(|offer| offer.buy_price);
        assert_eq!(offers.len(), 2);

        assert_eq!(offers[0].output, ItemStack::new("bread", 1));
        assert_eq!(offers[0].input, ItemStack::new("gold_nugget", 2));
        assert_eq!(offers[0].buy_price, 2);
        assert!(offers[0].is_unlimited());

        assert_eq!(offers[1].output, ItemStack::new("saddle", 1));
        assert_eq!(offers[1].input, ItemStack::new("gold_block", 1));
        assert_eq!(offers[1].second_input, Some(ItemStack::new("gold_ingot", 5)));
        assert_eq!(offers[1].buy_price, 150);
    }

    #[tokio::test]
    async fn test_generate_offers_empty_storage_yields_empty_list() {
        let config = TradingConfig::default();
        let catalog = TableCatalog::new(&[]);

        let offers = generate_offers(&[], &catalog, &config).await.unwrap();

        assert!(offers.is_empty());
    }

    #[tokio::test]
    async fn test_price_rounding_to_zero_yields_no_offer() {
        let config = TradingConfig::default();
        let catalog = TableCatalog::new(&[("pebble", 0.9)]);

        let offers = generate_offers(&[ItemStack::new("pebble", 3)], &catalog, &config)
            .await
            .unwrap();

        assert!(offers.is_empty());
    }

    #[tokio::test]
    async fn test_zero_quantity_entries_are_skipped() {
        let config = TradingConfig::default();
        let catalog = TableCatalog::new(&[("bread", 2.0)]);

        let offers = generate_offers(&[ItemStack::new("bread", 0)], &catalog, &config)
            .await
            .unwrap();

        assert!(offers.is_empty());
    }
}
