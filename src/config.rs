//! Trading engine configuration management.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::error::{Error, Result};
use crate::item::{ItemKey, ItemStack};

/// Main configuration for the trading engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Payment denomination tiers, highest value first.
    pub denominations: Vec<DenominationTier>,

    /// How fractional prices are converted to whole payment units.
    #[serde(default)]
    pub rounding: RoundingPolicy,

    /// Trade-set cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Fixed exchange rates for banker entities.
    #[serde(default)]
    pub banker: BankerConfig,
}

/// One discrete payment denomination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenominationTier {
    /// The item used as payment at this tier.
    pub item: ItemKey,
    /// Value of one unit of this tier in currency units.
    pub value: u64,
}

/// Policy for converting a fractional price into whole payment units.
///
/// The historical behavior is silent truncation; it is kept as the default
/// but made explicit and swappable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingPolicy {
    /// Drop the fractional remainder.
    #[default]
    Truncate,
    /// Round half-up to the nearest whole unit.
    Nearest,
    /// Always round up; the seller never undercharges.
    Ceil,
}

/// Trade-set cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether offer lists are cached per entity.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Fixed exchange rates offered by banker entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankerConfig {
    /// Exchange rates, one offer each.
    pub rates: Vec<BankerRate>,
}

/// One fixed banker exchange: take `take`, give `give`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankerRate {
    /// The payment stack the banker absorbs.
    pub take: ItemStack,
    /// The goods stack the banker mints.
    pub give: ItemStack,
    /// Recorded price of the exchange in currency units.
    pub price: u64,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            denominations: vec![
                DenominationTier {
                    item: ItemKey::new("gold_block"),
                    value: 100,
                },
                DenominationTier {
                    item: ItemKey::new("gold_ingot"),
                    value: 10,
                },
                DenominationTier {
                    item: ItemKey::new("gold_nugget"),
                    value: 1,
                },
            ],
            rounding: RoundingPolicy::default(),
            cache: CacheConfig::default(),
            banker: BankerConfig::default(),
        }
    }
}

impl TradingConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the denomination table: non-empty, positive values, strictly
    /// descending. A lowest tier above value 1 is allowed but means small
    /// remainders are dropped, so it gets a warning.
    pub fn validate(&self) -> Result<()> {
        if self.denominations.is_empty() {
            return Err(Error::Config(
                "at least one payment denomination is required".to_string(),
            ));
        }
        for tier in &self.denominations {
            if tier.value == 0 {
                return Err(Error::Config(format!(
                    "denomination '{}' has zero value",
                    tier.item
                )));
            }
        }
        for pair in self.denominations.windows(2) {
            if pair[0].value <= pair[1].value {
                return Err(Error::Config(format!(
                    "denominations must be strictly descending: '{}' ({}) then '{}' ({})",
                    pair[0].item, pair[0].value, pair[1].item, pair[1].value
                )));
            }
        }
        if let Some(last) = self.denominations.last() {
            if last.value != 1 {
                warn!(
                    "lowest denomination '{}' has value {}; price remainders below it are dropped",
                    last.item, last.value
                );
            }
        }
        Ok(())
    }
}
