//! Economy capability: the currency ledger.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::CapabilitySlot;

/// Access to the server's currency ledger (balances, withdrawals, deposits).
///
/// Adapters may perform blocking I/O against a remote ledger; they must do so
/// off the tick thread and marshal results back before mutating engine state.
#[async_trait]
pub trait EconomyProvider: Send + Sync {
    /// Whether a ledger backend is installed and reachable.
    fn is_available(&self) -> bool;

    /// Current balance of a player account.
    async fn balance(&self, player: &str) -> Result<f64>;

    /// Withdraw an amount from a player account. Fails with `OperationFailed`
    /// on insufficient funds.
    async fn withdraw(&self, player: &str, amount: f64) -> Result<()>;

    /// Deposit an amount into a player account.
    async fn deposit(&self, player: &str, amount: f64) -> Result<()>;

    /// Display name of the currency (e.g. "gold").
    fn currency_name(&self) -> &str;
}

/// Fallback bound when no economy ledger plugin is installed.
#[derive(Debug, Default)]
pub struct UnavailableEconomy;

impl UnavailableEconomy {
    const REASON: &'static str = "no economy ledger plugin is installed";

    fn fail(operation: &'static str) -> Error {
        Error::unavailable(CapabilitySlot::Economy, operation, Self::REASON)
    }
}

#[async_trait]
impl EconomyProvider for UnavailableEconomy {
    fn is_available(&self) -> bool {
        false
    }

    async fn balance(&self, _player: &str) -> Result<f64> {
        Err(Self::fail("balance"))
    }

    async fn withdraw(&self, _player: &str, _amount: f64) -> Result<()> {
        Err(Self::fail("withdraw"))
    }

    async fn deposit(&self, _player: &str, _amount: f64) -> Result<()> {
        Err(Self::fail("deposit"))
    }

    fn currency_name(&self) -> &str {
        "currency"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fallback_is_never_available() {
        let economy = UnavailableEconomy;

        assert!(!economy.is_available());
    }

    #[tokio::test]
    async fn test_fallback_operations_fail_with_capability_unavailable() {
        let economy = UnavailableEconomy;

        let err = economy.withdraw("alice", 10.0).await.unwrap_err();

        match err {
            Error::CapabilityUnavailable {
                capability,
                operation,
                ..
            } => {
                assert_eq!(capability, CapabilitySlot::Economy);
                assert_eq!(operation, "withdraw");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(economy.balance("alice").await.is_err());
        assert!(economy.deposit("alice", 1.0).await.is_err());
    }
}
