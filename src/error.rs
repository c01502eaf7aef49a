//! Error types for the tradehall engine.

use thiserror::Error;

use crate::capability::CapabilitySlot;

/// Result type alias using the tradehall Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Tradehall error taxonomy.
///
/// Capability and operation failures are always returned to the immediate
/// caller as typed results, never propagated as panics or unchecked control
/// flow past a component boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// A capability is not bound, or its adapter self-reports unavailable.
    /// Always recoverable: the caller should degrade or inform the user.
    #[error("capability '{capability}' is unavailable for '{operation}': {reason}")]
    CapabilityUnavailable {
        /// The capability slot that was consulted.
        capability: CapabilitySlot,
        /// The operation that was attempted.
        operation: &'static str,
        /// Human-readable reason, naming the missing third-party system.
        reason: String,
    },

    /// The adapter is available but the specific call could not complete
    /// (insufficient funds, target not found, storage shortfall). Recoverable
    /// and user-facing.
    #[error("operation '{operation}' failed: {reason}")]
    OperationFailed {
        /// The operation that was attempted.
        operation: &'static str,
        /// Human-readable failure reason.
        reason: String,
    },

    /// A previously generated trade offer no longer matches reality.
    /// Logged for operators; users see a generic failure message.
    #[error("inconsistent trade state: {0}")]
    InconsistentState(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a `CapabilityUnavailable` for a slot, naming the missing system.
    pub fn unavailable(
        capability: CapabilitySlot,
        operation: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::CapabilityUnavailable {
            capability,
            operation,
            reason: reason.into(),
        }
    }

    /// Build an `OperationFailed` with a reason.
    pub fn operation_failed(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation,
            reason: reason.into(),
        }
    }

    /// Whether the caller can reasonably retry or degrade.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CapabilityUnavailable { .. } | Self::OperationFailed { .. }
        )
    }

    /// The message shown to a player. Specific for recoverable failures,
    /// generic for inconsistent state (the detailed cause goes to the log).
    pub fn user_message(&self) -> String {
        match self {
            Self::CapabilityUnavailable { reason, .. } => reason.clone(),
            Self::OperationFailed { reason, .. } => reason.clone(),
            Self::InconsistentState(_) => "Trade failed, please try again.".to_string(),
            Self::Config(_) | Self::Io(_) => "Internal error.".to_string(),
        }
    }
}
