//! The trade executor: one exchange, run to a terminal state.
//!
//! Per attempt the machine is `Requested -> Validated -> Applied ->
//! Committed`, with `Rejected` and `Failed` as terminal error states.
//! `Rejected` means no mutation happened and the user may retry. `Failed`
//! means a step of the application could not complete — the cached offer was
//! stale relative to storage state — and the steps already taken were
//! reversed best-effort; it is logged at high severity and surfaced to the
//! user only as a generic failure.
//!
//! Application order is fixed: debit the actor's inputs, credit the actor's
//! output, deposit the inputs into the entity's receiving storage, remove the
//! output from the entity's supplying storage. Debiting the actor first
//! guarantees the actor can never end up with goods it has not paid for,
//! even when a later step fails.

use tracing::{debug, error, info, trace};

use crate::error::Result;
use crate::item::ItemStack;

use super::offer::TradeOffer;
use super::{PlayerActor, TradingEntity};

/// Phases of one trade attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradePhase {
    /// Caller supplied (offer, actor).
    Requested,
    /// `can_execute` re-checked and passed.
    Validated,
    /// Inventory/storage mutation in progress.
    Applied,
    /// Exchange complete; the caller invalidates the entity's trade set.
    Committed,
    /// Validation failed; nothing was mutated. Retryable and user-facing.
    Rejected,
    /// Partial application was reversed. Logged; users see a generic message.
    Failed,
}

/// Terminal result of one trade attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeOutcome {
    /// The exchange completed.
    Committed,
    /// The exchange was refused before any mutation.
    Rejected {
        /// Specific, user-facing reason.
        reason: String,
    },
    /// The exchange broke mid-application and was rolled back.
    Failed {
        /// Operator-facing detail; not shown to users.
        reason: String,
    },
}

impl TradeOutcome {
    /// Whether the exchange completed.
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }

    /// The terminal phase this outcome represents.
    pub fn phase(&self) -> TradePhase {
        match self {
            Self::Committed => TradePhase::Committed,
            Self::Rejected { .. } => TradePhase::Rejected,
            Self::Failed { .. } => TradePhase::Failed,
        }
    }

    /// The message shown to the player.
    pub fn user_message(&self) -> String {
        match self {
            Self::Committed => "Trade complete.".to_string(),
            Self::Rejected { reason } => reason.clone(),
            Self::Failed { .. } => "Trade failed, please try again.".to_string(),
        }
    }
}

/// Run one trade attempt against an entity.
///
/// Re-runs the entity's `can_execute` before mutating anything — the offer
/// may have been generated long before this call. Returns `Err` only for
/// non-recoverable infrastructure errors; every expected outcome, including
/// rollback after partial application, is a `TradeOutcome`.
pub async fn run_trade<E>(
    entity: &E,
    offer: &TradeOffer,
    actor: &mut PlayerActor,
) -> Result<TradeOutcome>
where
    E: TradingEntity + ?Sized,
{
    trace!(
        "trade requested: actor '{}', entity '{}', offer {}",
        actor.name,
        entity.display_name(),
        offer.id
    );

    // Requested -> Validated. A recoverable capability/operation error here
    // is a user-facing rejection, not a crash.
    match entity.can_execute(offer, actor).await {
        Ok(true) => {}
        Ok(false) => {
            debug!(
                "trade rejected: actor '{}' cannot execute offer {} against '{}'",
                actor.name,
                offer.id,
                entity.display_name()
            );
            return Ok(TradeOutcome::Rejected {
                reason: "You cannot make this trade right now.".to_string(),
            });
        }
        Err(e) if e.is_recoverable() => {
            debug!("trade rejected during validation: {e}");
            return Ok(TradeOutcome::Rejected {
                reason: e.user_message(),
            });
        }
        Err(e) => return Err(e),
    }

    // Validated -> Applied, in the fixed order. Track what is done so a
    // failure can be reversed.

    // 1. Remove the inputs from the actor.
    let mut debited: Vec<ItemStack> = Vec::new();
    for stack in offer.inputs() {
        if let Err(e) = actor.inventory.remove(stack) {
            for taken in &debited {
                actor.inventory.add(taken);
            }
            error!(
                "trade failed debiting actor '{}' for offer {}: {e}",
                actor.name, offer.id
            );
            return Ok(TradeOutcome::Failed {
                reason: format!("actor debit failed after validation: {e}"),
            });
        }
        debited.push(stack.clone());
    }

    // 2. Credit the output to the actor.
    actor.inventory.add(&offer.output);

    // 3. Deposit the inputs into the entity's receiving storage.
    let mut received: Vec<ItemStack> = Vec::new();
    for stack in offer.inputs() {
        if let Err(e) = entity.receive_payment(stack).await {
            reverse(entity, actor, offer, &debited, &received).await;
            error!(
                "trade failed depositing payment into '{}' for offer {}: {e}",
                entity.display_name(),
                offer.id
            );
            return Ok(TradeOutcome::Failed {
                reason: format!("payment deposit failed: {e}"),
            });
        }
        received.push(stack.clone());
    }

    // 4. Remove the output from the entity's supplying storage. This is
    // where a stale offer shows up: the supply may be gone since generation.
    if let Err(e) = entity.supply_goods(&offer.output).await {
        reverse(entity, actor, offer, &debited, &received).await;
        error!(
            "trade failed: '{}' could not supply {} for offer {} (stale trade set?): {e}",
            entity.display_name(),
            offer.output,
            offer.id
        );
        return Ok(TradeOutcome::Failed {
            reason: format!("supply withdrawal failed: {e}"),
        });
    }

    info!(
        "trade committed: actor '{}' paid {} for {} at '{}'",
        actor.name,
        offer
            .inputs()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" + "),
        offer.output,
        entity.display_name()
    );
    Ok(TradeOutcome::Committed)
}

/// Best-effort reversal of the steps taken so far: reclaim deposited
/// payments, take back the credited output, refund the debited inputs.
/// Reversal errors are logged, never propagated — the actor's refund must
/// happen regardless.
async fn reverse<E>(
    entity: &E,
    actor: &mut PlayerActor,
    offer: &TradeOffer,
    debited: &[ItemStack],
    received: &[ItemStack],
) where
    E: TradingEntity + ?Sized,
{
    for stack in received {
        if let Err(e) = entity.reclaim_payment(stack).await {
            error!(
                "could not reclaim payment {} from '{}' during rollback: {e}",
                stack,
                entity.display_name()
            );
        }
    }
    if let Err(e) = actor.inventory.remove(&offer.output) {
        error!(
            "could not take back output {} from actor '{}' during rollback: {e}",
            offer.output, actor.name
        );
    }
    for stack in debited {
        actor.inventory.add(stack);
    }
}
