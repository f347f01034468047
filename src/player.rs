//! Player state and history queries.
//!
//! A player only becomes illegitimate, never legitimate again.

use crate::action::PlayerAction;
use crate::error::{EngineError, Result};
use crate::rate::WinRate;
use uuid::Uuid;

/// A player's ledger state.
///
/// # Invariants
///
/// - `balance` only changes through legal actions
/// - Once `legitimate == false` it stays false for the rest of the run
/// - `actions` is append-only and ordered by queue number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: Uuid,
    balance: i64,
    legitimate: bool,
    actions: Vec<PlayerAction>,
}

impl Player {
    /// Creates a legitimate player with zero balance and no history.
    pub fn new(id: Uuid) -> Self {
        Player {
            id,
            balance: 0,
            legitimate: true,
            actions: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn is_legitimate(&self) -> bool {
        self.legitimate
    }

    /// Processed actions in processing order.
    pub fn actions(&self) -> &[PlayerAction] {
        &self.actions
    }

    /// Checks that the balance covers `amount`.
    ///
    /// A failed check marks the player illegitimate.
    pub fn check_funds(&mut self, amount: u32) -> bool {
        if self.balance >= i64::from(amount) {
            return true;
        }

        self.legitimate = false;
        false
    }

    /// Applies a signed balance change from a legal action.
    ///
    /// Fails with `BalanceOverflow` and leaves the balance untouched if the
    /// result does not fit in an `i64`.
    pub fn apply(&mut self, change: i64) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(change)
            .ok_or(EngineError::BalanceOverflow { player: self.id })?;
        Ok(())
    }

    /// Appends a processed action to the history.
    pub fn record(&mut self, action: PlayerAction) {
        self.actions.push(action);
    }

    /// Returns `true` if the player already has a legal bet on `match_id`
    /// that was settled as a win or loss. Draw bets do not count.
    pub fn has_settled_bet_on(&self, match_id: &Uuid) -> bool {
        self.actions.iter().any(|a| a.is_settled_bet_on(match_id))
    }

    /// The illegal action with the lowest queue number, if any.
    pub fn earliest_illegal_action(&self) -> Option<&PlayerAction> {
        self.actions
            .iter()
            .filter(|a| !a.legal)
            .min_by_key(|a| a.queue_nr)
    }

    /// Won bets over placed bets, counting legal bets only.
    ///
    /// Bets voided by a draw count as placed but not won.
    pub fn win_rate(&self) -> WinRate {
        let placed = self.actions.iter().filter(|a| a.is_legal_bet()).count();
        let won = self.actions.iter().filter(|a| a.is_won_bet()).count();
        WinRate::from_counts(won, placed)
    }
}
