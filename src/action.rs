//! Player action models: raw input records, typed commands and recorded history.

use crate::catalog::BetSide;
use crate::error::{EngineError, Result};
use serde::Deserialize;
use std::fmt;
use uuid::Uuid;

/// Raw action record as read from the player data.
///
/// Layout: `playerId,actionName,matchId,coinAmount,betSide`. The match id and
/// bet side are empty for anything but a bet.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionRecord {
    /// Acting player
    pub player: Uuid,

    /// Action name: DEPOSIT, WITHDRAW or BET
    pub action: String,

    /// Match the bet is placed on (BET only)
    pub match_id: Option<Uuid>,

    /// Coins deposited, withdrawn or staked
    pub coin_amount: u32,

    /// Chosen side (BET only); the trailing field may be left out entirely
    #[serde(default)]
    pub side: Option<String>,
}

impl ActionRecord {
    /// Parses the raw record into a typed command.
    ///
    /// An unknown action name is fatal for the run, as is a bet that lacks
    /// a match id or a valid side.
    pub fn parse(&self, row: usize) -> Result<PlayerCommand> {
        let kind = match ActionKind::from_name(&self.action) {
            Some(ActionKind::Deposit) => CommandKind::Deposit,
            Some(ActionKind::Withdraw) => CommandKind::Withdraw,
            Some(ActionKind::Bet) => self.parse_bet(row)?,
            None => {
                return Err(EngineError::UnknownAction {
                    name: self.action.clone(),
                })
            }
        };

        Ok(PlayerCommand {
            player: self.player,
            coin_amount: self.coin_amount,
            kind,
        })
    }

    fn parse_bet(&self, row: usize) -> Result<CommandKind> {
        let match_id = self.match_id.ok_or_else(|| EngineError::InvalidRecord {
            row,
            message: "bet is missing a match id".to_string(),
        })?;

        let label = self.side.as_deref().unwrap_or("");
        let side = BetSide::from_label(label).ok_or_else(|| EngineError::InvalidRecord {
            row,
            message: format!("invalid bet side '{}'", label),
        })?;

        Ok(CommandKind::Bet { match_id, side })
    }
}

/// Kind of a player action, as named in input and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Deposit,
    Withdraw,
    Bet,
}

impl ActionKind {
    /// Parses the upper-case action name used in records.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DEPOSIT" => Some(ActionKind::Deposit),
            "WITHDRAW" => Some(ActionKind::Withdraw),
            "BET" => Some(ActionKind::Bet),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Deposit => f.write_str("DEPOSIT"),
            ActionKind::Withdraw => f.write_str("WITHDRAW"),
            ActionKind::Bet => f.write_str("BET"),
        }
    }
}

/// A parsed action ready for the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub player: Uuid,
    pub coin_amount: u32,
    pub kind: CommandKind,
}

/// Command variants with their associated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Credit coins to the player.
    Deposit,

    /// Debit coins if the balance covers them.
    Withdraw,

    /// Stake coins on one side of a match.
    Bet { match_id: Uuid, side: BetSide },
}

/// Bet-specific fields of a recorded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetDetails {
    pub match_id: Uuid,
    pub side: BetSide,

    /// `None` when the bet was illegal or the match ended in a draw.
    pub won: Option<bool>,
}

/// One processed action in a player's history.
///
/// Appended once and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAction {
    /// Position in the whole action stream, not per player.
    pub queue_nr: u64,

    pub kind: ActionKind,

    /// Coins requested by the action.
    pub coin_amount: u32,

    /// Signed change applied to the balance; zero when rejected.
    pub balance_change: i64,

    pub legal: bool,

    pub bet: Option<BetDetails>,
}

impl PlayerAction {
    /// Creates a legal action with no balance effect yet.
    pub fn new(queue_nr: u64, kind: ActionKind, coin_amount: u32) -> Self {
        PlayerAction {
            queue_nr,
            kind,
            coin_amount,
            balance_change: 0,
            legal: true,
            bet: None,
        }
    }

    /// Creates a bet action on `match_id`, not yet settled.
    pub fn bet(queue_nr: u64, coin_amount: u32, match_id: Uuid, side: BetSide) -> Self {
        PlayerAction {
            bet: Some(BetDetails {
                match_id,
                side,
                won: None,
            }),
            ..PlayerAction::new(queue_nr, ActionKind::Bet, coin_amount)
        }
    }

    /// Marks the action as rejected. The balance change stays zero.
    pub fn reject(&mut self) {
        self.legal = false;
        self.balance_change = 0;
    }

    /// Records the result of a settled bet.
    pub fn settle(&mut self, won: bool, balance_change: i64) {
        if let Some(bet) = self.bet.as_mut() {
            bet.won = Some(won);
        }
        self.balance_change = balance_change;
    }

    pub fn match_id(&self) -> Option<Uuid> {
        self.bet.map(|b| b.match_id)
    }

    pub fn side(&self) -> Option<BetSide> {
        self.bet.map(|b| b.side)
    }

    /// `true` for a legal bet, whether settled or voided by a draw.
    pub fn is_legal_bet(&self) -> bool {
        self.legal && self.kind == ActionKind::Bet
    }

    /// `true` for a legal bet that was won.
    pub fn is_won_bet(&self) -> bool {
        self.is_legal_bet() && self.bet.and_then(|b| b.won) == Some(true)
    }

    /// `true` for a legal bet on `match_id` that was settled as a win or loss.
    pub fn is_settled_bet_on(&self, match_id: &Uuid) -> bool {
        self.is_legal_bet()
            && self
                .bet
                .is_some_and(|b| b.won.is_some() && b.match_id == *match_id)
    }
}
