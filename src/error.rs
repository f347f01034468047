//! Error types for the betting ledger.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that abort a ledger run.
///
/// Insufficient funds is not an error: it is recorded on the action and the
/// player instead.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Structurally invalid input record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Match outcome other than A, B or DRAW
    #[error("Invalid match outcome '{outcome}' at row {row}")]
    InvalidOutcome { row: usize, outcome: String },

    /// Action name other than DEPOSIT, WITHDRAW or BET
    #[error("{name} is not a valid action")]
    UnknownAction { name: String },

    /// Bet references a match missing from the catalog
    #[error("Match with id {match_id} not found")]
    MatchNotFound { match_id: Uuid },

    /// Second settled bet by one player on one match
    #[error("Player {player} already bet on match {match_id}")]
    DuplicateBet { player: Uuid, match_id: Uuid },

    /// Winning payout does not fit in a balance
    #[error("Payout for player {player} on match {match_id} overflows")]
    PayoutOverflow { player: Uuid, match_id: Uuid },

    /// Balance change pushes a player balance out of range
    #[error("Balance of player {player} overflows")]
    BalanceOverflow { player: Uuid },

    /// Sum of settled bets does not fit the host balance change
    #[error("Host balance change overflows")]
    HostBalanceOverflow,

    /// Illegitimate player whose history holds no illegal action
    #[error("Illegitimate player {player} has no illegal actions")]
    MissingIllegalAction { player: Uuid },

    /// Missing input file arguments
    #[error("Missing input file argument. Usage: betting-ledger <match_data> <player_data> [output]")]
    MissingArgument,
}
