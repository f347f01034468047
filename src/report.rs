//! Settlement report produced at the end of a ledger run.

use crate::error::{EngineError, Result};
use crate::player::Player;
use std::io::Write;

/// Final state of a ledger run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReport {
    /// Coins the host gained (positive) or paid out (negative).
    host_balance_change: i64,

    /// Every player seen in the run, in no particular order.
    players: Vec<Player>,
}

impl SettlementReport {
    pub fn new(host_balance_change: i64, players: Vec<Player>) -> Self {
        SettlementReport {
            host_balance_change,
            players,
        }
    }

    pub fn host_balance_change(&self) -> i64 {
        self.host_balance_change
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Legitimate players sorted by id.
    pub fn legitimate_players(&self) -> Vec<&Player> {
        self.sorted_players(|p| p.is_legitimate())
    }

    /// Illegitimate players sorted by id.
    pub fn illegitimate_players(&self) -> Vec<&Player> {
        self.sorted_players(|p| !p.is_legitimate())
    }

    fn sorted_players<F>(&self, predicate: F) -> Vec<&Player>
    where
        F: Fn(&Player) -> bool,
    {
        let mut players: Vec<_> = self.players.iter().filter(|p| predicate(*p)).collect();
        players.sort_by_key(|p| p.id());
        players
    }

    /// Writes the result text.
    ///
    /// Layout, in order:
    /// - one `<id> <balance> <winRate>` line per legitimate player, then a blank line
    /// - one `<id> <ACTION> <matchId> <coins> <side>` line per illegitimate player
    ///   describing its earliest illegal action (`null` for absent fields),
    ///   then a blank line
    /// - the host balance change, without a trailing newline
    ///
    /// An empty group is written as a single blank line.
    pub fn write_output<W: Write>(&self, mut writer: W) -> Result<()> {
        let legitimate = self.legitimate_players();
        if legitimate.is_empty() {
            writeln!(writer)?;
        }
        for player in legitimate {
            writeln!(
                writer,
                "{} {} {}",
                player.id(),
                player.balance(),
                player.win_rate()
            )?;
        }
        writeln!(writer)?;

        let illegitimate = self.illegitimate_players();
        if illegitimate.is_empty() {
            writeln!(writer)?;
        }
        for player in illegitimate {
            let action = player
                .earliest_illegal_action()
                .ok_or(EngineError::MissingIllegalAction { player: player.id() })?;

            writeln!(
                writer,
                "{} {} {} {} {}",
                player.id(),
                action.kind,
                action
                    .match_id()
                    .map_or_else(|| "null".to_string(), |id| id.to_string()),
                action.coin_amount,
                action
                    .side()
                    .map_or_else(|| "null".to_string(), |side| side.to_string())
            )?;
        }
        writeln!(writer)?;

        write!(writer, "{}", self.host_balance_change)?;
        writer.flush()?;
        Ok(())
    }
}
