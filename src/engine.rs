//! Core ledger engine.
//!
//! Replays player actions strictly in input order against a read-only match
//! catalog. Every action gets a queue number from one counter shared by all
//! players, and is appended to the acting player's history whether it was
//! legal or not.

use crate::action::{ActionKind, ActionRecord, CommandKind, PlayerAction, PlayerCommand};
use crate::catalog::{BetSide, Match, MatchCatalog};
use crate::error::{EngineError, Result};
use crate::player::Player;
use crate::report::SettlementReport;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::Read;
use uuid::Uuid;

/// Replays `actions` against `catalog` and settles the run.
///
/// Any fatal condition aborts the whole run and no report is produced.
///
/// # Example
///
/// ```
/// use betting_ledger::{process, ActionRecord, MatchCatalog};
/// use uuid::Uuid;
///
/// let player = Uuid::parse_str("163f23ed-e9a9-4e54-a5b1-4e1fc86f12f4").unwrap();
/// let deposit = ActionRecord {
///     player,
///     action: "DEPOSIT".to_string(),
///     match_id: None,
///     coin_amount: 2000,
///     side: None,
/// };
///
/// let report = process(vec![deposit], &MatchCatalog::default()).unwrap();
/// assert_eq!(report.players()[0].balance(), 2000);
/// assert_eq!(report.host_balance_change(), 0);
/// ```
pub fn process<I>(actions: I, catalog: &MatchCatalog) -> Result<SettlementReport>
where
    I: IntoIterator<Item = ActionRecord>,
{
    let mut engine = LedgerEngine::new(catalog);

    for (row_idx, record) in actions.into_iter().enumerate() {
        engine.process_record(&record, row_idx + 1)?;
    }

    engine.finish()
}

/// The betting ledger engine.
///
/// Owns the player registry for a single run and borrows the catalog.
/// Players are created on their first action.
pub struct LedgerEngine<'a> {
    catalog: &'a MatchCatalog,

    /// Players indexed by id.
    players: HashMap<Uuid, Player>,

    /// Queue number handed to the next action.
    next_queue_nr: u64,
}

impl<'a> LedgerEngine<'a> {
    /// Creates an engine with no players.
    pub fn new(catalog: &'a MatchCatalog) -> Self {
        LedgerEngine {
            catalog,
            players: HashMap::new(),
            next_queue_nr: 0,
        }
    }

    /// Processes headerless action lines from a CSV source.
    ///
    /// Blank lines are skipped. The first fatal error stops processing.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut record = StringRecord::new();
        while csv_reader.read_record(&mut record)? {
            let row = record.position().map_or(0, |p| p.line() as usize);
            let action: ActionRecord = record.deserialize(None)?;
            self.process_record(&action, row)?;
        }

        Ok(())
    }

    /// Parses and processes a single raw record.
    pub fn process_record(&mut self, record: &ActionRecord, row: usize) -> Result<()> {
        let command = record.parse(row)?;
        self.process_command(command)
    }

    /// Processes a single typed command.
    pub fn process_command(&mut self, command: PlayerCommand) -> Result<()> {
        let queue_nr = self.next_queue_nr;
        self.next_queue_nr += 1;

        let catalog = self.catalog;
        let player = self
            .players
            .entry(command.player)
            .or_insert_with(|| Player::new(command.player));

        let action = match command.kind {
            CommandKind::Deposit => Self::process_deposit(player, queue_nr, command.coin_amount)?,
            CommandKind::Withdraw => Self::process_withdraw(player, queue_nr, command.coin_amount)?,
            CommandKind::Bet { match_id, side } => {
                let game = catalog.lookup(&match_id)?;
                Self::process_bet(player, game, side, queue_nr, command.coin_amount)?
            }
        };

        player.record(action);
        Ok(())
    }

    /// Processes a deposit. Deposits are always legal.
    fn process_deposit(player: &mut Player, queue_nr: u64, amount: u32) -> Result<PlayerAction> {
        let mut action = PlayerAction::new(queue_nr, ActionKind::Deposit, amount);
        let change = i64::from(amount);

        player.apply(change)?;
        action.balance_change = change;

        debug!("Queue {}: Player {} deposited {}", queue_nr, player.id(), amount);
        Ok(action)
    }

    /// Processes a withdrawal, rejecting it if the balance does not cover it.
    fn process_withdraw(player: &mut Player, queue_nr: u64, amount: u32) -> Result<PlayerAction> {
        let mut action = PlayerAction::new(queue_nr, ActionKind::Withdraw, amount);

        if !player.check_funds(amount) {
            action.reject();
            warn!(
                "Queue {}: Player {} withdrawal of {} exceeds balance {}, player is illegitimate",
                queue_nr,
                player.id(),
                amount,
                player.balance()
            );
            return Ok(action);
        }

        let change = -i64::from(amount);
        player.apply(change)?;
        action.balance_change = change;

        debug!("Queue {}: Player {} withdrew {}", queue_nr, player.id(), amount);
        Ok(action)
    }

    /// Processes a bet on `game`.
    ///
    /// An unaffordable bet is recorded as illegal and not settled. A bet on a
    /// drawn match is legal but void. Otherwise the bet is settled, unless the
    /// player already has a settled bet on the same match, which is fatal.
    fn process_bet(
        player: &mut Player,
        game: &Match,
        side: BetSide,
        queue_nr: u64,
        stake: u32,
    ) -> Result<PlayerAction> {
        let mut action = PlayerAction::bet(queue_nr, stake, game.id, side);

        if !player.check_funds(stake) {
            action.reject();
            warn!(
                "Queue {}: Player {} bet of {} on match {} exceeds balance {}, player is illegitimate",
                queue_nr,
                player.id(),
                stake,
                game.id,
                player.balance()
            );
            return Ok(action);
        }

        let winning_side = match game.winning_side() {
            Some(winning_side) => winning_side,
            None => {
                debug!(
                    "Queue {}: Player {} bet {} on drawn match {}, bet is void",
                    queue_nr,
                    player.id(),
                    stake,
                    game.id
                );
                return Ok(action);
            }
        };

        if player.has_settled_bet_on(&game.id) {
            return Err(EngineError::DuplicateBet {
                player: player.id(),
                match_id: game.id,
            });
        }

        let won = side == winning_side;
        let change = if won {
            game.return_rate(winning_side)
                .payout(stake)
                .ok_or(EngineError::PayoutOverflow {
                    player: player.id(),
                    match_id: game.id,
                })?
        } else {
            -i64::from(stake)
        };

        player.apply(change)?;
        action.settle(won, change);

        debug!(
            "Queue {}: Player {} bet {} on {} in match {}, balance change {}",
            queue_nr,
            player.id(),
            stake,
            side,
            game.id,
            change
        );
        Ok(action)
    }

    /// Host balance change over the players processed so far.
    ///
    /// Sums the negated balance change of every legal bet made by a
    /// legitimate player. Illegitimate players never contribute. Fails with
    /// `HostBalanceOverflow` if the sum does not fit in an `i64`.
    pub fn host_balance_change(&self) -> Result<i64> {
        self.players
            .values()
            .filter(|p| p.is_legitimate())
            .flat_map(|p| p.actions())
            .filter(|a| a.is_legal_bet())
            .try_fold(0i64, |total, a| {
                a.balance_change
                    .checked_neg()
                    .and_then(|change| total.checked_add(change))
            })
            .ok_or(EngineError::HostBalanceOverflow)
    }

    /// Returns a player by id.
    pub fn player(&self, id: &Uuid) -> Option<&Player> {
        self.players.get(id)
    }

    /// Ends the run and hands over all players with the host balance change.
    pub fn finish(self) -> Result<SettlementReport> {
        let host_balance_change = self.host_balance_change()?;
        Ok(SettlementReport::new(
            host_balance_change,
            self.players.into_values().collect(),
        ))
    }
}
