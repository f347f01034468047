//! # Betting Ledger
//!
//! Replays player deposits, withdrawals and bets against a fixed catalog of
//! match results, and settles each player's balance, legitimacy and win rate
//! together with the host's balance change.
//!
//! ## Design Principles
//!
//! - **Strict ordering**: actions are processed in input order with one
//!   global queue counter
//! - **Absorbing illegitimacy**: an unaffordable withdrawal or bet marks the
//!   player illegitimate for the rest of the run
//! - **Fatal structural errors**: unknown actions, unknown matches and double
//!   bets abort the whole run
//! - **Exact payouts**: return rates use `rust_decimal`
//!
//! ## Example
//!
//! ```no_run
//! use betting_ledger::{LedgerEngine, MatchCatalog};
//! use std::fs::File;
//!
//! let catalog = MatchCatalog::from_csv(File::open("match_data.txt").unwrap()).unwrap();
//! let mut engine = LedgerEngine::new(&catalog);
//! engine.process_csv(File::open("player_data.txt").unwrap()).unwrap();
//! engine.finish().unwrap().write_output(std::io::stdout()).unwrap();
//! ```

pub mod action;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod player;
pub mod rate;
pub mod report;

pub use action::{ActionKind, ActionRecord, BetDetails, CommandKind, PlayerAction, PlayerCommand};
pub use catalog::{BetSide, Match, MatchCatalog, MatchRecord, Outcome};
pub use engine::{process, LedgerEngine};
pub use error::{EngineError, Result};
pub use player::Player;
pub use rate::{RateError, ReturnRate, WinRate};
pub use report::SettlementReport;
