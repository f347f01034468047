//! Match results and the read-only catalog bets are settled against.

use crate::error::{EngineError, Result};
use crate::rate::ReturnRate;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use uuid::Uuid;

/// Side of a match a player can bet on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BetSide {
    A,
    B,
}

impl BetSide {
    /// Parses the `A` / `B` label used in input records.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "A" => Some(BetSide::A),
            "B" => Some(BetSide::B),
            _ => None,
        }
    }
}

impl fmt::Display for BetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetSide::A => f.write_str("A"),
            BetSide::B => f.write_str("B"),
        }
    }
}

/// Final result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Side A won.
    A,

    /// Side B won.
    B,

    /// Neither side won; bets on the match are void.
    Draw,
}

impl Outcome {
    /// Parses the `A` / `B` / `DRAW` label used in match records.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "A" => Some(Outcome::A),
            "B" => Some(Outcome::B),
            "DRAW" => Some(Outcome::Draw),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::A => f.write_str("A"),
            Outcome::B => f.write_str("B"),
            Outcome::Draw => f.write_str("DRAW"),
        }
    }
}

/// A settled match with the return rate of each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: Uuid,
    pub outcome: Outcome,
    pub return_rate_a: ReturnRate,
    pub return_rate_b: ReturnRate,
}

impl Match {
    pub fn new(id: Uuid, outcome: Outcome, return_rate_a: ReturnRate, return_rate_b: ReturnRate) -> Self {
        Match {
            id,
            outcome,
            return_rate_a,
            return_rate_b,
        }
    }

    /// Side that won the match, `None` on a draw.
    pub fn winning_side(&self) -> Option<BetSide> {
        match self.outcome {
            Outcome::A => Some(BetSide::A),
            Outcome::B => Some(BetSide::B),
            Outcome::Draw => None,
        }
    }

    /// Return rate paid to bets on `side`.
    pub fn return_rate(&self, side: BetSide) -> ReturnRate {
        match side {
            BetSide::A => self.return_rate_a,
            BetSide::B => self.return_rate_b,
        }
    }
}

/// Raw match line: `id,returnRateA,returnRateB,outcome`.
///
/// Rates and outcome stay strings so that parse failures can be reported
/// with the offending row.
#[derive(Debug, Deserialize)]
pub struct MatchRecord {
    pub id: Uuid,
    pub return_rate_a: String,
    pub return_rate_b: String,
    pub outcome: String,
}

impl MatchRecord {
    /// Validates the record and builds a [`Match`].
    pub fn parse(&self, row: usize) -> Result<Match> {
        let outcome = Outcome::from_label(&self.outcome).ok_or_else(|| EngineError::InvalidOutcome {
            row,
            outcome: self.outcome.clone(),
        })?;

        let return_rate_a = Self::parse_rate(&self.return_rate_a, row)?;
        let return_rate_b = Self::parse_rate(&self.return_rate_b, row)?;

        Ok(Match::new(self.id, outcome, return_rate_a, return_rate_b))
    }

    fn parse_rate(raw: &str, row: usize) -> Result<ReturnRate> {
        raw.parse::<ReturnRate>().map_err(|e| EngineError::InvalidRecord {
            row,
            message: format!("invalid return rate '{}': {}", raw, e),
        })
    }
}

/// Immutable lookup table of matches by id.
///
/// Built once before processing starts and only ever borrowed afterwards,
/// so several ledger runs can share one catalog.
#[derive(Debug, Clone, Default)]
pub struct MatchCatalog {
    matches: HashMap<Uuid, Match>,
}

impl MatchCatalog {
    /// Builds a catalog from already validated matches.
    ///
    /// A later match with an id already present replaces the earlier one.
    pub fn new<I>(matches: I) -> Self
    where
        I: IntoIterator<Item = Match>,
    {
        MatchCatalog {
            matches: matches.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    /// Reads headerless match lines from a CSV source.
    ///
    /// Blank lines are skipped. Any invalid line aborts loading.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut matches: HashMap<Uuid, Match> = HashMap::new();
        let mut record = StringRecord::new();

        while csv_reader.read_record(&mut record)? {
            let row = record.position().map_or(0, |p| p.line() as usize);
            let raw: MatchRecord = record.deserialize(None)?;
            let parsed = raw.parse(row)?;

            if matches.contains_key(&parsed.id) {
                return Err(EngineError::InvalidRecord {
                    row,
                    message: format!("duplicate match id {}", parsed.id),
                });
            }

            debug!("Row {}: Loaded match {} ({})", row, parsed.id, parsed.outcome);
            matches.insert(parsed.id, parsed);
        }

        Ok(MatchCatalog { matches })
    }

    /// Finds a match by id.
    pub fn lookup(&self, match_id: &Uuid) -> Result<&Match> {
        self.matches
            .get(match_id)
            .ok_or(EngineError::MatchNotFound { match_id: *match_id })
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Iterates over all matches in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.matches.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::str::FromStr;

    const MATCH_ID: &str = "abae2255-4255-4304-8589-737cdff61640";

    fn match_id() -> Uuid {
        Uuid::parse_str(MATCH_ID).unwrap()
    }

    #[test]
    fn test_from_csv_reads_match() {
        let data = format!("{},1.45,0.75,A", MATCH_ID);
        let catalog = MatchCatalog::from_csv(Cursor::new(data)).unwrap();

        assert_eq!(catalog.len(), 1);
        let m = catalog.lookup(&match_id()).unwrap();
        assert_eq!(m.outcome, Outcome::A);
        assert_eq!(m.return_rate_a, ReturnRate::from_str("1.45").unwrap());
        assert_eq!(m.return_rate_b, ReturnRate::from_str("0.75").unwrap());
    }

    #[test]
    fn test_from_csv_skips_blank_lines() {
        let data = format!("\n\n{},1.45,0.75,DRAW\n", MATCH_ID);
        let catalog = MatchCatalog::from_csv(Cursor::new(data)).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup(&match_id()).unwrap().outcome, Outcome::Draw);
    }

    #[test]
    fn test_from_csv_rejects_invalid_outcome() {
        let data = format!("{},1.45,0.75,INVALID", MATCH_ID);
        let err = MatchCatalog::from_csv(Cursor::new(data)).unwrap_err();

        assert!(matches!(err, EngineError::InvalidOutcome { row: 1, .. }));
    }

    #[test]
    fn test_from_csv_rejects_bad_rate() {
        let data = format!("{},abc,0.75,A", MATCH_ID);
        let err = MatchCatalog::from_csv(Cursor::new(data)).unwrap_err();

        assert!(matches!(err, EngineError::InvalidRecord { row: 1, .. }));
    }

    #[test]
    fn test_from_csv_rejects_duplicate_id() {
        let data = format!("{id},1.45,0.75,A\n{id},2.0,1.0,B", id = MATCH_ID);
        let err = MatchCatalog::from_csv(Cursor::new(data)).unwrap_err();

        assert!(matches!(err, EngineError::InvalidRecord { row: 2, .. }));
    }

    #[test]
    fn test_iter_visits_every_match() {
        let other = "a3815c17-9def-4034-a21f-65369f6d4a56";
        let data = format!("{},1.45,0.75,A\n{},2.0,1.0,B", MATCH_ID, other);
        let catalog = MatchCatalog::from_csv(Cursor::new(data)).unwrap();

        let mut ids: Vec<Uuid> = catalog.iter().map(|m| m.id).collect();
        ids.sort();
        let mut expected = vec![match_id(), Uuid::parse_str(other).unwrap()];
        expected.sort();
        assert_eq!(ids, expected);
        assert!(MatchCatalog::default().iter().next().is_none());
    }

    #[test]
    fn test_lookup_unknown_match() {
        let catalog = MatchCatalog::default();
        let err = catalog.lookup(&match_id()).unwrap_err();

        assert!(matches!(err, EngineError::MatchNotFound { match_id: id } if id == match_id()));
    }

    #[test]
    fn test_winning_side_and_rate() {
        let m = Match::new(
            match_id(),
            Outcome::B,
            ReturnRate::from_str("3.9").unwrap(),
            ReturnRate::from_str("5").unwrap(),
        );

        assert_eq!(m.winning_side(), Some(BetSide::B));
        assert_eq!(m.return_rate(BetSide::B).payout(2), Some(10));

        let draw = Match { outcome: Outcome::Draw, ..m };
        assert_eq!(draw.winning_side(), None);
    }
}
