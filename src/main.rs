//! Betting Ledger CLI
//!
//! Reads match results and player actions, replays the actions and writes
//! the settlement.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- match_data.txt player_data.txt [result.txt]
//! ```
//!
//! Without an output path the result is written to stdout.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use betting_ledger::{EngineError, LedgerEngine, MatchCatalog, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(EngineError::MissingArgument);
    }

    let match_file = File::open(&args[1])?;
    let catalog = MatchCatalog::from_csv(BufReader::new(match_file))?;

    let player_file = File::open(&args[2])?;
    let mut engine = LedgerEngine::new(&catalog);
    engine.process_csv(BufReader::new(player_file))?;

    let report = engine.finish()?;

    match args.get(3) {
        Some(output_path) => {
            let file = File::create(output_path)?;
            report.write_output(BufWriter::new(file))?;
        }
        None => {
            let stdout = io::stdout();
            report.write_output(stdout.lock())?;
        }
    }

    Ok(())
}
