//! settle-up CLI
//!
//! Reads expense records and prints final balances, the transfers that settle
//! them, and any amount left over from rounding.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- expenses.csv
//! cargo run -- expenses.json
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug`, `info` or `warn` to control logging verbosity

use settle_up::{InputFormat, Result, SettleError, SettlementEngine};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
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
    if args.len() < 2 {
        return Err(SettleError::MissingArgument);
    }

    let input_path = Path::new(&args[1]);
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut engine = SettlementEngine::new();
    engine.process(reader, InputFormat::from_path(input_path))?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_output(handle)?;

    Ok(())
}
