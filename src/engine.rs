//! Settlement engine: loads expense records, computes balances, settles them
//! and writes the report.
//!
//! Records are validated when balances are computed; the first malformed
//! record aborts the run with a `Validation` error before any output is
//! written.

use crate::balance::{BalanceAggregator, Balances};
use crate::error::Result;
use crate::record::{CsvExpenseRow, JsonExpenseRow, RawExpense};
use crate::settlement::{Settlement, SettlementResolver};
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use std::io::{Read, Write};
use std::path::Path;

/// Encoding of an expense records file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Header `sponsor,debtors,amount`, debtors quoted and comma-separated.
    Csv,
    /// Array of `{"sponsor", "debtors", "amount"}` objects.
    Json,
}

impl InputFormat {
    /// Picks the format from the file extension. Anything but `.json` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Csv,
        }
    }
}

/// Runs aggregation and settlement over one set of expense records.
///
/// Records accumulate across calls to `process_*`, so several inputs can be
/// combined before settling.
#[derive(Debug, Default)]
pub struct SettlementEngine {
    records: Vec<RawExpense>,
}

impl SettlementEngine {
    /// Creates an engine with no records.
    pub fn new() -> Self {
        SettlementEngine {
            records: Vec::new(),
        }
    }

    /// Reads records in the given format.
    pub fn process<R: Read>(&mut self, reader: R, format: InputFormat) -> Result<()> {
        match format {
            InputFormat::Csv => self.process_csv(reader),
            InputFormat::Json => self.process_json(reader),
        }
    }

    /// Reads CSV records. Fields are trimmed and short rows are allowed so
    /// that a missing column surfaces as a validation error on its record.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let before = self.records.len();
        for result in csv_reader.deserialize::<CsvExpenseRow>() {
            let row = result?;
            self.records.push(row.into_raw());
        }
        debug!("Read {} CSV record(s)", self.records.len() - before);

        Ok(())
    }

    /// Reads a JSON array of records.
    pub fn process_json<R: Read>(&mut self, reader: R) -> Result<()> {
        let rows: Vec<JsonExpenseRow> = serde_json::from_reader(reader)?;
        debug!("Read {} JSON record(s)", rows.len());
        self.records.extend(rows.into_iter().map(JsonExpenseRow::into_raw));
        Ok(())
    }

    /// Number of records read so far.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Validates every record read so far and aggregates them into balances.
    pub fn balances(&self) -> Result<Balances> {
        let balances = BalanceAggregator::aggregate_raw(self.records.iter().cloned())?;
        info!(
            "Aggregated {} record(s) into {} balance(s)",
            self.records.len(),
            balances.len()
        );
        Ok(balances)
    }

    /// Aggregates and settles, returning both stages.
    pub fn settle(&self) -> Result<(Balances, Settlement)> {
        let balances = self.balances()?;
        let settlement = SettlementResolver::resolve(&balances)?;
        Ok((balances, settlement))
    }

    /// Settles and writes the text report.
    ///
    /// Balances are listed in first-appearance order and transfers in the
    /// order they were generated. Residual sections only appear when rounding
    /// left something unsettled; they print magnitudes.
    pub fn write_output<W: Write>(&self, mut writer: W) -> Result<()> {
        let (balances, settlement) = self.settle()?;

        writeln!(writer, "final balances:")?;
        for (person, balance) in balances.iter() {
            writeln!(writer, "{}\t{}", person, balance)?;
        }

        writeln!(writer, "transactions:")?;
        for t in &settlement.transfers {
            writeln!(
                writer,
                "{}\ttransfers\t{}\tto\t{}",
                t.sender, t.amount, t.receiver
            )?;
        }

        let (debts, credits): (Vec<_>, Vec<_>) = settlement
            .residual
            .iter()
            .partition(|r| r.amount.is_negative());
        if !debts.is_empty() {
            writeln!(writer, "missed debt due to rounding:")?;
            for r in debts {
                writeln!(writer, "{}\t{}", r.person, r.amount.abs())?;
            }
        }
        if !credits.is_empty() {
            writeln!(writer, "missed credit due to rounding:")?;
            for r in credits {
                writeln!(writer, "{}\t{}", r.person, r.amount.abs())?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}
