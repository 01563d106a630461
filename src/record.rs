//! Expense record models for CSV/JSON parsing and validation.

use crate::decimal::Money;
use crate::error::{Result, SettleError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Opaque identifier of a group member.
pub type Person = String;

/// A validated expense: `sponsor` paid `amount`, shared equally between the
/// sponsor and every entry of `debtors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    /// Who paid.
    pub sponsor: Person,

    /// Who shares the cost besides the sponsor. May repeat the sponsor.
    pub debtors: Vec<Person>,

    /// Total paid, strictly positive.
    pub amount: Money,
}

impl ExpenseRecord {
    /// Everyone charged a share of this expense: the sponsor first, then the
    /// debtors in input order.
    pub fn participants(&self) -> impl Iterator<Item = &Person> {
        std::iter::once(&self.sponsor).chain(self.debtors.iter())
    }

    /// Number of shares the amount is split into.
    pub fn participant_count(&self) -> usize {
        1 + self.debtors.len()
    }
}

/// Raw expense row as read from CSV.
///
/// `debtors` is a single field holding a comma-separated list, so it must be
/// quoted in the file: `A,"B,C",30.00`.
#[derive(Debug, Deserialize)]
pub struct CsvExpenseRow {
    #[serde(default)]
    pub sponsor: Option<String>,

    #[serde(default)]
    pub debtors: Option<String>,

    #[serde(default)]
    pub amount: Option<String>,
}

impl CsvExpenseRow {
    /// Converts the row into the format-neutral raw shape.
    pub fn into_raw(self) -> RawExpense {
        RawExpense {
            sponsor: self.sponsor,
            debtors: self
                .debtors
                .map(|list| list.split(',').map(str::to_string).collect()),
            amount: self.amount,
        }
    }
}

/// Text of a JSON amount: strings as-is, numbers as their literal.
///
/// `serde_json` runs with `arbitrary_precision`, so a number keeps the digits
/// written in the file instead of passing through `f64`. Any other JSON type
/// is handed on as its JSON text and fails amount validation.
fn json_amount_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Raw expense object as read from a JSON array.
#[derive(Debug, Deserialize)]
pub struct JsonExpenseRow {
    #[serde(default)]
    pub sponsor: Option<String>,

    #[serde(default)]
    pub debtors: Option<Vec<String>>,

    #[serde(default)]
    pub amount: Option<serde_json::Value>,
}

impl JsonExpenseRow {
    /// Converts the row into the format-neutral raw shape.
    pub fn into_raw(self) -> RawExpense {
        RawExpense {
            sponsor: self.sponsor,
            debtors: self.debtors,
            amount: self.amount.map(json_amount_text),
        }
    }
}

/// Unvalidated expense fields, independent of the input encoding.
#[derive(Debug, Clone, Default)]
pub struct RawExpense {
    pub sponsor: Option<String>,
    pub debtors: Option<Vec<String>>,
    pub amount: Option<String>,
}

impl RawExpense {
    /// Validates the raw fields into an `ExpenseRecord`.
    ///
    /// `record` is the 1-based input position, reported in errors.
    pub fn validate(self, record: usize) -> Result<ExpenseRecord> {
        let sponsor = parse_person(self.sponsor.as_deref(), record, "sponsor")?
            .ok_or_else(|| SettleError::validation(record, "sponsor", "is missing"))?;

        let names = self
            .debtors
            .ok_or_else(|| SettleError::validation(record, "debtors", "is missing"))?;
        let mut debtors = Vec::with_capacity(names.len());
        for name in &names {
            match parse_person(Some(name.as_str()), record, "debtors")? {
                Some(person) => debtors.push(person),
                None => {
                    return Err(SettleError::validation(
                        record,
                        "debtors",
                        "contains an empty name",
                    ))
                }
            }
        }
        if debtors.is_empty() {
            return Err(SettleError::validation(
                record,
                "debtors",
                "must name at least one person",
            ));
        }

        let amount = parse_amount(self.amount.as_deref(), record)?;

        Ok(ExpenseRecord {
            sponsor,
            debtors,
            amount,
        })
    }
}

/// Trims a person name. Blank names count as absent.
fn parse_person(raw: Option<&str>, record: usize, field: &'static str) -> Result<Option<Person>> {
    let Some(raw) = raw else {
        return Err(SettleError::validation(record, field, "is missing"));
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

/// Largest accepted expense amount, in whole currency units.
///
/// Keeps every exact share and running balance well inside the 28 significant
/// digits `Decimal` can hold.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Parses an amount that must be positive, at most `MAX_AMOUNT`, with at most
/// 2 fractional digits.
fn parse_amount(raw: Option<&str>, record: usize) -> Result<Money> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(SettleError::validation(record, "amount", "is missing"));
    }

    let value = Decimal::from_str(trimmed).map_err(|e| {
        SettleError::validation(
            record,
            "amount",
            format!("'{}' is not a decimal number: {}", trimmed, e),
        )
    })?;

    if value.normalize().scale() > Money::SCALE {
        return Err(SettleError::validation(
            record,
            "amount",
            format!("'{}' has more than {} fractional digits", trimmed, Money::SCALE),
        ));
    }
    if value <= Decimal::ZERO {
        return Err(SettleError::validation(
            record,
            "amount",
            format!("'{}' must be positive", trimmed),
        ));
    }
    if value > Decimal::from(MAX_AMOUNT) {
        return Err(SettleError::validation(
            record,
            "amount",
            format!("'{}' exceeds the maximum of {}", trimmed, MAX_AMOUNT),
        ));
    }

    Ok(Money::new(value))
}
