//! Net balances and their aggregation from expense records.
//!
//! A positive balance means the group owes that person money; a negative
//! balance means the person owes the group.

use crate::decimal::Money;
use crate::error::Result;
use crate::record::{ExpenseRecord, Person, RawExpense};
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Signed net balance per person.
///
/// Iteration yields people in first-appearance order, which keeps reports
/// reproducible regardless of hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances {
    entries: Vec<(Person, Money)>,
    index: HashMap<Person, usize>,
}

impl Balances {
    /// Creates an empty balance table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of `person`, if they appear in the table.
    pub fn get(&self, person: &str) -> Option<Money> {
        self.index.get(person).map(|&i| self.entries[i].1)
    }

    /// Iterates `(person, balance)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&Person, Money)> + '_ {
        self.entries.iter().map(|(person, balance)| (person, *balance))
    }

    /// Number of people in the table, settled or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances. Zero up to per-cent rounding drift.
    pub fn total(&self) -> Money {
        self.entries.iter().map(|(_, balance)| *balance).sum()
    }

    /// Mutable access to a person's balance, inserting zero on first sight.
    fn entry(&mut self, person: &str) -> &mut Money {
        let i = match self.index.get(person) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.entries.push((person.to_string(), Money::ZERO));
                self.index.insert(person.to_string(), i);
                i
            }
        };
        &mut self.entries[i].1
    }

    /// Adds `amount` to a person's balance.
    pub fn credit(&mut self, person: &str, amount: Money) {
        *self.entry(person) += amount;
    }

    /// Subtracts an exact (unrounded) share from a person's balance, then
    /// rounds the result to cents.
    pub fn debit_exact(&mut self, person: &str, share: Decimal) {
        let balance = self.entry(person);
        *balance = Money::new(balance.as_decimal() - share);
    }
}

impl<P: Into<Person>> FromIterator<(P, Money)> for Balances {
    /// Builds a table from pairs. A repeated person has its amounts summed.
    fn from_iter<I: IntoIterator<Item = (P, Money)>>(iter: I) -> Self {
        let mut balances = Balances::new();
        for (person, amount) in iter {
            let person: Person = person.into();
            balances.credit(&person, amount);
        }
        balances
    }
}

/// Turns expense records into per-person net balances.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Aggregates validated records in input order.
    ///
    /// For each record the sponsor is credited the full amount, then every
    /// participant (sponsor first, then debtors) is debited the exact share
    /// `amount / participants`, with the running balance rounded to cents
    /// after each debit. A sponsor also listed among the debtors is debited
    /// twice.
    pub fn aggregate(records: &[ExpenseRecord]) -> Balances {
        let mut balances = Balances::new();
        for record in records {
            Self::apply(&mut balances, record);
        }
        balances
    }

    /// Validates and aggregates raw rows, failing on the first malformed one.
    pub fn aggregate_raw<I>(rows: I) -> Result<Balances>
    where
        I: IntoIterator<Item = RawExpense>,
    {
        let mut balances = Balances::new();
        for (idx, raw) in rows.into_iter().enumerate() {
            let record = raw.validate(idx + 1)?;
            Self::apply(&mut balances, &record);
        }
        Ok(balances)
    }

    fn apply(balances: &mut Balances, record: &ExpenseRecord) {
        balances.credit(&record.sponsor, record.amount);

        let share = record.amount.as_decimal() / Decimal::from(record.participant_count());
        for person in record.participants() {
            balances.debit_exact(person, share);
        }

        debug!(
            "{} paid {} for {} participant(s), share {}",
            record.sponsor,
            record.amount,
            record.participant_count(),
            share.round_dp(4)
        );
    }
}
