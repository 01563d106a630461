//! Greedy settlement of net balances into peer-to-peer transfers.
//!
//! The resolver repeatedly pairs the largest remaining debtor with the largest
//! remaining creditor and moves the smaller of the two amounts between them.
//! Every round fully settles at least one side, so `n` people with a nonzero
//! balance need at most `n - 1` transfers. This is a heuristic: it does not
//! search for the globally smallest number of transfers.

use crate::balance::Balances;
use crate::decimal::Money;
use crate::error::Result;
use crate::heap::PriorityQueue;
use crate::record::Person;
use log::{debug, info, warn};
use serde::Serialize;
use std::cmp::Reverse;

/// A single payment from a net debtor to a net creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub sender: Person,
    pub receiver: Person,
    /// Always strictly positive.
    pub amount: Money,
}

/// Imbalance left over after settlement.
///
/// Positive = the person is still owed `amount`; negative = the person still
/// owes it. Only per-cent rounding drift in the balances produces residuals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Residual {
    pub person: Person,
    pub amount: Money,
}

/// Output of `SettlementResolver::resolve`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// Transfers in generation order (largest imbalances first).
    pub transfers: Vec<Transfer>,

    /// Unsettled debts first, then unsettled credits, each largest first.
    pub residual: Vec<Residual>,
}

impl Settlement {
    /// Total money moved by all transfers.
    pub fn transferred(&self) -> Money {
        self.transfers.iter().map(|t| t.amount).sum()
    }

    /// Returns `true` when every balance was settled exactly.
    pub fn is_balanced(&self) -> bool {
        self.residual.is_empty()
    }
}

/// `(magnitude, person)` as stored in the resolver's queues.
type Claim = (Money, Person);

/// Largest magnitude first; ties go to the smaller identifier.
fn largest_first(claim: &Claim) -> (Reverse<Money>, Person) {
    (Reverse(claim.0), claim.1.clone())
}

/// Greedy largest-debtor / largest-creditor matcher.
pub struct SettlementResolver;

impl SettlementResolver {
    /// Produces transfers that settle `balances`, plus whatever residual the
    /// greedy matching cannot place.
    ///
    /// A person with a positive starting balance only ever receives, and a
    /// person with a negative starting balance only ever sends. Zero balances
    /// are ignored. The output is deterministic for a given table.
    pub fn resolve(balances: &Balances) -> Result<Settlement> {
        let credits = balances
            .iter()
            .filter(|(_, balance)| balance.is_positive())
            .map(|(person, balance)| (balance, person.clone()));
        let mut creditors = PriorityQueue::from_items(credits, largest_first);

        // Debts are stored as positive magnitudes.
        let debts = balances
            .iter()
            .filter(|(_, balance)| balance.is_negative())
            .map(|(person, balance)| (-balance, person.clone()));
        let mut debtors = PriorityQueue::from_items(debts, largest_first);

        let mut transfers = Vec::new();
        while !creditors.is_empty() && !debtors.is_empty() {
            let (debt, debtor) = debtors.pop()?;
            let (credit, creditor) = creditors.pop()?;

            let amount = debt.min(credit);
            debug!("{} transfers {} to {}", debtor, amount, creditor);

            let remaining_credit = credit - amount;
            if remaining_credit.is_positive() {
                creditors.push((remaining_credit, creditor.clone()));
            }

            let remaining_debt = debt - amount;
            if remaining_debt.is_positive() {
                debtors.push((remaining_debt, debtor.clone()));
            }

            transfers.push(Transfer {
                sender: debtor,
                receiver: creditor,
                amount,
            });
        }

        let residual: Vec<Residual> = debtors
            .into_iter()
            .map(|(debt, person)| Residual {
                person,
                amount: -debt,
            })
            .chain(creditors.into_iter().map(|(credit, person)| Residual {
                person,
                amount: credit,
            }))
            .collect();

        for r in &residual {
            warn!("Unsettled due to rounding: {} {}", r.person, r.amount);
        }
        info!(
            "Settled {} people with {} transfer(s), {} left unsettled",
            balances.len(),
            transfers.len(),
            residual.len()
        );

        Ok(Settlement {
            transfers,
            residual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn balances(pairs: &[(&str, &str)]) -> Balances {
        pairs.iter().map(|(p, m)| (*p, money(m))).collect()
    }

    fn transfer(sender: &str, receiver: &str, amount: &str) -> Transfer {
        Transfer {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount: money(amount),
        }
    }

    #[test]
    fn test_empty_balances() {
        let settlement = SettlementResolver::resolve(&Balances::new()).unwrap();
        assert!(settlement.transfers.is_empty());
        assert!(settlement.residual.is_empty());
        assert!(settlement.is_balanced());
    }

    #[test]
    fn test_one_creditor_two_debtors() {
        let table = balances(&[("A", "20.00"), ("B", "-10.00"), ("C", "-10.00")]);
        let settlement = SettlementResolver::resolve(&table).unwrap();

        assert_eq!(
            settlement.transfers,
            vec![transfer("B", "A", "10.00"), transfer("C", "A", "10.00")]
        );
        assert!(settlement.residual.is_empty());
        assert_eq!(settlement.transferred(), money("20.00"));
    }

    #[test]
    fn test_largest_pairs_first() {
        let settlement = SettlementResolver::resolve(&balances(&[
            ("A", "5.00"),
            ("B", "30.00"),
            ("C", "-25.00"),
            ("D", "-10.00"),
        ]))
        .unwrap();

        // C(25) -> B(30); B has 5 left; D(10) vs B(5) and A(5): tie on 5,
        // A wins by identifier.
        assert_eq!(
            settlement.transfers,
            vec![
                transfer("C", "B", "25.00"),
                transfer("D", "A", "5.00"),
                transfer("D", "B", "5.00"),
            ]
        );
        assert!(settlement.is_balanced());
    }

    #[test]
    fn test_rounding_residual_is_reported() {
        let table = balances(&[("A", "6.67"), ("B", "-3.33"), ("C", "-3.33")]);
        let settlement = SettlementResolver::resolve(&table).unwrap();

        assert_eq!(
            settlement.transfers,
            vec![transfer("B", "A", "3.33"), transfer("C", "A", "3.33")]
        );
        assert_eq!(
            settlement.residual,
            vec![Residual {
                person: "A".to_string(),
                amount: money("0.01"),
            }]
        );
    }

    #[test]
    fn test_debt_residual_is_negative() {
        let settlement =
            SettlementResolver::resolve(&balances(&[("A", "3.33"), ("B", "-3.34")])).unwrap();

        assert_eq!(settlement.transfers, vec![transfer("B", "A", "3.33")]);
        assert_eq!(
            settlement.residual,
            vec![Residual {
                person: "B".to_string(),
                amount: money("-0.01"),
            }]
        );
    }

    #[test]
    fn test_zero_balances_are_ignored() {
        let table = balances(&[("A", "0.00"), ("B", "1.00"), ("C", "-1.00")]);
        let settlement = SettlementResolver::resolve(&table).unwrap();

        assert_eq!(settlement.transfers, vec![transfer("C", "B", "1.00")]);
        assert!(settlement.is_balanced());
    }

    #[test]
    fn test_only_creditors_become_residual() {
        let settlement =
            SettlementResolver::resolve(&balances(&[("A", "1.00"), ("B", "2.00")])).unwrap();

        assert!(settlement.transfers.is_empty());
        let people: Vec<_> = settlement.residual.iter().map(|r| r.person.as_str()).collect();
        assert_eq!(people, vec!["B", "A"]);
    }

    #[test]
    fn test_greedy_is_not_always_minimal() {
        // E->B 7, D->A 6, C->A 3 settles in three transfers, but pairing the
        // largest debtor with the largest creditor splits C across A and B.
        let table = balances(&[
            ("A", "9.00"),
            ("B", "7.00"),
            ("C", "-3.00"),
            ("D", "-6.00"),
            ("E", "-7.00"),
        ]);
        let settlement = SettlementResolver::resolve(&table).unwrap();

        assert_eq!(
            settlement.transfers,
            vec![
                transfer("E", "A", "7.00"),
                transfer("D", "B", "6.00"),
                transfer("C", "A", "2.00"),
                transfer("C", "B", "1.00"),
            ]
        );
        assert!(settlement.transfers.len() < table.len());
    }

    #[test]
    fn test_settlement_serializes_amounts_as_strings() {
        let table = balances(&[("A", "6.67"), ("B", "-3.33"), ("C", "-3.33")]);
        let settlement = SettlementResolver::resolve(&table).unwrap();

        let json = serde_json::to_string(&settlement).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"transfers":["#,
                r#"{"sender":"B","receiver":"A","amount":"3.33"},"#,
                r#"{"sender":"C","receiver":"A","amount":"3.33"}],"#,
                r#""residual":[{"person":"A","amount":"0.01"}]}"#
            )
        );

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let amount: Money = serde_json::from_value(value["residual"][0]["amount"].clone()).unwrap();
        assert_eq!(amount, money("0.01"));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let table = balances(&[
            ("E", "-1.00"),
            ("D", "2.00"),
            ("C", "-1.00"),
            ("B", "2.00"),
            ("A", "-2.00"),
        ]);

        let first = SettlementResolver::resolve(&table).unwrap();
        let second = SettlementResolver::resolve(&table).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.transfers,
            vec![
                transfer("A", "B", "2.00"),
                transfer("C", "D", "1.00"),
                transfer("E", "D", "1.00"),
            ]
        );
    }
}
