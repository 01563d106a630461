//! # settle-up
//!
//! Turns shared-expense records into net balances and a short list of
//! transfers that settles them.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Cents via `rust_decimal`, rounded half-to-even
//! - **Greedy settlement**: Largest debtor pays largest creditor, at most `n - 1` transfers
//! - **Visible rounding**: Cent drift that cannot be settled is reported, never dropped
//! - **Deterministic output**: Ties broken by person identifier
//!
//! ## Example
//!
//! ```
//! use settle_up::{BalanceAggregator, ExpenseRecord, Money, SettlementResolver};
//!
//! let records = vec![ExpenseRecord {
//!     sponsor: "A".to_string(),
//!     debtors: vec!["B".to_string(), "C".to_string()],
//!     amount: Money::from_cents(3000),
//! }];
//!
//! let balances = BalanceAggregator::aggregate(&records);
//! let settlement = SettlementResolver::resolve(&balances).unwrap();
//!
//! assert_eq!(settlement.transfers.len(), 2);
//! assert!(settlement.residual.is_empty());
//! ```

pub mod balance;
pub mod decimal;
pub mod engine;
pub mod error;
pub mod heap;
pub mod record;
pub mod settlement;

pub use balance::{BalanceAggregator, Balances};
pub use decimal::Money;
pub use engine::{InputFormat, SettlementEngine};
pub use error::{Result, SettleError};
pub use heap::PriorityQueue;
pub use record::{ExpenseRecord, Person, RawExpense};
pub use settlement::{Residual, Settlement, SettlementResolver, Transfer};
