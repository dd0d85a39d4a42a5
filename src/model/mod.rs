//! Types that represent the core data model: `Expense`, `Ledger`, `Amount` and `Summary`.
mod amount;
mod expense;
mod ledger;
mod summary;

pub use amount::{Amount, AmountError};
pub use expense::{Expense, NewExpense};
pub use ledger::Ledger;
pub use summary::{Breakdown, Summary};
