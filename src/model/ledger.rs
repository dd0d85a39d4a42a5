//! The in-memory expense ledger: id assignment, add/delete, category queries and aggregation.
//!
//! Nothing here touches the filesystem. `LedgerStore` loads and saves a `Ledger`.

use crate::error::LedgerError;
use crate::model::{Expense, NewExpense, Summary};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// An ordered collection of expenses, kept in insertion order.
///
/// Ids are unique within a ledger. The next id is always one more than the largest id present, so
/// ids are never reused while the record holding the largest id remains.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    data: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger from records that already carry ids, e.g. records read from a file.
    pub fn from_data(data: Vec<Expense>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[Expense] {
        &self.data
    }

    pub fn into_data(self) -> Vec<Expense> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Finds the expense with `id`.
    pub fn get(&self, id: u64) -> Option<&Expense> {
        self.data.iter().find(|expense| expense.id == id)
    }

    /// Returns 1 for an empty ledger, otherwise one more than the largest id present.
    ///
    /// This is computed from the current records on every call.
    ///
    /// # Errors
    /// - `LedgerError::IdsExhausted` if the largest id present is `u64::MAX`.
    pub fn next_id(&self) -> Result<u64, LedgerError> {
        match self.data.iter().map(|expense| expense.id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(LedgerError::IdsExhausted),
        }
    }

    /// Assigns the next id to `new`, appends it and returns a copy of the stored record.
    ///
    /// # Errors
    /// The ledger is not modified when any of these is returned.
    /// - `LedgerError::InvalidAmount` if the amount is zero or negative.
    /// - `LedgerError::AmountOverflow` if the ledger could no longer be aggregated with the new
    ///   amount included.
    /// - `LedgerError::IdsExhausted` if there is no id left to assign.
    pub fn add(&mut self, new: NewExpense) -> Result<Expense, LedgerError> {
        if !new.amount.is_positive() {
            return Err(LedgerError::InvalidAmount(new.amount.value()));
        }
        let id = self.next_id()?;
        self.aggregate()?
            .include(&new.category, &new.payment_method, new.amount)?;
        let expense = new.into_expense(id);
        debug!("Adding expense {id} for {}", expense.amount);
        self.data.push(expense.clone());
        Ok(expense)
    }

    /// Removes the expense with `id`. Returns false if there is no such expense.
    pub fn delete(&mut self, id: u64) -> bool {
        match self.data.iter().position(|expense| expense.id == id) {
            Some(ix) => {
                let removed = self.data.remove(ix);
                debug!("Deleted expense {} ({})", removed.id, removed.item);
                true
            }
            None => {
                trace!("No expense with id {id} to delete");
                false
            }
        }
    }

    /// Returns copies of the expenses whose category equals `category`, ignoring case, in ledger
    /// order.
    pub fn filter_by_category(&self, category: &str) -> Vec<Expense> {
        self.data
            .iter()
            .filter(|expense| expense.is_in_category(category))
            .cloned()
            .collect()
    }

    /// Computes the total and the per-category and per-payment-method subtotals.
    ///
    /// Breakdown keys are the exact stored strings (not case-folded) in order of first
    /// appearance.
    ///
    /// # Errors
    /// - `LedgerError::AmountOverflow` if the total or a subtotal does not fit in an `Amount`.
    ///   `add` never produces such a ledger, but a loaded file can hold one.
    pub fn aggregate(&self) -> Result<Summary, LedgerError> {
        let mut summary = Summary::default();
        for expense in &self.data {
            summary.include(&expense.category, &expense.payment_method, expense.amount)?;
        }
        Ok(summary)
    }
}

impl From<Vec<Expense>> for Ledger {
    fn from(data: Vec<Expense>) -> Self {
        Ledger::from_data(data)
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Expense;
    type IntoIter = std::slice::Iter<'a, Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
