use crate::error::LedgerError;
use crate::model::Amount;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Spending totals for a ledger.
///
/// `total`, the sum of `by_category`, and the sum of `by_method` are three partitions of the same
/// amounts and are always exactly equal.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub(crate) total: Amount,
    pub(crate) by_category: Breakdown,
    pub(crate) by_method: Breakdown,
}

impl Summary {
    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn by_category(&self) -> &Breakdown {
        &self.by_category
    }

    pub fn by_method(&self) -> &Breakdown {
        &self.by_method
    }

    /// Counts `amount` towards the total and the `category` and `payment_method` subtotals.
    pub(crate) fn include(
        &mut self,
        category: &str,
        payment_method: &str,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.total = self
            .total
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow(amount.value()))?;
        self.by_category.add(category, amount)?;
        self.by_method.add(payment_method, amount)
    }
}

/// Subtotals keyed by an exact label, kept in order of first appearance.
///
/// Serializes as a JSON object whose keys appear in that same order.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Breakdown {
    entries: Vec<(String, Amount)>,
}

impl Breakdown {
    /// Adds `amount` to the subtotal for `label`, appending a new entry if it is the first time
    /// `label` has been seen. The breakdown is unchanged if the subtotal would overflow.
    pub(crate) fn add(&mut self, label: &str, amount: Amount) -> Result<(), LedgerError> {
        match self.entries.iter_mut().find(|(key, _)| key == label) {
            Some((_, subtotal)) => {
                *subtotal = subtotal
                    .checked_add(amount)
                    .ok_or(LedgerError::AmountOverflow(amount.value()))?;
            }
            None => self.entries.push((label.to_string(), amount)),
        }
        Ok(())
    }

    /// The subtotal for `label`, matched exactly.
    pub fn get(&self, label: &str) -> Option<Amount> {
        self.entries
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.entries
            .iter()
            .map(|(key, amount)| (key.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The sum of all subtotals, or `None` if it does not fit in an `Amount`.
    pub fn total(&self) -> Option<Amount> {
        self.entries
            .iter()
            .try_fold(Amount::ZERO, |total, (_, amount)| {
                total.checked_add(*amount)
            })
    }
}

impl Serialize for Breakdown {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, amount) in &self.entries {
            map.serialize_entry(key, amount)?;
        }
        map.end()
    }
}
