use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// A single spending event in the ledger.
///
/// The field names are the on-disk names; changing them breaks existing ledger files.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    pub(crate) id: u64,
    pub(crate) date: String,
    pub(crate) item: String,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    pub(crate) payment_method: String,
    #[serde(default)]
    pub(crate) notes: String,
}

impl Expense {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Case-insensitive comparison against the stored category.
    pub(crate) fn is_in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}

/// The caller-supplied fields of an expense that has not been given an id yet.
///
/// Values are stored verbatim by `Ledger::add`; trimming and defaulting are the caller's job.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewExpense {
    pub date: String,
    pub item: String,
    pub amount: Amount,
    pub category: String,
    pub payment_method: String,
    pub notes: String,
}

impl NewExpense {
    pub(crate) fn into_expense(self, id: u64) -> Expense {
        Expense {
            id,
            date: self.date,
            item: self.item,
            amount: self.amount,
            category: self.category,
            payment_method: self.payment_method,
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_legacy_record() {
        let json = r#"{
            "id": 3,
            "date": "2024-03-01",
            "item": "Bus pass",
            "amount": 75.5,
            "category": "Transport",
            "payment_method": "Cash"
        }"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.id(), 3);
        assert_eq!(expense.amount(), Amount::from_str("75.5").unwrap());
        assert_eq!(expense.notes(), "");
    }

    #[test]
    fn test_serialized_field_names() {
        let expense = Expense {
            id: 1,
            date: "2024-03-01".into(),
            item: "Milk".into(),
            amount: Amount::from_str("2.49").unwrap(),
            category: "Groceries".into(),
            payment_method: "Card".into(),
            notes: String::new(),
        };
        let value = serde_json::to_value(&expense).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "id",
            "date",
            "item",
            "amount",
            "category",
            "payment_method",
            "notes",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object.len(), 7);
    }

    #[test]
    fn test_is_in_category_ignores_case() {
        let expense = Expense {
            category: "Food".into(),
            ..Expense::default()
        };
        assert!(expense.is_in_category("food"));
        assert!(expense.is_in_category("FOOD"));
        assert!(!expense.is_in_category("Foods"));
    }
}
