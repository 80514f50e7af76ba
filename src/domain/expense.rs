use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Amount;

pub type ExpenseId = i64;

/// The mutable part of an expense. Updates overwrite all four fields at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseFields {
    pub amount: Amount,
    /// Free-form label, compared exactly (no case folding)
    pub category: String,
    pub description: String,
    /// Calendar date as `YYYY-MM-DD`; kept as text so it sorts chronologically
    pub date: String,
}

impl ExpenseFields {
    pub fn new(
        amount: Amount,
        category: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            category: category.into(),
            description: description.into(),
            date: date.into(),
        }
    }
}

/// A creation request: the expense fields plus the client's idempotency key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub fields: ExpenseFields,
    pub idempotency_key: String,
}

impl NewExpense {
    pub fn new(fields: ExpenseFields, idempotency_key: impl Into<String>) -> Self {
        Self {
            fields,
            idempotency_key: idempotency_key.into(),
        }
    }
}

/// A persisted expense. `id`, `created_at` and `idempotency_key` are assigned
/// once at insertion and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub date: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub idempotency_key: String,
}

impl Expense {
    /// Build the stored form of a creation request.
    pub fn from_new(id: ExpenseId, new: &NewExpense, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            amount: new.fields.amount,
            category: new.fields.category.clone(),
            description: new.fields.description.clone(),
            date: new.fields.date.clone(),
            created_at,
            idempotency_key: new.idempotency_key.clone(),
        }
    }

    /// Overwrite the mutable fields, leaving identity untouched.
    pub fn apply(&mut self, fields: &ExpenseFields) {
        self.amount = fields.amount;
        self.category = fields.category.clone();
        self.description = fields.description.clone();
        self.date = fields.date.clone();
    }

    pub fn fields(&self) -> ExpenseFields {
        ExpenseFields::new(
            self.amount,
            self.category.clone(),
            self.description.clone(),
            self.date.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_apply_keeps_identity() {
        let new = NewExpense::new(
            ExpenseFields::new(dec!(12.50), "Food", "lunch", "2024-01-05"),
            "k1",
        );
        let created_at = Utc::now();
        let mut expense = Expense::from_new(1, &new, created_at);

        expense.apply(&ExpenseFields::new(dec!(3.10), "Transport", "", "2024-02-01"));

        assert_eq!(expense.id, 1);
        assert_eq!(expense.created_at, created_at);
        assert_eq!(expense.idempotency_key, "k1");
        assert_eq!(expense.amount, dec!(3.10));
        assert_eq!(expense.category, "Transport");
        assert_eq!(expense.description, "");
        assert_eq!(expense.date, "2024-02-01");
    }

    #[test]
    fn test_serialized_amount_is_decimal_text() {
        let new = NewExpense::new(
            ExpenseFields::new(dec!(0.10), "Food", "", "2024-01-05"),
            "k1",
        );
        let expense = Expense::from_new(7, &new, Utc::now());
        let json = serde_json::to_value(&expense).unwrap();

        assert_eq!(json["amount"], "0.10");
        assert_eq!(json["id"], 7);
        assert!(json.get("idempotency_key").is_none());
    }
}
