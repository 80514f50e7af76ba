use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::{Amount, Expense};

/// Sum of all amounts in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Amount,
    pub count: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TotalError {
    #[error("total exceeds the representable decimal range")]
    Overflow,
}

/// Exact decimal sum of every amount. An empty set sums to zero.
pub fn total(expenses: &[Expense]) -> Result<Amount, TotalError> {
    expenses.iter().try_fold(Amount::ZERO, |sum, expense| {
        sum.checked_add(expense.amount).ok_or(TotalError::Overflow)
    })
}

/// Per-category sums, ordered by category name.
pub fn totals_by_category(expenses: &[Expense]) -> Result<Vec<CategoryTotal>, TotalError> {
    let mut groups: BTreeMap<&str, (Amount, usize)> = BTreeMap::new();

    for expense in expenses {
        let (sum, count) = groups
            .entry(expense.category.as_str())
            .or_insert((Amount::ZERO, 0));
        *sum = sum.checked_add(expense.amount).ok_or(TotalError::Overflow)?;
        *count += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect())
}
