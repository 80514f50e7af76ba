use super::Expense;

/// Filter and ordering for listing expenses.
///
/// The filter is applied first, then the ordering. Without `sort_date_desc`
/// records keep insertion order, which is deterministic but says nothing
/// about dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseQuery {
    /// Exact, case-sensitive category match
    pub category: Option<String>,
    /// Newest `date` first; equal dates keep insertion order
    pub sort_date_desc: bool,
}

impl ExpenseQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn sorted_by_date_desc(mut self) -> Self {
        self.sort_date_desc = true;
        self
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| expense.category == category)
    }

    /// Run the query over records given in insertion order.
    pub fn apply(&self, expenses: impl IntoIterator<Item = Expense>) -> Vec<Expense> {
        let mut selected: Vec<Expense> = expenses
            .into_iter()
            .filter(|expense| self.matches(expense))
            .collect();

        if self.sort_date_desc {
            // sort_by is stable: ties stay in insertion order
            selected.sort_by(|a, b| b.date.cmp(&a.date));
        }

        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpenseFields, NewExpense};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn make_expense(id: i64, category: &str, date: &str) -> Expense {
        let new = NewExpense::new(
            ExpenseFields::new(dec!(1.00), category, "", date),
            format!("key-{id}"),
        );
        Expense::from_new(id, &new, Utc::now())
    }

    fn ids(expenses: &[Expense]) -> Vec<i64> {
        expenses.iter().map(|e| e.id).collect()
    }

    fn sample() -> Vec<Expense> {
        vec![
            make_expense(1, "Food", "2024-01-05"),
            make_expense(2, "Transport", "2024-01-06"),
            make_expense(3, "food", "2024-01-07"),
            make_expense(4, "Food", "2024-01-03"),
            make_expense(5, "Food", "2024-01-05"),
        ]
    }

    #[test]
    fn test_no_filter_keeps_insertion_order() {
        let result = ExpenseQuery::all().apply(sample());
        assert_eq!(ids(&result), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_category_filter_is_exact() {
        let result = ExpenseQuery::all().with_category("Food").apply(sample());
        assert_eq!(ids(&result), vec![1, 4, 5]);
        assert!(result.iter().all(|e| e.category == "Food"));
    }

    #[test]
    fn test_unknown_category_yields_empty() {
        let result = ExpenseQuery::all().with_category("Rent").apply(sample());
        assert!(result.is_empty());
    }

    #[test]
    fn test_sort_date_desc_is_stable() {
        let result = ExpenseQuery::all().sorted_by_date_desc().apply(sample());
        assert_eq!(ids(&result), vec![3, 2, 1, 5, 4]);
        assert!(result.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_filter_then_sort() {
        let result = ExpenseQuery::all()
            .with_category("Food")
            .sorted_by_date_desc()
            .apply(sample());
        assert_eq!(ids(&result), vec![1, 5, 4]);
    }
}
