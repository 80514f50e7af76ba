mod memory;
mod repository;

use std::future::Future;

use anyhow::Result;

use crate::domain::{Expense, ExpenseFields, ExpenseId, ExpenseQuery, NewExpense};

pub use memory::*;
pub use repository::*;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Result of inserting a new expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(ExpenseId),
    /// Another present row already holds this idempotency key; nothing was written.
    DuplicateKey,
}

/// Result of a write addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    NotFound,
}

/// Durable table of expenses keyed by id, with a unique idempotency key.
///
/// Every call is one atomic unit: once it returns `Ok`, the write is committed
/// and visible to the next call, and concurrent calls never observe a
/// half-applied write. `Err` is reserved for infrastructure failures.
pub trait ExpenseStore: Send + Sync {
    /// Assign a fresh id and `created_at`, then persist.
    fn insert(&self, new: &NewExpense) -> impl Future<Output = Result<InsertOutcome>> + Send;

    /// Overwrite the mutable fields of an existing expense.
    fn update(
        &self,
        id: ExpenseId,
        fields: &ExpenseFields,
    ) -> impl Future<Output = Result<MutationOutcome>> + Send;

    fn delete(&self, id: ExpenseId) -> impl Future<Output = Result<MutationOutcome>> + Send;

    fn get(&self, id: ExpenseId) -> impl Future<Output = Result<Option<Expense>>> + Send;

    /// Snapshot of the rows selected and ordered by `query`.
    fn scan(&self, query: &ExpenseQuery) -> impl Future<Output = Result<Vec<Expense>>> + Send;
}
