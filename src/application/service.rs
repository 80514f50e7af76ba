use tracing::{debug, info, warn};

use crate::domain::{
    total, totals_by_category, Amount, CategoryTotal, Expense, ExpenseFields, ExpenseId,
    ExpenseQuery, NewExpense,
};
use crate::storage::{ExpenseStore, InsertOutcome, MutationOutcome, Repository};

use super::AppError;

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// Requests are independent: the service holds no per-request state, and each
/// operation is a single call into the store.
pub struct LedgerService<S = Repository> {
    store: S,
}

/// Result of a create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new expense was recorded under this id.
    Created(ExpenseId),
    /// The idempotency key was already used; the earlier expense is kept and
    /// nothing new was written.
    AlreadyProcessed,
}

impl LedgerService<Repository> {
    /// Initialize a database at the given path, creating it if needed.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }
}

impl<S: ExpenseStore> LedgerService<S> {
    /// Create a new ledger service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a new expense, at most once per idempotency key.
    ///
    /// Re-sending a key that is already stored is not an error: the request is
    /// answered with `AlreadyProcessed`, whatever the other fields say.
    pub async fn create(
        &self,
        fields: ExpenseFields,
        idempotency_key: Option<String>,
    ) -> Result<CreateOutcome, AppError> {
        let key = match idempotency_key {
            Some(key) if !key.is_empty() => key,
            _ => {
                warn!("create rejected: missing idempotency key");
                return Err(AppError::MissingKey);
            }
        };

        let new = NewExpense::new(fields, key);
        match self.store.insert(&new).await? {
            InsertOutcome::Inserted(id) => {
                info!(
                    id,
                    key = %new.idempotency_key,
                    category = %new.fields.category,
                    "expense added"
                );
                Ok(CreateOutcome::Created(id))
            }
            InsertOutcome::DuplicateKey => {
                info!(key = %new.idempotency_key, "create already processed");
                Ok(CreateOutcome::AlreadyProcessed)
            }
        }
    }

    /// Overwrite amount, category, description and date of an expense.
    pub async fn update(&self, id: ExpenseId, fields: ExpenseFields) -> Result<(), AppError> {
        match self.store.update(id, &fields).await? {
            MutationOutcome::Applied => {
                info!(id, "expense updated");
                Ok(())
            }
            MutationOutcome::NotFound => {
                warn!(id, "update of unknown expense");
                Err(AppError::NotFound(id))
            }
        }
    }

    /// Remove an expense.
    pub async fn delete(&self, id: ExpenseId) -> Result<(), AppError> {
        match self.store.delete(id).await? {
            MutationOutcome::Applied => {
                info!(id, "expense deleted");
                Ok(())
            }
            MutationOutcome::NotFound => {
                warn!(id, "delete of unknown expense");
                Err(AppError::NotFound(id))
            }
        }
    }

    /// Get a single expense by id.
    pub async fn get(&self, id: ExpenseId) -> Result<Expense, AppError> {
        self.store.get(id).await?.ok_or(AppError::NotFound(id))
    }

    /// List expenses, optionally filtered by category and sorted by date.
    pub async fn list(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, AppError> {
        let expenses = self.store.scan(query).await?;
        debug!(count = expenses.len(), ?query, "listed expenses");
        Ok(expenses)
    }

    /// Exact sum of every stored amount.
    pub async fn total(&self) -> Result<Amount, AppError> {
        let expenses = self.store.scan(&ExpenseQuery::all()).await?;
        let sum = total(&expenses)?;
        debug!(count = expenses.len(), %sum, "computed total");
        Ok(sum)
    }

    /// Sums per category, ordered by category name.
    pub async fn totals_by_category(&self) -> Result<Vec<CategoryTotal>, AppError> {
        let expenses = self.store.scan(&ExpenseQuery::all()).await?;
        Ok(totals_by_category(&expenses)?)
    }
}
