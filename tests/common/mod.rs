// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use spendlog::application::{CreateOutcome, LedgerService};
use spendlog::domain::{Amount, ExpenseFields, ExpenseId};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Expense fields with an empty description
pub fn expense(amount: Amount, category: &str, date: &str) -> ExpenseFields {
    ExpenseFields::new(amount, category, "", date)
}

/// Create an expense and return its id, failing the test on any other outcome
pub async fn add(
    service: &LedgerService,
    amount: Amount,
    category: &str,
    date: &str,
    key: &str,
) -> Result<ExpenseId> {
    match service
        .create(expense(amount, category, date), Some(key.to_string()))
        .await?
    {
        CreateOutcome::Created(id) => Ok(id),
        CreateOutcome::AlreadyProcessed => anyhow::bail!("key {key} was already processed"),
    }
}
