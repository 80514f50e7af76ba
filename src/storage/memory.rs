use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::Utc;

use crate::domain::{Expense, ExpenseFields, ExpenseId, ExpenseQuery, NewExpense};

use super::{ExpenseStore, InsertOutcome, MutationOutcome};

/// In-process expense store. Rows are kept in insertion order behind a single
/// lock, so every operation is serialized. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryTable>,
}

#[derive(Default)]
struct MemoryTable {
    rows: Vec<Expense>,
    last_id: ExpenseId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryTable>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("expense store lock poisoned"))
    }
}

impl ExpenseStore for MemoryStore {
    async fn insert(&self, new: &NewExpense) -> Result<InsertOutcome> {
        let mut table = self.lock()?;
        if table
            .rows
            .iter()
            .any(|row| row.idempotency_key == new.idempotency_key)
        {
            return Ok(InsertOutcome::DuplicateKey);
        }

        table.last_id += 1;
        let id = table.last_id;
        table.rows.push(Expense::from_new(id, new, Utc::now()));
        Ok(InsertOutcome::Inserted(id))
    }

    async fn update(&self, id: ExpenseId, fields: &ExpenseFields) -> Result<MutationOutcome> {
        let mut table = self.lock()?;
        Ok(match table.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.apply(fields);
                MutationOutcome::Applied
            }
            None => MutationOutcome::NotFound,
        })
    }

    async fn delete(&self, id: ExpenseId) -> Result<MutationOutcome> {
        let mut table = self.lock()?;
        Ok(match table.rows.iter().position(|row| row.id == id) {
            Some(index) => {
                table.rows.remove(index);
                MutationOutcome::Applied
            }
            None => MutationOutcome::NotFound,
        })
    }

    async fn get(&self, id: ExpenseId) -> Result<Option<Expense>> {
        let table = self.lock()?;
        Ok(table.rows.iter().find(|row| row.id == id).cloned())
    }

    async fn scan(&self, query: &ExpenseQuery) -> Result<Vec<Expense>> {
        let table = self.lock()?;
        Ok(query.apply(table.rows.iter().cloned()))
    }
}
