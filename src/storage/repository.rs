use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{
    amount_from_storage, Expense, ExpenseFields, ExpenseId, ExpenseQuery, NewExpense,
};

use super::{ExpenseStore, InsertOutcome, MutationOutcome, MIGRATION_001_INITIAL};

const EXPENSE_COLUMNS: &str =
    "id, amount, category, description, date, created_at, idempotency_key";

/// SQLite-backed expense store.
///
/// Each operation is a single autocommit statement. Writers additionally take
/// `write_lock`, so at most one write statement per process is in flight and
/// pooled connections never contend for SQLite's write lock. The `UNIQUE`
/// constraint on `idempotency_key` settles racing inserts.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to repeat.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<Expense> {
        let amount_str: String = row.get("amount");
        let created_at_str: String = row.get("created_at");

        Ok(Expense {
            id: row.get("id"),
            amount: amount_from_storage(&amount_str)
                .with_context(|| format!("Invalid stored amount: {amount_str}"))?,
            category: row.get("category"),
            description: row.get("description"),
            date: row.get("date"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
            idempotency_key: row.get("idempotency_key"),
        })
    }
}

impl ExpenseStore for Repository {
    async fn insert(&self, new: &NewExpense) -> Result<InsertOutcome> {
        let _writer = self.write_lock.lock().await;
        let result = sqlx::query(
            r#"
            INSERT INTO expenses (amount, category, description, date, created_at, idempotency_key)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(new.fields.amount.to_string())
        .bind(&new.fields.category)
        .bind(&new.fields.description)
        .bind(&new.fields.date)
        .bind(Utc::now().to_rfc3339())
        .bind(&new.idempotency_key)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(InsertOutcome::Inserted(row.get("id"))),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                debug!(key = %new.idempotency_key, "idempotency key already stored");
                Ok(InsertOutcome::DuplicateKey)
            }
            Err(err) => Err(err).context("Failed to save expense"),
        }
    }

    async fn update(&self, id: ExpenseId, fields: &ExpenseFields) -> Result<MutationOutcome> {
        let _writer = self.write_lock.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET amount = ?, category = ?, description = ?, date = ?
            WHERE id = ?
            "#,
        )
        .bind(fields.amount.to_string())
        .bind(&fields.category)
        .bind(&fields.description)
        .bind(&fields.date)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update expense")?;

        Ok(if result.rows_affected() == 0 {
            MutationOutcome::NotFound
        } else {
            MutationOutcome::Applied
        })
    }

    async fn delete(&self, id: ExpenseId) -> Result<MutationOutcome> {
        let _writer = self.write_lock.lock().await;
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete expense")?;

        Ok(if result.rows_affected() == 0 {
            MutationOutcome::NotFound
        } else {
            MutationOutcome::Applied
        })
    }

    async fn get(&self, id: ExpenseId) -> Result<Option<Expense>> {
        let query = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch expense")?;

        row.as_ref().map(Self::row_to_expense).transpose()
    }

    async fn scan(&self, query: &ExpenseQuery) -> Result<Vec<Expense>> {
        let mut sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses");

        if query.category.is_some() {
            sql.push_str(" WHERE category = ?");
        }

        // AUTOINCREMENT ids grow monotonically, so id order is insertion order.
        if query.sort_date_desc {
            sql.push_str(" ORDER BY date DESC, id ASC");
        } else {
            sql.push_str(" ORDER BY id ASC");
        }

        let mut sql_query = sqlx::query(&sql);
        if let Some(category) = query.category.as_deref() {
            sql_query = sql_query.bind(category);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }
}
