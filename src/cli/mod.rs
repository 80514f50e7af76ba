use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{AppError, CreateOutcome, LedgerService};
use serde_json::json;

use crate::domain::{
    format_amount, parse_amount, Amount, CategoryTotal, ExpenseFields, ExpenseId, ExpenseQuery,
};

/// Spendlog - Personal Expense Ledger
#[derive(Parser)]
#[command(name = "spendlog")]
#[command(about = "A personal expense ledger with idempotent writes and exact decimal totals")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "SPENDLOG_DB", default_value = "spendlog.db")]
    pub database: String,

    /// Log filter (e.g. "info", "spendlog=debug")
    #[arg(long, env = "SPENDLOG_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record an expense
    Add {
        #[command(flatten)]
        expense: ExpenseArgs,

        /// Idempotency key; repeating a key never records a second expense
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Replace amount, category, description and date of an expense
    Update {
        /// Expense ID
        id: ExpenseId,

        #[command(flatten)]
        expense: ExpenseArgs,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: ExpenseId,
    },

    /// Show a single expense
    Show {
        /// Expense ID
        id: ExpenseId,
    },

    /// List expenses
    List {
        /// Only expenses with exactly this category
        #[arg(short, long)]
        category: Option<String>,

        /// Newest date first (default: insertion order)
        #[arg(long)]
        sort_date_desc: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Sum of all expenses
    Total {
        /// Break the total down per category
        #[arg(long)]
        by_category: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(clap::Args)]
pub struct ExpenseArgs {
    /// Amount (e.g., "12.50")
    #[arg(short, long)]
    pub amount: String,

    /// Category label (case-sensitive)
    #[arg(short, long)]
    pub category: String,

    /// Free-form description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Date of the expense (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl ExpenseArgs {
    /// Validate raw input before it reaches the ledger.
    pub fn into_fields(self) -> Result<ExpenseFields> {
        let amount = parse_amount(&self.amount)
            .with_context(|| format!("Invalid amount '{}'. Use '12.50' or '12'", self.amount))?;

        if self.category.trim().is_empty() {
            bail!("Category must not be empty");
        }

        validate_date(&self.date)
            .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", self.date))?;

        Ok(ExpenseFields::new(
            amount,
            self.category,
            self.description,
            self.date,
        ))
    }
}

impl Cli {
    /// Filter directive for the tracing subscriber.
    pub fn log_filter(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            self.log_level.as_str()
        }
    }

    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add { expense, key } => {
                let fields = expense.into_fields()?;
                let service = LedgerService::connect(&self.database).await?;

                match service.create(fields, key).await? {
                    CreateOutcome::Created(id) => println!("Expense added ({id})"),
                    CreateOutcome::AlreadyProcessed => println!("Already processed"),
                }
            }

            Commands::Update { id, expense } => {
                let fields = expense.into_fields()?;
                let service = LedgerService::connect(&self.database).await?;
                service.update(id, fields).await.map_err(not_found_message)?;
                println!("Expense updated successfully");
            }

            Commands::Delete { id } => {
                let service = LedgerService::connect(&self.database).await?;
                service.delete(id).await.map_err(not_found_message)?;
                println!("Expense deleted successfully");
            }

            Commands::Show { id } => {
                let service = LedgerService::connect(&self.database).await?;
                let expense = service.get(id).await.map_err(not_found_message)?;

                println!("ID:          {}", expense.id);
                println!("Amount:      {}", format_amount(expense.amount));
                println!("Category:    {}", expense.category);
                println!("Description: {}", expense.description);
                println!("Date:        {}", expense.date);
                println!("Recorded:    {}", expense.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
            }

            Commands::List {
                category,
                sort_date_desc,
                format,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let query = list_query(category, sort_date_desc);
                run_list_command(&service, &query, format).await?;
            }

            Commands::Total {
                by_category,
                format,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_total_command(&service, by_category, format).await?;
            }
        }

        Ok(())
    }
}

async fn run_list_command(
    service: &LedgerService,
    query: &ExpenseQuery,
    format: OutputFormat,
) -> Result<()> {
    let expenses = service.list(query).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&expenses)?);
        }
        OutputFormat::Table => {
            if expenses.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }

            println!(
                "{:>6} {:<12} {:>12} {:<15} DESCRIPTION",
                "ID", "DATE", "AMOUNT", "CATEGORY"
            );
            println!("{}", "-".repeat(70));
            for expense in &expenses {
                println!(
                    "{:>6} {:<12} {:>12} {:<15} {}",
                    expense.id,
                    expense.date,
                    format_amount(expense.amount),
                    truncate(&expense.category, 15),
                    truncate(&expense.description, 30)
                );
            }
        }
    }
    Ok(())
}

/// An empty category means "no filter", not "category equal to nothing".
fn list_query(category: Option<String>, sort_date_desc: bool) -> ExpenseQuery {
    ExpenseQuery {
        category: category.filter(|c| !c.is_empty()),
        sort_date_desc,
    }
}

/// JSON body for `total`: `{"total": "19.75"}`, plus per-category rows when requested.
fn total_json(total: Amount, categories: Option<&[CategoryTotal]>) -> serde_json::Value {
    let mut body = json!({ "total": total });
    if let Some(categories) = categories {
        body["categories"] = json!(categories);
    }
    body
}

async fn run_total_command(
    service: &LedgerService,
    by_category: bool,
    format: OutputFormat,
) -> Result<()> {
    let categories = if by_category {
        Some(service.totals_by_category().await?)
    } else {
        None
    };
    let total = service.total().await?;

    if format == OutputFormat::Json {
        let body = total_json(total, categories.as_deref());
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if let Some(totals) = categories {
        println!("{:<20} {:>6} {:>14}", "CATEGORY", "COUNT", "TOTAL");
        println!("{}", "-".repeat(42));
        for entry in &totals {
            println!(
                "{:<20} {:>6} {:>14}",
                truncate(&entry.category, 20),
                entry.count,
                format_amount(entry.total)
            );
        }
        println!("{}", "-".repeat(42));
    }

    println!("Total: {}", format_amount(total));
    Ok(())
}

fn not_found_message(err: AppError) -> anyhow::Error {
    match err {
        AppError::NotFound(id) => anyhow::anyhow!("Expense not found (id {id})"),
        other => other.into(),
    }
}

/// Dates must be a real calendar day written exactly as `YYYY-MM-DD`, so that
/// text order matches chronological order.
fn validate_date(date_str: &str) -> Result<()> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .context("Date must be in YYYY-MM-DD format")?;
    if date.format("%Y-%m-%d").to_string() != date_str {
        bail!("Date must be zero-padded YYYY-MM-DD");
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
