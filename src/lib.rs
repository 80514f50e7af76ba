pub mod application;
pub mod cli;
pub mod domain;
pub mod storage;

pub use application::{AppError, CreateOutcome, LedgerService};
pub use domain::*;
pub use storage::{ExpenseStore, MemoryStore, Repository};
