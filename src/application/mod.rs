// Application layer: the five ledger operations on top of an expense store.
// Transports (the CLI today) decode input, call LedgerService and encode the
// outcome; they never touch the store directly.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
