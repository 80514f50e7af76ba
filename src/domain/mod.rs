mod expense;
mod money;
mod query;
mod totals;

pub use expense::*;
pub use money::*;
pub use query::*;
pub use totals::*;
