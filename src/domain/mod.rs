//! Domain layer - Business logic and domain models

pub mod dates;
pub mod entry;
pub mod query;
pub mod tabular;
pub mod transcript;

pub use dates::{DateInput, QuickRange};
pub use entry::{Entry, RawEntry};
pub use query::{run_query, FilterSpec, QueryResult, SortMode};
