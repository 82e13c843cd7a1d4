pub mod error;
pub mod report;
pub mod table;

// Re-export commonly used types
pub use error::AggregateError;
pub use report::{AggregationReport, ReportWindow};
pub use table::{ActorPair, AggregationTable, TableRow};
