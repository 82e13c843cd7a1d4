pub mod processor;
pub mod stats;

// Re-export commonly used types
pub use processor::{DealProcessor, MatchedDeal};
pub use stats::{RunCounters, RunStats};
