use thiserror::Error;

/// Domain-level errors for invalid filter inputs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid timestamp '{0}': expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp(String),

    #[error("Invalid UTC offset: {0} hours")]
    InvalidUtcOffset(i32),

    #[error("Epoch window is inverted: start {start} > end {end}")]
    InvertedWindow { start: i64, end: i64 },
}
