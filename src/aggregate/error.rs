use thiserror::Error;

/// Aggregation-level errors; all are fatal to the run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Size overflow accumulating client {client} / provider {provider}")]
    Overflow { client: String, provider: String },

    #[error("Size overflow accumulating the grand total")]
    TotalOverflow,
}
