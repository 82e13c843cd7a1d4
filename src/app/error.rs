use std::io;
use thiserror::Error;

use crate::domain::DomainError;
use crate::io::{ReportError, SourceError};
use crate::streaming::PipelineError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
