pub mod args;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod run;

// Re-export commonly used types
pub use args::Args;
pub use cli::CliApp;
pub use config::{Execution, RunConfig, RunMode};
pub use error::AppError;
pub use logging::init_tracing;
pub use run::execute;
