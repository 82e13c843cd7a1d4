use std::future::Future;

use tokio::io::{BufWriter, Stdout};
use tracing::{debug, warn};

use super::error::AppError;

/// Exit status for a successful run
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status for any fatal error
pub const EXIT_FAILURE: i32 = 1;

/// Reusable CLI application runner that handles:
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Stdout buffering
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM)
pub struct CliApp {
    name: String,
}

impl CliApp {
    /// Create a new CLI application runner
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the application with a buffered stdout writer.
    ///
    /// The main function must flush the writer itself. A fatal error is
    /// printed once as `Error: <message>` on stderr. A signal ends the
    /// process without a report.
    ///
    /// This function never returns - it calls std::process::exit with the appropriate code
    pub async fn run<F, Fut>(self, main_fn: F) -> !
    where
        F: FnOnce(BufWriter<Stdout>) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let writer = BufWriter::new(tokio::io::stdout());
        debug!(app = %self.name, "Starting");

        let code = tokio::select! {
            result = main_fn(writer) => Self::exit_code(&result),
            signal_code = Self::wait_for_signal() => signal_code,
        };

        std::process::exit(code);
    }

    /// Map a run result to an exit status, reporting the error if any
    pub fn exit_code(result: &Result<(), AppError>) -> i32 {
        match result {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_FAILURE
            }
        }
    }

    /// Wait for any Unix signal (SIGINT, SIGTERM, SIGHUP) or Ctrl+C
    /// Returns the exit code to use (130 for SIGINT, 143 for SIGTERM, etc.)
    async fn wait_for_signal() -> i32 {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let (Ok(mut sigterm), Ok(mut sigint), Ok(mut sighup)) = (
                signal(SignalKind::terminate()),
                signal(SignalKind::interrupt()),
                signal(SignalKind::hangup()),
            ) else {
                warn!("Signal handlers unavailable");
                return std::future::pending().await;
            };

            tokio::select! {
                _ = sigterm.recv() => {
                    eprintln!("Received SIGTERM");
                    143 // 128 + 15
                }
                _ = sigint.recv() => {
                    eprintln!("Received SIGINT");
                    130 // 128 + 2
                }
                _ = sighup.recv() => {
                    eprintln!("Received SIGHUP");
                    129 // 128 + 1
                }
            }
        }

        #[cfg(not(unix))]
        {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!("Ctrl+C handler unavailable");
                return std::future::pending().await;
            }
            eprintln!("Received Ctrl+C");
            130
        }
    }
}
