//! Processing strategy module for invocation scripts
//!
//! This module defines the Strategy pattern for complete script runs,
//! encompassing both script parsing and ledger execution. This allows
//! different implementations (synchronous, asynchronous batch) to be selected
//! at runtime. Both produce the same output for the same script.

use crate::api::LedgerService;
use crate::cli::{OutputFormat, StrategyType};
use crate::host::{InvocationRunner, ProcessingResult};
use crate::io::{write_accounts_csv, write_responses_csv};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete script runs
///
/// Each strategy reads invocations from a script, executes them against a
/// fresh ledger and writes the requested output.
pub trait ProcessingStrategy: Send + Sync {
    /// Run a script and write results to output
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the invocation script
    /// * `output` - Writer for the run output
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the run completed (individual invocations may have failed)
    /// * `Err(String)` if a fatal error occurred
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The script cannot be opened
    /// - The final ledger state cannot be read
    /// - Output cannot be written
    ///
    /// A failing invocation is logged and reported in the responses output;
    /// it never aborts the run.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
/// * `service` - Ledger service every invocation is dispatched to
/// * `output_format` - What the run writes when it finishes
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    service: LedgerService,
    output_format: OutputFormat,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(service, output_format)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, service, output_format))
        }
    }
}

/// Outcome counts for one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunStats {
    pub fn observe(&mut self, processed: &ProcessingResult) {
        if processed.result.is_ok() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn log(&self, strategy: &str) {
        info!(
            strategy,
            succeeded = self.succeeded,
            failed = self.failed,
            "Script run complete"
        );
    }
}

/// Write the run output in the requested format
///
/// `results` is only consulted for [`OutputFormat::Responses`].
pub(crate) fn write_output(
    output_format: OutputFormat,
    runner: &InvocationRunner,
    results: &[ProcessingResult],
    output: &mut dyn Write,
) -> Result<(), String> {
    match output_format {
        OutputFormat::Accounts => {
            let accounts = runner
                .accounts()
                .map_err(|e| format!("Failed to read final accounts: {}", e))?;
            write_accounts_csv(&accounts, output)
        }
        OutputFormat::Responses => write_responses_csv(results, output),
    }
}
