//! Synchronous processing strategy
//!
//! Runs a script one invocation at a time on the calling thread, delegating:
//! - Script parsing to `SyncReader` (iterator interface)
//! - Execution and commit to `InvocationRunner`
//! - Output to the csv_format writers
//!
//! Each invocation commits before the next starts, so there are never commit
//! conflicts and the runner is built without retries.

use crate::api::LedgerService;
use crate::cli::OutputFormat;
use crate::host::{InvocationRunner, PendingInvocation, VersionedStore};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{write_output, ProcessingStrategy, RunStats};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use transfer_ledger::api::LedgerService;
/// use transfer_ledger::cli::OutputFormat;
/// use transfer_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(LedgerService::default(), OutputFormat::Accounts);
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("script.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Clone)]
pub struct SyncProcessingStrategy {
    service: LedgerService,
    output_format: OutputFormat,
}

impl SyncProcessingStrategy {
    pub fn new(service: LedgerService, output_format: OutputFormat) -> Self {
        Self {
            service,
            output_format,
        }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Run a script sequentially
    ///
    /// Fatal errors (file not found, output errors) are returned immediately.
    /// Unreadable rows and failed invocations are logged and processing
    /// continues. Results are only retained when the responses output is
    /// requested.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runner = InvocationRunner::new(Arc::new(VersionedStore::new()), self.service.clone(), 0);
        let reader = SyncReader::new(input_path)?;

        let keep_results = self.output_format == OutputFormat::Responses;
        let mut results = Vec::new();
        let mut stats = RunStats::default();

        for row in reader {
            match row {
                Ok(record) => {
                    let processed = PendingInvocation::parse(record).execute(&runner);
                    stats.observe(&processed);
                    if keep_results {
                        results.push(processed);
                    }
                }
                Err(e) => warn!(error = %e, "Skipping script row"),
            }
        }

        stats.log("sync");
        write_output(self.output_format, &runner, &results, output)
    }
}
