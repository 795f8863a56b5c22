//! Asynchronous batch processing strategy
//!
//! Processes a script in batches with customer-based grouping.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches, max_retries)
//!     ├── AsyncReader (batch script reading)
//!     └── BatchProcessor (customer grouping + tokio tasks)
//!         └── InvocationRunner (shared VersionedStore)
//! ```
//!
//! # Ordering
//!
//! - Batches are processed one after another, so a customer's invocations
//!   keep script order across batch boundaries
//! - Within a batch, groups sharing no customer run in parallel
//! - Results are reported in script order

use crate::api::LedgerService;
use crate::cli::OutputFormat;
use crate::host::{BatchProcessor, InvocationRunner, VersionedStore};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{write_output, ProcessingStrategy, RunStats};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of invocations per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
    /// Extra attempts for an invocation that loses a commit conflict
    pub max_retries: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
            max_retries: 3,
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero `batch_size` or `max_concurrent_batches` falls back to the default
    /// with a warning. Zero `max_retries` is valid.
    pub fn new(batch_size: usize, max_concurrent_batches: usize, max_retries: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches, default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
            max_retries,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    service: LedgerService,
    output_format: OutputFormat,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `config` - Batch sizing, worker threads and conflict retries
    /// * `service` - Ledger service shared by every worker
    /// * `output_format` - What the run writes when it finishes
    pub fn new(config: BatchConfig, service: LedgerService, output_format: OutputFormat) -> Self {
        Self {
            config,
            service,
            output_format,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Run a script in batches
    ///
    /// This method:
    /// 1. Builds a multi-threaded tokio runtime
    /// 2. Reads the script in batches using AsyncReader
    /// 3. Runs each batch through the BatchProcessor and waits for it
    /// 4. Writes the requested output
    ///
    /// Fatal errors (file not found, runtime errors, output errors) are
    /// returned immediately. Failed invocations are logged and processing
    /// continues.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let runner = InvocationRunner::new(
            Arc::new(VersionedStore::new()),
            self.service.clone(),
            self.config.max_retries,
        );
        let processor = BatchProcessor::new(runner);

        let keep_results = self.output_format == OutputFormat::Responses;
        let mut results = Vec::new();
        let mut stats = RunStats::default();

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // csv-async reads through the futures io traits
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for processed in processor.process_batch(batch).await {
                    stats.observe(&processed);
                    if keep_results {
                        results.push(processed);
                    }
                }
            }

            Ok::<(), String>(())
        })?;

        stats.log("async");
        write_output(self.output_format, processor.runner(), &results, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::core::clock::ManualClock;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn strategy(config: BatchConfig) -> AsyncProcessingStrategy {
        let service = LedgerService::with_clock(LedgerConfig::default(), Arc::new(ManualClock::new(1477573200)));
        AsyncProcessingStrategy::new(config, service, OutputFormat::Accounts)
    }

    fn open(customer_id: &str, id: &str, balance: i64) -> String {
        format!(
            "OpenAccount,\"{{\"\"id\"\":\"\"{}\"\",\"\"customer_id\"\":\"\"{}\"\",\"\"currency\"\":\"\"AUD\"\",\"\"balance\"\":{}}}\"\n",
            id, customer_id, balance
        )
    }

    fn transfer(from: (&str, &str), to: (&str, &str), amount: i64) -> String {
        format!(
            "TransferMoney,\"{{\"\"from_customer\"\":\"\"{}\"\",\"\"from_account\"\":\"\"{}\"\",\"\"to_customer\"\":\"\"{}\"\",\"\"to_account\"\":\"\"{}\"\",\"\"amount\"\":{},\"\"currency\"\":\"\"AUD\"\"}}\"\n",
            from.0, from.1, to.0, to.1, amount
        )
    }

    #[rstest]
    #[case(0, 4, 1000)]
    #[case(2, 0, 2)]
    #[case(5, 3, 5)]
    fn test_batch_config_new(#[case] batch_size: usize, #[case] workers: usize, #[case] expected_batch: usize) {
        let config = BatchConfig::new(batch_size, workers, 0);
        assert_eq!(config.batch_size, expected_batch);
        assert!(config.max_concurrent_batches > 0);
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let mut output = Vec::new();
        let result = strategy(BatchConfig::default()).process(Path::new("nonexistent.csv"), &mut output);
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[rstest]
    #[case::one_batch(1000)]
    #[case::tiny_batches(2)]
    #[case::single_invocation_batches(1)]
    fn test_async_strategy_keeps_order_across_batches(#[case] batch_size: usize) {
        let script = [
            open("1", "A", 1000),
            open("2", "B", 0),
            open("3", "C", 500),
            transfer(("1", "A"), ("2", "B"), 300),
            transfer(("2", "B"), ("3", "C"), 250),
            transfer(("3", "C"), ("1", "A"), 700),
            transfer(("1", "A"), ("2", "B"), 5000),
        ]
        .concat();
        let file = create_temp_csv(&script);

        let mut output = Vec::new();
        strategy(BatchConfig::new(batch_size, 4, 3))
            .process(file.path(), &mut output)
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "customer_id,account_id,currency,balance,closed\n\
             1,A,AUD,14.00,false\n\
             2,B,AUD,0.50,false\n\
             3,C,AUD,0.50,false\n"
        );
    }
}
