use crate::config::LedgerConfig;
use crate::core::id_generator::DEFAULT_ACCOUNT_ID_LENGTH;
use crate::logging::LogFormat;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Run a money-transfer invocation script against a fresh ledger
#[derive(Parser, Debug)]
#[command(name = "transfer-ledger")]
#[command(about = "Run a money-transfer invocation script against a fresh ledger", long_about = None)]
pub struct CliArgs {
    /// Invocation script, one `function,arg1,arg2,...` row per invocation
    #[arg(value_name = "INPUT", help = "Path to the invocation script")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for batched"
    )]
    pub strategy: StrategyType,

    /// Number of invocations per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of invocations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Retries after a commit conflict (async mode only)
    #[arg(
        long = "max-retries",
        value_name = "COUNT",
        help = "Retries for an invocation that loses a commit conflict (default: 3)"
    )]
    pub max_retries: Option<usize>,

    /// What to write to stdout when the run finishes
    #[arg(long = "output", value_name = "FORMAT", default_value = "accounts")]
    pub output: OutputFormat,

    /// Digits in generated account IDs
    #[arg(long = "account-id-length", value_name = "DIGITS", default_value_t = DEFAULT_ACCOUNT_ID_LENGTH)]
    pub account_id_length: usize,

    /// Log filter used when RUST_LOG is unset
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log line encoding (logs go to stderr)
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    pub log_format: LogFormat,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Run output written to stdout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Final state of every account
    #[default]
    Accounts,
    /// One row per invocation with its outcome and payload
    Responses,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; invalid values are replaced
    /// by the defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        if self.batch_size.is_none() && self.max_concurrent_batches.is_none() && self.max_retries.is_none() {
            return default;
        }
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent_batches
                .unwrap_or(default.max_concurrent_batches),
            self.max_retries.unwrap_or(default.max_retries),
        )
    }

    pub fn to_ledger_config(&self) -> LedgerConfig {
        LedgerConfig::new(self.account_id_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "input.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "input.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "input.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::default_output(&["program", "input.csv"], OutputFormat::Accounts)]
    #[case::responses(&["program", "--output", "responses", "input.csv"], OutputFormat::Responses)]
    fn test_output_parsing(#[case] args: &[&str], #[case] expected: OutputFormat) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.output, expected);
    }

    #[rstest]
    #[case::all_defaults(&["program", "input.csv"], 1000, num_cpus::get(), 3)]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "input.csv"], 2000, num_cpus::get(), 3)]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "input.csv"], 1000, 8, 3)]
    #[case::no_retries(&["program", "--max-retries", "0", "input.csv"], 1000, num_cpus::get(), 0)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.csv"], 1000, num_cpus::get(), 3)]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "input.csv"], 1000, num_cpus::get(), 3)]
    #[case::all_custom(
        &["program", "--batch-size", "2000", "--max-concurrent", "8", "--max-retries", "5", "input.csv"],
        2000,
        8,
        5
    )]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
        #[case] expected_max_retries: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
        assert_eq!(config.max_retries, expected_max_retries);
    }

    #[rstest]
    #[case::default(&["program", "input.csv"], DEFAULT_ACCOUNT_ID_LENGTH)]
    #[case::custom(&["program", "--account-id-length", "6", "input.csv"], 6)]
    #[case::zero_falls_back(&["program", "--account-id-length", "0", "input.csv"], DEFAULT_ACCOUNT_ID_LENGTH)]
    fn test_ledger_config_conversion(#[case] args: &[&str], #[case] expected: usize) {
        let config = CliArgs::try_parse_from(args).unwrap().to_ledger_config();
        assert_eq!(config.account_id_length, expected);
    }

    #[test]
    fn test_logging_options() {
        let parsed =
            CliArgs::try_parse_from(["program", "--log-level", "debug", "--log-format", "json", "input.csv"]).unwrap();
        assert_eq!(parsed.log_level, "debug");
        assert_eq!(parsed.log_format, LogFormat::Json);
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "input.csv"])]
    #[case::invalid_output(&["program", "--output", "ledger", "input.csv"])]
    #[case::negative_retries(&["program", "--max-retries", "-1", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
