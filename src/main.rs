//! Transfer Ledger CLI
//!
//! Runs an invocation script against a fresh in-process ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- script.csv > accounts.csv
//! cargo run -- --strategy sync script.csv > accounts.csv
//! cargo run -- --output responses script.csv > responses.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 script.csv > accounts.csv
//! ```
//!
//! Each script row is `function,arg1,arg2,...`. The final account states (or
//! one outcome row per invocation with `--output responses`) go to stdout;
//! logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, file not readable, output failure, etc.)

use std::process;
use transfer_ledger::api::LedgerService;
use transfer_ledger::{cli, logging, strategy};

fn main() {
    let args = cli::parse_args();

    if let Err(e) = logging::init_logging(&args.log_level, args.log_format) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        let service = LedgerService::new(args.to_ledger_config());
        strategy::create_strategy(args.strategy, config, service, args.output)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
