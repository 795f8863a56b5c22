//! Benchmark suite for comparing processing strategies
//!
//! Runs the sync and async strategies over generated invocation scripts
//! using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Scripts
//!
//! Each script opens one account for each of `customers` customers, then
//! issues transfers between neighbouring customers (so the async strategy
//! sees many small customer groups) interleaved with top-ups and reads.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use transfer_ledger::api::LedgerService;
use transfer_ledger::cli::{OutputFormat, StrategyType};
use transfer_ledger::strategy::{create_strategy, BatchConfig};

fn main() {
    divan::main();
}

fn generate_script(customers: usize, transfers: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");

    for customer in 0..customers {
        writeln!(
            file,
            "OpenAccount,\"{{\"\"id\"\":\"\"A\"\",\"\"customer_id\"\":\"\"{}\"\",\"\"currency\"\":\"\"AUD\"\",\"\"balance\"\":100000}}\"",
            customer
        )
        .expect("Failed to write script");
    }

    for i in 0..transfers {
        // Pair customers 2k and 2k+1 so groups stay small.
        let from = (i * 2) % customers;
        let to = (from + 1) % customers;
        writeln!(
            file,
            "TransferMoney,\"{{\"\"from_customer\"\":\"\"{}\"\",\"\"from_account\"\":\"\"A\"\",\"\"to_customer\"\":\"\"{}\"\",\"\"to_account\"\":\"\"A\"\",\"\"amount\"\":{},\"\"fee\"\":1,\"\"currency\"\":\"\"AUD\"\"}}\"",
            from,
            to,
            1 + i % 50
        )
        .expect("Failed to write script");
        if i % 10 == 0 {
            writeln!(file, "TopupAccount,{},A,500", to).expect("Failed to write script");
            writeln!(file, "GetTransactionList,{},A", from).expect("Failed to write script");
        }
    }

    file.flush().expect("Failed to flush script");
    file
}

fn run(strategy_type: StrategyType, path: &Path) {
    let config = match strategy_type {
        StrategyType::Sync => None,
        StrategyType::Async => Some(BatchConfig::default()),
    };
    let strategy = create_strategy(strategy_type, config, LedgerService::default(), OutputFormat::Accounts);
    let mut output = Vec::new();

    strategy
        .process(path, &mut output)
        .expect("Processing failed");
}

/// Scripts of 100 and 10,000 transfers over 64 customers
#[divan::bench(args = [100, 10_000])]
fn sync_strategy(bencher: divan::Bencher, transfers: usize) {
    let script = generate_script(64, transfers);
    bencher.bench(|| run(StrategyType::Sync, script.path()));
}

/// Scripts of 100 and 10,000 transfers over 64 customers
#[divan::bench(args = [100, 10_000])]
fn async_strategy(bencher: divan::Bencher, transfers: usize) {
    let script = generate_script(64, transfers);
    bencher.bench(|| run(StrategyType::Async, script.path()));
}
