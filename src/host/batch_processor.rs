//! Batch processing with customer-based grouping for concurrent execution
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! invocations concurrently while keeping every customer's invocations in
//! input order.
//!
//! # Design
//!
//! A transfer touches two customers, so partitioning by a single key is not
//! enough. The batch is grouped with a union-find over customer IDs: two
//! invocations land in the same group when they share a customer, directly or
//! through a chain of other invocations. Groups therefore touch disjoint key
//! ranges and can run in parallel; each group runs sequentially.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── InvocationRunner  (shared VersionedStore + LedgerService)
//! ```
//!
//! The runner's commit-conflict retries remain as a safety net; with disjoint
//! groups they do not fire.

use crate::api::{Request, Response};
use crate::host::InvocationRunner;
use crate::io::InvocationRecord;
use crate::types::LedgerError;
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use tracing::{error, warn};

/// Result of processing a single invocation
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The invocation that was processed
    pub record: InvocationRecord,

    /// The operation's response or error
    pub result: Result<Response, LedgerError>,
}

/// An invocation whose request has been parsed (or failed to parse)
#[derive(Debug, Clone)]
pub struct PendingInvocation {
    pub record: InvocationRecord,
    pub request: Result<Request, LedgerError>,
}

impl PendingInvocation {
    pub fn parse(record: InvocationRecord) -> Self {
        let request = Request::parse(&record.function, &record.args);
        PendingInvocation { record, request }
    }

    /// Run the invocation, logging a failure
    pub fn execute(self, runner: &InvocationRunner) -> ProcessingResult {
        let result = self.request.and_then(|request| runner.run(&request));
        if let Err(e) = &result {
            warn!(
                seq = self.record.seq,
                function = %self.record.function,
                category = e.category().as_str(),
                error = %e,
                "Invocation failed"
            );
        }
        ProcessingResult {
            record: self.record,
            result,
        }
    }
}

/// Disjoint-set forest over invocation indices
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        DisjointSet {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Keep the smaller index as root so groups order by first member.
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[child] = root;
        }
    }
}

/// Batch processor with customer-based grouping
#[derive(Clone)]
pub struct BatchProcessor {
    runner: InvocationRunner,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `runner` - Runner shared by every group; cloning it shares the store
    pub fn new(runner: InvocationRunner) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &InvocationRunner {
        &self.runner
    }

    /// Partition a batch into customer-connected groups
    ///
    /// # Guarantees
    ///
    /// - Each invocation appears in exactly one group
    /// - Invocations within a group keep their original order
    /// - No two groups share a customer
    /// - Groups are ordered by their first invocation
    /// - Invocations naming no customer form groups of their own
    pub fn partition_by_customer(&self, batch: Vec<PendingInvocation>) -> Vec<Vec<PendingInvocation>> {
        let mut sets = DisjointSet::new(batch.len());
        let mut first_seen: HashMap<String, usize> = HashMap::new();

        for (index, pending) in batch.iter().enumerate() {
            let customers = match &pending.request {
                Ok(request) => request.customer_ids(),
                Err(_) => Vec::new(),
            };
            for customer in customers {
                match first_seen.get(&customer) {
                    Some(&other) => sets.union(index, other),
                    None => {
                        first_seen.insert(customer, index);
                    }
                }
            }
        }

        let mut groups: BTreeMap<usize, Vec<PendingInvocation>> = BTreeMap::new();
        for (index, pending) in batch.into_iter().enumerate() {
            let root = sets.find(index);
            groups.entry(root).or_default().push(pending);
        }
        groups.into_values().collect()
    }

    /// Run one group's invocations sequentially
    pub fn process_group(&self, group: Vec<PendingInvocation>) -> Vec<ProcessingResult> {
        group
            .into_iter()
            .map(|pending| pending.execute(&self.runner))
            .collect()
    }

    /// Process a batch with customer-based grouping
    ///
    /// This method:
    /// 1. Parses every invocation
    /// 2. Groups invocations that share customers
    /// 3. Spawns a tokio task per group
    /// 4. Waits for all groups and returns results in input order
    pub async fn process_batch(&self, batch: Vec<InvocationRecord>) -> Vec<ProcessingResult> {
        let pending = batch.into_iter().map(PendingInvocation::parse).collect();
        let groups = self.partition_by_customer(pending);

        let tasks = groups.into_iter().map(|group| {
            let processor = self.clone();
            tokio::spawn(async move { processor.process_group(group) })
        });

        let mut results = Vec::new();
        for task in join_all(tasks).await {
            match task {
                Ok(group_results) => results.extend(group_results),
                Err(e) => error!(error = %e, "Group task panicked"),
            }
        }

        results.sort_by_key(|r| r.record.seq);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LedgerService;
    use crate::host::VersionedStore;
    use std::sync::Arc;

    fn processor() -> BatchProcessor {
        let runner = InvocationRunner::new(Arc::new(VersionedStore::new()), LedgerService::default(), 3);
        BatchProcessor::new(runner)
    }

    fn record(seq: usize, function: &str, args: &[&str]) -> InvocationRecord {
        InvocationRecord {
            seq,
            function: function.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn transfer(seq: usize, from: &str, to: &str) -> PendingInvocation {
        let raw = format!(
            r#"{{"from_customer":"{}","from_account":"a","to_customer":"{}","to_account":"b","amount":1,"currency":"AUD"}}"#,
            from, to
        );
        PendingInvocation::parse(record(seq, "TransferMoney", &[&raw]))
    }

    fn list(seq: usize, customer: &str) -> PendingInvocation {
        PendingInvocation::parse(record(seq, "GetAccountList", &[customer]))
    }

    fn seqs(groups: &[Vec<PendingInvocation>]) -> Vec<Vec<usize>> {
        groups
            .iter()
            .map(|g| g.iter().map(|p| p.record.seq).collect())
            .collect()
    }

    #[test]
    fn test_partition_empty_batch() {
        assert!(processor().partition_by_customer(Vec::new()).is_empty());
    }

    #[test]
    fn test_partition_single_customer_keeps_order() {
        let batch = vec![list(1, "1"), list(2, "1"), list(3, "1")];
        let groups = processor().partition_by_customer(batch);
        assert_eq!(seqs(&groups), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_partition_disjoint_customers() {
        let batch = vec![list(1, "1"), list(2, "2"), list(3, "1"), list(4, "3")];
        let groups = processor().partition_by_customer(batch);
        assert_eq!(seqs(&groups), vec![vec![1, 3], vec![2], vec![4]]);
    }

    #[test]
    fn test_partition_transfers_connect_customers() {
        let batch = vec![
            list(1, "1"),
            list(2, "2"),
            list(3, "3"),
            transfer(4, "1", "2"),
            list(5, "4"),
            transfer(6, "2", "3"),
        ];
        let groups = processor().partition_by_customer(batch);
        assert_eq!(seqs(&groups), vec![vec![1, 2, 3, 4, 6], vec![5]]);
    }

    #[test]
    fn test_partition_unparsable_invocations_stand_alone() {
        let batch = vec![
            list(1, "1"),
            PendingInvocation::parse(record(2, "Bogus", &[])),
            list(3, "1"),
        ];
        let groups = processor().partition_by_customer(batch);
        assert_eq!(seqs(&groups), vec![vec![1, 3], vec![2]]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_process_batch_returns_input_order() {
        let processor = processor();
        let batch = vec![
            record(1, "OpenAccount", &[r#"{"id":"a","customer_id":"1","balance":100}"#]),
            record(2, "OpenAccount", &[r#"{"id":"b","customer_id":"2"}"#]),
            record(3, "Bogus", &[]),
            record(4, "GetAccount", &["1", "a"]),
        ];

        let results = processor.process_batch(batch).await;

        let order: Vec<usize> = results.iter().map(|r| r.record.seq).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
        assert!(results[0].result.is_ok());
        assert!(results[2].result.is_err());
        match &results[3].result {
            Ok(Response::Account(account)) => assert_eq!(account.balance_cents(), 100),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
