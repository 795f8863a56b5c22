//! Asynchronous CSV reader with batch interface
//!
//! Reads invocation scripts in batches for the async strategy. The script
//! format is the same as for [`SyncReader`](super::SyncReader).
//!
//! # Architecture
//!
//! ```text
//! Script → AsyncReader → Batches of InvocationRecords
//!              ↓
//!       csv_format module
//!       (convert_fields)
//! ```

use crate::io::csv_format::{convert_fields, InvocationRecord};
use csv_async::{AsyncReaderBuilder, StringRecord};
use futures::io::AsyncRead;
use tracing::warn;

/// Asynchronous script reader
///
/// Rows that fail to parse are logged and skipped; they still consume a
/// sequence number so `seq` matches the synchronous reader.
pub struct AsyncReader<R: AsyncRead + Unpin + Send> {
    csv_reader: csv_async::AsyncReader<R>,
    row: StringRecord,
    seq: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing the script
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv_async::Trim::All)
            .comment(Some(b'#'))
            .buffer_capacity(8 * 1024)
            .create_reader(reader);

        Self {
            csv_reader,
            row: StringRecord::new(),
            seq: 0,
        }
    }

    /// Read a batch of invocations
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Maximum number of invocations to return
    ///
    /// # Returns
    ///
    /// Up to `batch_size` invocations; an empty vector at end of file.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<InvocationRecord> {
        let mut batch = Vec::with_capacity(batch_size);

        while batch.len() < batch_size {
            match self.csv_reader.read_record(&mut self.row).await {
                Ok(false) => break,
                Ok(true) => {
                    self.seq += 1;
                    match convert_fields(self.seq, self.row.iter()) {
                        Ok(record) => batch.push(record),
                        Err(e) => {
                            let line = self.row.position().map_or(0, |p| p.line());
                            warn!(line, error = %e, "Skipping script row");
                        }
                    }
                }
                Err(e) => {
                    self.seq += 1;
                    warn!(seq = self.seq, error = %e, "CSV parse error");
                }
            }
        }

        batch
    }
}
