//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over the invocations of a script file.
//! Delegates row conversion to the csv_format module.
//!
//! # Script Format
//!
//! A script has no header row. Each row is `function,arg1,arg2,...`; JSON
//! arguments are quoted the usual CSV way (`"{""id"":""A""}"`). Blank lines
//! and lines starting with `#` are ignored.
//!
//! ```no_run
//! use transfer_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("script.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Invoking {}", record.function),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found) are returned from `new()`
//! - Row errors are yielded as Err variants; iteration continues afterwards
//! - Every row, good or bad, consumes one sequence number

use crate::io::csv_format::{convert_fields, InvocationRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous script reader
///
/// Reads one row at a time; memory use does not grow with the script.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    row: StringRecord,
    seq: usize,
}

impl SyncReader {
    /// Open a script for streaming iteration
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the script file
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if file opened successfully
    /// * `Err(String)` if file could not be opened
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .comment(Some(b'#'))
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            row: StringRecord::new(),
            seq: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<InvocationRecord, String>;

    /// Get the next invocation from the script
    ///
    /// # Returns
    ///
    /// * `Some(Ok(InvocationRecord))` - Successfully read row
    /// * `Some(Err(String))` - Parse or conversion error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None,
            Ok(true) => {
                self.seq += 1;
                let line = self.row.position().map_or(0, |p| p.line());
                Some(
                    convert_fields(self.seq, self.row.iter())
                        .map_err(|e| format!("Line {}: {}", line, e)),
                )
            }
            Err(e) => {
                self.seq += 1;
                let line = e.position().map_or(0, |p| p.line());
                Some(Err(format!("Line {}: CSV parse error: {}", line, e)))
            }
        }
    }
}
