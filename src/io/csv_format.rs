//! CSV format handling for invocation scripts and run output
//!
//! This module centralizes all CSV format concerns, providing:
//! - InvocationRecord, one `function,arg1,arg2,...` row of a script
//! - Conversion from raw CSV fields to invocation records
//! - Account and response output serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::host::ProcessingResult;
use crate::types::Account;
use rust_decimal::Decimal;
use std::io::Write;

/// One invocation read from a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRecord {
    /// 1-based position of the row among the script's data rows
    pub seq: usize,

    /// Operation name (e.g. "TransferMoney")
    pub function: String,

    /// Positional arguments, verbatim
    pub args: Vec<String>,
}

/// Convert the fields of one CSV row into an InvocationRecord
///
/// The first field is the function name; the remaining fields are the
/// arguments, in order.
///
/// # Arguments
///
/// * `seq` - Position of the row in the script
/// * `fields` - The row's fields, already trimmed
///
/// # Returns
///
/// Result containing either:
/// - Ok(InvocationRecord) - Successfully converted row
/// - Err(String) - The row has no function name
pub fn convert_fields<'a, I>(seq: usize, fields: I) -> Result<InvocationRecord, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fields = fields.into_iter();
    let function = match fields.next() {
        Some(function) if !function.is_empty() => function.to_string(),
        _ => return Err(format!("Row {} has no function name", seq)),
    };

    Ok(InvocationRecord {
        seq,
        function,
        args: fields.map(str::to_string).collect(),
    })
}

/// Format a balance in cents as a decimal with two places
pub fn format_cents(cents: i64) -> String {
    Decimal::new(cents, 2).to_string()
}

/// Write account states to CSV format
///
/// Writes accounts in CSV format with columns:
/// customer_id, account_id, currency, balance, closed.
/// Accounts are sorted by (customer_id, account_id) for deterministic output.
///
/// # Arguments
///
/// * `accounts` - Slice of accounts to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["customer_id", "account_id", "currency", "balance", "closed"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by(|a, b| (&a.customer_id, &a.id).cmp(&(&b.customer_id, &b.id)));

    for account in sorted_accounts {
        let balance = format_cents(account.balance_cents());
        writer
            .write_record([
                account.customer_id.as_str(),
                account.id.as_str(),
                account.currency_code.as_str(),
                balance.as_str(),
                if account.is_closed { "true" } else { "false" },
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write per-invocation outcomes to CSV format
///
/// Columns: seq, function, outcome, payload. `outcome` is `ok` or the error
/// category (`validation`, `not_found`, `business_rule`, `collaborator`);
/// `payload` is the response JSON or the error message.
pub fn write_responses_csv(results: &[ProcessingResult], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["seq", "function", "outcome", "payload"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for processed in results {
        let (outcome, payload) = match &processed.result {
            Ok(response) => (
                "ok",
                response
                    .to_payload()
                    .map_err(|e| format!("Failed to encode response: {}", e))?,
            ),
            Err(e) => (e.category().as_str(), e.to_string()),
        };
        writer
            .write_record([
                processed.record.seq.to_string().as_str(),
                processed.record.function.as_str(),
                outcome,
                payload.as_str(),
            ])
            .map_err(|e| format!("Failed to write response record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
