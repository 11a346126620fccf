//! # qb2iif
//!
//! Converts a hierarchical QuickBooks account export (CSV) into an IIF file
//! that a double-entry ledger can import.
//!
//! ## Pipeline
//!
//! - **Parse**: account header and "Total" rows drive an account stack; every
//!   line-item becomes a [`Record`] tagged with the enclosing account path
//! - **Group**: records sharing a transaction id form one transaction
//! - **Decipher**: each group resolves into a main leg and its balancing
//!   splits, which must offset the main leg exactly
//! - **Emit**: resolved transactions are written as TRNS/SPL/ENDTRNS blocks;
//!   groups that cannot be resolved are reported and skipped
//!
//! ## Example
//!
//! ```no_run
//! use qb2iif::{convert_file, ConverterConfig};
//! use std::path::Path;
//!
//! let mut messages: Vec<String> = Vec::new();
//! let input = Path::new("ledger.csv");
//! convert_file(input, &qb2iif::paths::iif_path(input), &ConverterConfig::default(), &mut messages)
//!     .unwrap();
//! ```

pub mod amount;
pub mod config;
pub mod decipher;
pub mod emitter;
pub mod error;
pub mod iif;
pub mod log_sink;
pub mod parser;
pub mod paths;
pub mod record;

pub use amount::Amount;
pub use config::{AmountSign, ColumnNames, ConverterConfig, Direction};
pub use decipher::{decipher, Decipherment};
pub use emitter::{group_by_transaction, EmitReport, LedgerEmitter};
pub use error::{ConvertError, DecipherError, Result};
pub use log_sink::{Console, FanOut, LogFile, LogSink};
pub use parser::{parse_records, RecordParser};
pub use record::{AccountPath, AccountStack, Record, TransactionId};

use log::info;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Converts the export at `input` into an IIF file at `output`.
///
/// Nothing is written when the input cannot be parsed. Transactions that
/// cannot be deciphered are reported to `sink` and left out; the run still
/// succeeds and ends with a `File created` message.
pub fn convert_file(
    input: &Path,
    output: &Path,
    config: &ConverterConfig,
    sink: &mut dyn LogSink,
) -> Result<EmitReport> {
    let records = {
        let file = File::open(input)?;
        parse_records(BufReader::new(file), config)?
    };
    info!("Read {} records from {}", records.len(), input.display());

    let report = match write_output(&records, output, config, sink) {
        Ok(report) => report,
        Err(e) => {
            // Best effort: the write error is the one worth reporting.
            let _ = fs::remove_file(output);
            return Err(e);
        }
    };

    sink.write(&format!("File created: {}", output.display()));
    Ok(report)
}

fn write_output(
    records: &[Record],
    output: &Path,
    config: &ConverterConfig,
    sink: &mut dyn LogSink,
) -> Result<EmitReport> {
    let file = File::create(output)?;
    let mut writer = std::io::BufWriter::new(file);
    let report = LedgerEmitter::new(config).emit(records, &mut writer, sink)?;
    writer.into_inner().map_err(|e| e.into_error())?;
    Ok(report)
}
