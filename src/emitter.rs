//! Ledger emitter.
//!
//! Groups records into transactions, deciphers each group and writes the
//! ones that resolve. A group that fails is skipped and reported; the run
//! carries on with the next one.

use crate::config::ConverterConfig;
use crate::decipher::decipher;
use crate::error::{DecipherError, Result};
use crate::iif::IifWriter;
use crate::log_sink::LogSink;
use crate::record::{Record, TransactionId};
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::io::Write;

/// Records grouped by transaction id, in id order.
///
/// Within a group, records keep their input order.
pub fn group_by_transaction(records: &[Record]) -> BTreeMap<&TransactionId, Vec<&Record>> {
    let mut groups: BTreeMap<&TransactionId, Vec<&Record>> = BTreeMap::new();
    for record in records {
        groups.entry(&record.transaction_id).or_default().push(record);
    }
    groups
}

/// Outcome of one emission pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmitReport {
    /// Transactions written to the output, in output order.
    pub written: Vec<TransactionId>,

    /// Transaction kinds that could not be translated.
    pub unsupported_kinds: BTreeSet<String>,

    /// Transactions skipped because of their kind.
    pub unsupported: Vec<TransactionId>,

    /// Transactions skipped because no single main leg was found.
    pub voided: Vec<TransactionId>,

    /// Every other skipped transaction, with its reason.
    pub failed: Vec<(TransactionId, DecipherError)>,
}

impl EmitReport {
    /// Number of transaction groups that were not written.
    pub fn skipped(&self) -> usize {
        self.unsupported.len() + self.voided.len() + self.failed.len()
    }

    /// End-of-run summaries for the aggregated failure kinds.
    pub fn summary(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if !self.unsupported_kinds.is_empty() {
            messages.push(format!(
                "This program is not yet able to translate any of these types {}. \
                 These transactions were not added {}",
                bracketed(&self.unsupported_kinds),
                bracketed(&self.unsupported),
            ));
        }
        if !self.voided.is_empty() {
            messages.push(format!(
                "Some transactions could not be written. This could be caused by a \
                 transaction amount of $0.00 (i.e. a voided check). \
                 These transactions were not added {}",
                bracketed(&self.voided),
            ));
        }
        messages
    }
}

/// Writes deciphered transaction groups as IIF.
pub struct LedgerEmitter<'c> {
    config: &'c ConverterConfig,
}

impl<'c> LedgerEmitter<'c> {
    pub fn new(config: &'c ConverterConfig) -> Self {
        LedgerEmitter { config }
    }

    /// Writes every group that deciphers, in transaction id order.
    ///
    /// Per-group failures go to `sink` as they happen, summaries once the
    /// pass is done. Only I/O failures abort the pass.
    pub fn emit<W: Write>(
        &self,
        records: &[Record],
        writer: W,
        sink: &mut dyn LogSink,
    ) -> Result<EmitReport> {
        let mut iif = IifWriter::new(writer);
        let mut report = EmitReport::default();

        iif.write_declaration()?;

        for (id, group) in group_by_transaction(records) {
            match decipher(&group, self.config) {
                Ok(transaction) => {
                    iif.write_transaction(&transaction)?;
                    debug!(
                        "Transaction {}: written with {} splits",
                        id,
                        transaction.splits.len()
                    );
                    report.written.push(id.clone());
                }
                Err(DecipherError::UnsupportedType { kind }) => {
                    debug!("Transaction {}: unsupported type \"{}\"", id, kind);
                    report.unsupported_kinds.insert(kind);
                    report.unsupported.push(id.clone());
                }
                Err(DecipherError::AmbiguousTransaction { candidates }) => {
                    debug!("Transaction {}: {} main leg candidates", id, candidates);
                    report.voided.push(id.clone());
                }
                Err(e) => {
                    warn!("Transaction {}: {}", id, e);
                    sink.write(&format!("{} - {}", id, e));
                    report.failed.push((id.clone(), e));
                }
            }
        }

        iif.flush()?;

        for message in report.summary() {
            warn!("{}", message);
            sink.write(&message);
        }
        info!(
            "Wrote {} transactions, skipped {}",
            report.written.len(),
            report.skipped()
        );
        Ok(report)
    }
}

fn bracketed<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    let items: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    format!("[{}]", items.join(", "))
}
