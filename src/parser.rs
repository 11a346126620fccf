//! Record parser for hierarchical account exports.
//!
//! The export interleaves two kinds of rows. Rows whose first column holds a
//! value open or close account sections; rows whose first column is empty are
//! line-items belonging to the innermost open section:
//!
//! ```csv
//! ,Trans #,Type,Date,Num,Name,Memo,Clr,Split,Debit,Credit,Balance
//! Bank,,,,,,,,,,,
//! ,75,Deposit,4/11/2001,,transfer,,,#3923,10000.00,,10000.00
//! Total Bank,,,,,,,,,10000.00,,10000.00
//! TOTAL,,,,,,,,,10000.00,,10000.00
//! ```
//!
//! Parsing flattens this into [`Record`]s, each annotated with the account
//! path that was open when its row was read.

use crate::amount::Amount;
use crate::config::{AmountSign, ConverterConfig};
use crate::error::{ConvertError, Result};
use crate::record::{AccountStack, Record, TransactionId};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::io::Read;

/// Internal name of the first column, whatever its header says.
pub const ACCOUNT_COLUMN: &str = "AccountName";

/// What a single row contributes to the parse.
#[derive(Debug, PartialEq, Eq)]
pub enum RowOutcome {
    /// A line-item.
    Record(Record),
    /// An account header or section total; no record.
    Skip,
    /// The grand-total row; nothing after it is read.
    End,
}

/// Where a row's signed amount comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountSource {
    Single(usize),
    DebitCredit { debit: usize, credit: usize },
}

/// Column positions resolved from the header row.
#[derive(Debug)]
pub struct HeaderLayout {
    labels: Vec<String>,
    transaction_id: usize,
    kind: usize,
    split_label: usize,
    date: usize,
    payee_name: usize,
    memo: usize,
    reference_number: Option<usize>,
    amount: AmountSource,
}

impl HeaderLayout {
    /// Validates the header row against the configured column names.
    ///
    /// The first cell is renamed to [`ACCOUNT_COLUMN`]; a required name that
    /// only appears there does not count as present.
    pub fn from_header(header: &StringRecord, config: &ConverterConfig) -> Result<Self> {
        let mut labels: Vec<String> = header.iter().map(str::to_string).collect();
        if labels.is_empty() {
            return Err(ConvertError::EmptyInput);
        }
        labels[0] = ACCOUNT_COLUMN.to_string();

        let columns = &config.columns;
        let find = |name: &str| {
            labels
                .iter()
                .enumerate()
                .skip(1)
                .rev()
                .find(|(_, label)| label.as_str() == name)
                .map(|(index, _)| index)
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| ConvertError::ColumnsInvalid {
                column: name.to_string(),
            })
        };

        for name in columns.required() {
            require(name)?;
        }
        let amount = match (find(columns.debit.as_str()), find(columns.credit.as_str())) {
            (Some(debit), Some(credit)) => AmountSource::DebitCredit { debit, credit },
            _ => AmountSource::Single(require(columns.amount.as_str())?),
        };

        Ok(HeaderLayout {
            transaction_id: require(columns.transaction_id.as_str())?,
            kind: require(columns.kind.as_str())?,
            split_label: require(columns.split_label.as_str())?,
            date: require(columns.date.as_str())?,
            payee_name: require(columns.payee_name.as_str())?,
            memo: require(columns.memo.as_str())?,
            reference_number: find(columns.reference_number.as_str()),
            amount,
            labels,
        })
    }

    /// Header labels with the first one renamed.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn typed_columns(&self) -> Vec<usize> {
        let mut typed = vec![
            self.transaction_id,
            self.kind,
            self.split_label,
            self.date,
            self.payee_name,
            self.memo,
        ];
        typed.extend(self.reference_number);
        match self.amount {
            AmountSource::Single(index) => typed.push(index),
            AmountSource::DebitCredit { debit, credit } => typed.extend([debit, credit]),
        }
        typed
    }
}

/// Reads an export and flattens it into records.
pub struct RecordParser<'c> {
    config: &'c ConverterConfig,
}

impl<'c> RecordParser<'c> {
    pub fn new(config: &'c ConverterConfig) -> Self {
        RecordParser { config }
    }

    /// Parses the whole input.
    ///
    /// Fails on an insufficient header, on a line the CSV reader cannot
    /// decode, and on a section total without an open section.
    pub fn parse<R: Read>(&self, reader: R) -> Result<Vec<Record>> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let header = csv_reader
            .headers()
            .map_err(|e| row_error(e, 1))?
            .clone();
        let layout = HeaderLayout::from_header(&header, self.config)?;
        debug!("Header columns: {:?}", layout.labels());

        let mut stack = AccountStack::new();
        let mut records = Vec::new();
        let mut last_line = 1;

        for result in csv_reader.records() {
            let row = result.map_err(|e| row_error(e, last_line + 1))?;
            let line = row.position().map_or(last_line + 1, |p| p.line());
            last_line = line;

            match self.classify_row(&layout, &mut stack, &row, line)? {
                RowOutcome::Record(record) => records.push(record),
                RowOutcome::Skip => {}
                RowOutcome::End => {
                    debug!("Line {}: grand total reached, stopping", line);
                    break;
                }
            }
        }

        debug!("Parsed {} records", records.len());
        Ok(records)
    }

    /// Classifies one row, updating the account stack for section rows.
    pub fn classify_row(
        &self,
        layout: &HeaderLayout,
        stack: &mut AccountStack,
        row: &StringRecord,
        line: u64,
    ) -> Result<RowOutcome> {
        let first = row.get(0).unwrap_or_default();
        if first.is_empty() {
            return Ok(RowOutcome::Record(self.build_record(layout, stack, row, line)));
        }

        if first == self.config.grand_total {
            return Ok(RowOutcome::End);
        }

        if first.starts_with(&self.config.total_prefix) {
            let closed = stack.pop().ok_or_else(|| ConvertError::AccountStackUnderflow {
                line,
                row: first.to_string(),
            })?;
            debug!("Line {}: closed account \"{}\"", line, closed);
        } else {
            stack.push(first);
            debug!("Line {}: opened account \"{}\"", line, first);
        }
        Ok(RowOutcome::Skip)
    }

    fn build_record(
        &self,
        layout: &HeaderLayout,
        stack: &AccountStack,
        row: &StringRecord,
        line: u64,
    ) -> Record {
        let cell = |index: usize| row.get(index).unwrap_or_default();

        if row.len() > layout.labels.len() {
            debug!(
                "Line {}: ignoring {} cells beyond the header",
                line,
                row.len() - layout.labels.len()
            );
        }

        let typed = layout.typed_columns();
        let extra: BTreeMap<String, String> = layout
            .labels
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(index, _)| !typed.contains(index))
            .map(|(index, label)| (label.clone(), cell(index).to_string()))
            .collect();

        let reference_number = layout
            .reference_number
            .map(cell)
            .filter(|num| !num.is_empty())
            .map(str::to_string);

        Record {
            account_path: stack.snapshot(),
            transaction_id: TransactionId::new(cell(layout.transaction_id)),
            kind: cell(layout.kind).to_string(),
            date: cell(layout.date).to_string(),
            payee_name: cell(layout.payee_name).to_string(),
            memo: cell(layout.memo).to_string(),
            reference_number,
            split_label: cell(layout.split_label).to_string(),
            amount: self.amount(layout.amount, &cell),
            extra,
        }
    }

    fn amount<'r>(&self, source: AmountSource, cell: &impl Fn(usize) -> &'r str) -> Amount {
        match source {
            AmountSource::Single(index) => Amount::parse_lenient(cell(index)),
            AmountSource::DebitCredit { debit, credit } => {
                let debit = Amount::parse_lenient(cell(debit));
                let credit = Amount::parse_lenient(cell(credit));
                match self.config.amount_sign {
                    AmountSign::DebitPositive if !debit.is_zero() => debit,
                    AmountSign::DebitPositive => -credit,
                    AmountSign::CreditPositive if !credit.is_zero() => credit,
                    AmountSign::CreditPositive => -debit,
                }
            }
        }
    }
}

/// Parses an export with the given settings.
pub fn parse_records<R: Read>(reader: R, config: &ConverterConfig) -> Result<Vec<Record>> {
    RecordParser::new(config).parse(reader)
}

fn row_error(err: csv::Error, fallback_line: u64) -> ConvertError {
    if err.is_io_error() {
        return ConvertError::Csv(err);
    }
    let line = err.position().map_or(fallback_line, |p| p.line());
    warn!("Could not parse line {}: {}", line, err);
    ConvertError::MalformedRow { line }
}
