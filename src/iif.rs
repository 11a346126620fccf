//! IIF (Intuit Interchange Format) output.
//!
//! The file opens with a format declaration naming the transaction and split
//! columns, then holds one block per transaction:
//!
//! ```text
//! TRNS  <main leg>
//! SPL   <balancing leg>
//! SPL   <balancing leg>
//! ENDTRNS
//! ```
//!
//! Cells are tab separated and never quoted. Every row is padded with empty
//! cells to [`COLUMN_COUNT`].

use crate::decipher::Decipherment;
use crate::error::Result;
use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;

/// Cells per TRNS/SPL row, including the trailing unused ones.
pub const COLUMN_COUNT: usize = 45;

const TRANSACTION_DECLARATION: [&str; 13] = [
    "!TRNS", "TRNSID", "TRNSTYPE", "DATE", "ACCNT", "NAME", "AMOUNT", "DOCNUM", "MEMO", "CLEAR",
    "TOPRINT", "ADDR1", "ADDR2",
];

const SPLIT_DECLARATION: [&str; 11] = [
    "!SPL", "SPLID", "TRNSTYPE", "DATE", "ACCNT", "NAME", "AMOUNT", "DOCNUM", "MEMO", "CLEAR",
    "QNTY",
];

const END_DECLARATION: &str = "!ENDTRNS";

/// Terminates each transaction block.
pub const END_TRANSACTION: &str = "ENDTRNS";

const NOT_CLEARED: &str = "N";
const NOT_TO_PRINT: &str = "N";

/// Writes deciphered transactions as IIF rows.
pub struct IifWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> IifWriter<W> {
    pub fn new(writer: W) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .flexible(true)
            .from_writer(writer);
        IifWriter { writer }
    }

    /// Writes the format declaration. Must precede any transaction.
    pub fn write_declaration(&mut self) -> Result<()> {
        self.write_padded(&TRANSACTION_DECLARATION)?;
        self.write_padded(&SPLIT_DECLARATION)?;
        self.writer.write_record([END_DECLARATION])?;
        Ok(())
    }

    /// Writes one transaction block.
    ///
    /// Split rows repeat the main leg's kind, date, payee, reference number
    /// and memo; only their account and amount are their own.
    pub fn write_transaction(&mut self, transaction: &Decipherment<'_>) -> Result<()> {
        let main = transaction.main;
        let account = main.account_path.joined();
        let amount = main.amount.to_string();
        let reference_number = main.reference_number.as_deref().unwrap_or_default();

        self.write_padded(&[
            "TRNS",
            "",
            main.kind.as_str(),
            main.date.as_str(),
            account.as_str(),
            main.payee_name.as_str(),
            amount.as_str(),
            reference_number,
            main.memo.as_str(),
            NOT_CLEARED,
            NOT_TO_PRINT,
            "",
            "",
        ])?;

        for split in &transaction.splits {
            let split_account = split.account_path.joined();
            let split_amount = split.amount.to_string();
            self.write_padded(&[
                "SPL",
                "",
                main.kind.as_str(),
                main.date.as_str(),
                split_account.as_str(),
                main.payee_name.as_str(),
                split_amount.as_str(),
                reference_number,
                main.memo.as_str(),
                NOT_CLEARED,
            ])?;
        }

        self.writer.write_record([END_TRANSACTION])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()).into())
    }

    fn write_padded(&mut self, cells: &[&str]) -> Result<()> {
        let padding = COLUMN_COUNT.saturating_sub(cells.len());
        self.writer
            .write_record(cells.iter().copied().chain(std::iter::repeat("").take(padding)))?;
        Ok(())
    }
}
