//! Error types for the converter.

use crate::amount::Amount;
use thiserror::Error;

/// Result type alias for operations that can abort a run
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that abort the whole run. No output file is left behind.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error without a known position
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a column the converter needs
    #[error("The necessary column \"{column}\" was not found in the input file")]
    ColumnsInvalid { column: String },

    /// The CSV reader could not decode a line
    #[error("Could not parse file (line number {line})")]
    MalformedRow { line: u64 },

    /// A "Total" row closed an account section that was never opened
    #[error("Line {line}: \"{row}\" closes an account section, but no account is open")]
    AccountStackUnderflow { line: u64, row: String },

    /// The input has no header row
    #[error("The input file is empty")]
    EmptyInput,

    /// The config file could not be decoded
    #[error("Invalid config: {0}")]
    Config(#[source] serde_yaml::Error),

    /// No input path was given
    #[error("No file to convert. Usage: qb2iif <input.csv>")]
    MissingInput,
}

/// Reasons a single transaction group cannot be written.
///
/// These never abort a run; the group is skipped and reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecipherError {
    /// The group's kind is neither a transfer-out nor a transfer-in type
    #[error("Transaction type \"{kind}\" is not supported")]
    UnsupportedType { kind: String },

    /// Not exactly one leg carries the main leg's sign
    #[error("There was a problem deciphering the data, possibly because the transaction amount is $0.00 ({candidates} main leg candidates)")]
    AmbiguousTransaction { candidates: usize },

    /// The only leg names several counter-accounts without listing them
    #[error("Can not resolve the split values")]
    UnresolvableSplit,

    /// The only leg names no counter-account
    #[error("There are no splits specified")]
    MissingSplit,

    /// Split amounts do not offset the main leg
    #[error("The sum of the splits ({actual}) does not equal the total of the transaction ({expected})")]
    Unbalanced { expected: Amount, actual: Amount },
}
