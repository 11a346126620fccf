//! Converter settings: column labels, transaction kinds and sentinel values.
//!
//! Defaults describe a QuickBooks "Transaction Detail by Account" export.
//! A YAML file may override any subset of them.

use crate::error::{ConvertError, Result};
use serde::Deserialize;
use std::path::Path;

/// Header labels for the fields the converter reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub transaction_id: String,
    pub kind: String,
    pub split_label: String,
    pub date: String,
    pub payee_name: String,
    pub memo: String,
    pub reference_number: String,
    pub amount: String,
    pub debit: String,
    pub credit: String,
}

impl ColumnNames {
    /// Columns every export must carry, in the order they are checked.
    pub fn required(&self) -> [&str; 6] {
        [
            self.transaction_id.as_str(),
            self.kind.as_str(),
            self.split_label.as_str(),
            self.date.as_str(),
            self.payee_name.as_str(),
            self.memo.as_str(),
        ]
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            transaction_id: "Trans #".to_string(),
            kind: "Type".to_string(),
            split_label: "Split".to_string(),
            date: "Date".to_string(),
            payee_name: "Name".to_string(),
            memo: "Memo".to_string(),
            reference_number: "Num".to_string(),
            amount: "Amount".to_string(),
            debit: "Debit".to_string(),
            credit: "Credit".to_string(),
        }
    }
}

/// How a debit/credit column pair collapses into one signed amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmountSign {
    /// `debit` if non-zero, otherwise `-credit`.
    #[default]
    DebitPositive,
    /// `credit` if non-zero, otherwise `-debit`.
    CreditPositive,
}

/// Which side a transaction kind's main leg sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Money leaves the main account: main leg negative, splits positive.
    Outgoing,
    /// Money enters the main account: main leg positive, splits negative.
    Incoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub columns: ColumnNames,
    pub outgoing_types: Vec<String>,
    pub incoming_types: Vec<String>,
    pub amount_sign: AmountSign,
    /// Split label written when a transaction has several counter-accounts.
    pub unresolved_split_marker: String,
    /// Prefix of the row closing an account section.
    pub total_prefix: String,
    /// First-column value of the grand-total row; nothing after it is read.
    pub grand_total: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            columns: ColumnNames::default(),
            outgoing_types: vec!["Check".to_string()],
            incoming_types: vec!["Deposit".to_string()],
            amount_sign: AmountSign::default(),
            unresolved_split_marker: "-SPLIT-".to_string(),
            total_prefix: "Total".to_string(),
            grand_total: "TOTAL".to_string(),
        }
    }
}

impl ConverterConfig {
    /// Reads overrides from a YAML file; absent keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(ConvertError::Config)
    }

    /// Classifies a transaction kind, or `None` if it is not supported.
    pub fn direction_of(&self, kind: &str) -> Option<Direction> {
        if self.outgoing_types.iter().any(|t| t == kind) {
            Some(Direction::Outgoing)
        } else if self.incoming_types.iter().any(|t| t == kind) {
            Some(Direction::Incoming)
        } else {
            None
        }
    }
}
