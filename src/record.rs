//! Flat line-item records and the account-path stack that annotates them.

use crate::amount::Amount;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Separator between account path segments in the ledger output.
pub const ACCOUNT_SEPARATOR: &str = ":";

/// Identifier shared by every line-item of one transaction.
///
/// Ordering is numeric-then-lexical: ids that are plain unsigned integers
/// sort numerically and come first, everything else sorts lexically after
/// them. This keeps output and diagnostics reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        TransactionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u128> {
        self.0.trim().parse().ok()
    }
}

impl Ord for TransactionId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for TransactionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        TransactionId::new(id)
    }
}

/// Nested account names, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountPath(Vec<String>);

impl AccountPath {
    pub fn new(segments: Vec<String>) -> Self {
        AccountPath(segments)
    }

    /// A path consisting of a single account name.
    pub fn single(name: impl Into<String>) -> Self {
        AccountPath(vec![name.into()])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The innermost account name.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Colon-joined form used by the ledger output, deepest segment last.
    pub fn joined(&self) -> String {
        self.0.join(ACCOUNT_SEPARATOR)
    }
}

impl fmt::Display for AccountPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl<S: Into<String>> FromIterator<S> for AccountPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        AccountPath(iter.into_iter().map(Into::into).collect())
    }
}

/// Account headers currently enclosing the row being parsed.
///
/// Owned by a single parse pass: pushed on an account header row, popped on
/// its matching "Total" row.
#[derive(Debug, Default)]
pub struct AccountStack {
    accounts: Vec<String>,
}

impl AccountStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, account: impl Into<String>) {
        self.accounts.push(account.into());
    }

    /// Removes the innermost account. Returns `None` when the stack is empty.
    pub fn pop(&mut self) -> Option<String> {
        self.accounts.pop()
    }

    pub fn depth(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// An independent copy of the current nesting.
    pub fn snapshot(&self) -> AccountPath {
        AccountPath(self.accounts.clone())
    }
}

/// One line-item of the export after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Enclosing accounts at the time the row was read.
    pub account_path: AccountPath,

    /// Shared by every leg of the same transaction.
    pub transaction_id: TransactionId,

    /// Transaction kind tag as written in the export, e.g. `Check` or `Deposit`.
    pub kind: String,

    pub date: String,

    pub payee_name: String,

    pub memo: String,

    /// Check or document number, if the export carries one.
    pub reference_number: Option<String>,

    /// Counter-account name, the unresolved-split marker, or empty.
    pub split_label: String,

    /// Signed amount; negative reduces the account, positive increases it.
    pub amount: Amount,

    /// Header-driven columns that have no typed field, keyed by header label.
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Builds the balancing leg implied by a record whose counter-account is
    /// only named in its split label.
    ///
    /// The clone carries the negated amount, is posted to the split label's
    /// account, and names the original's innermost account as its own split.
    pub fn synthesize_split(&self) -> Record {
        Record {
            account_path: AccountPath::single(self.split_label.clone()),
            split_label: self.account_path.last().unwrap_or_default().to_string(),
            amount: -self.amount,
            ..self.clone()
        }
    }
}
