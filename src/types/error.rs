//! Error types for the ledger exchange engine
//!
//! Two severities of failure flow through the codec:
//!
//! - **Fatal errors** ([`ExchangeError`]) abort the whole job: no usable
//!   decoding, an empty export period, an attempt to re-export an
//!   immutable move, or a compliance failure on the export side.
//! - **Collected issues** ([`ComplianceIssue`]) are attached to a line or
//!   a move and accumulated in the job result; they never abort import
//!   scanning.
//!
//! Line-level problems (bad date, bad amount, missing field) exist in both
//! shapes: the validators build them as [`ExchangeError`] values and the
//! jobs fold them into [`ComplianceIssue`] entries with their 1-based line
//! number.

use crate::types::entry::MoveKey;
use serde::Serialize;
use thiserror::Error;

/// Main error type for the exchange engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExchangeError {
    /// No candidate encoding could decode the input buffer
    ///
    /// Fatal: the whole job fails before any line is scanned.
    #[error("undecodable input: none of the candidate encodings ({tried}) accepted the buffer")]
    Decode {
        /// Comma-separated candidate encoding names, in the order tried
        tried: String,
    },

    /// A date field matched none of the accepted formats
    ///
    /// Line-level, collected; scanning continues.
    #[error("line {line}: invalid date '{value}'")]
    InvalidDate { line: u64, value: String },

    /// An amount field was not numeric under any accepted rule
    ///
    /// Line-level, collected; scanning continues.
    #[error("line {line}: invalid amount '{value}'")]
    InvalidAmount { line: u64, value: String },

    /// A required field was empty
    ///
    /// Line-level, collected; scanning continues.
    #[error("line {line}: missing required field '{field}'")]
    MissingField { line: u64, field: &'static str },

    /// Neither debit nor credit carried an amount
    ///
    /// Line-level, collected; scanning continues.
    #[error("line {line}: neither debit nor credit carries an amount")]
    MissingAmount { line: u64 },

    /// Both debit and credit carried an amount on one line
    ///
    /// Line-level, collected; scanning continues.
    #[error("line {line}: debit and credit are both non-zero")]
    BothSides { line: u64 },

    /// The requested export period contains no posted moves
    #[error("no posted moves in the requested period")]
    EmptyResult,

    /// Attempt to re-export (or mutate) an already exported move
    #[error("move {key} has already been exported and is immutable")]
    ImmutableMove { key: String },

    /// A journal code not known to the ledger store
    ///
    /// Surfaced by the store collaborator; a business error, not a codec
    /// error. The affected move is excluded from persistence.
    #[error("unknown journal '{code}'")]
    UnknownJournal { code: String },

    /// An account code not known to the ledger store
    #[error("unknown account '{code}'")]
    UnknownAccount { code: String },

    /// Export refused because compliance validation reported issues
    #[error("export refused: {count} compliance issue(s)")]
    ComplianceFailure { count: usize },

    /// I/O failure reading or writing a file
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for ExchangeError {
    fn from(error: std::io::Error) -> Self {
        ExchangeError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ExchangeError {
    fn from(error: csv::Error) -> Self {
        ExchangeError::Io {
            message: error.to_string(),
        }
    }
}

// Helper constructors, mirrored on the call sites in the validators.

impl ExchangeError {
    pub fn decode(candidates: &[&'static encoding_rs::Encoding]) -> Self {
        let tried = candidates
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>()
            .join(", ");
        ExchangeError::Decode { tried }
    }

    pub fn invalid_date(line: u64, value: &str) -> Self {
        ExchangeError::InvalidDate {
            line,
            value: value.to_string(),
        }
    }

    pub fn invalid_amount(line: u64, value: &str) -> Self {
        ExchangeError::InvalidAmount {
            line,
            value: value.to_string(),
        }
    }

    pub fn missing_field(line: u64, field: &'static str) -> Self {
        ExchangeError::MissingField { line, field }
    }

    pub fn missing_amount(line: u64) -> Self {
        ExchangeError::MissingAmount { line }
    }

    pub fn both_sides(line: u64) -> Self {
        ExchangeError::BothSides { line }
    }

    pub fn immutable_move(key: &MoveKey) -> Self {
        ExchangeError::ImmutableMove {
            key: key.to_string(),
        }
    }

    pub fn unknown_journal(code: &str) -> Self {
        ExchangeError::UnknownJournal {
            code: code.to_string(),
        }
    }

    pub fn unknown_account(code: &str) -> Self {
        ExchangeError::UnknownAccount {
            code: code.to_string(),
        }
    }

    /// The 1-based line number this error is attached to, if any
    pub fn line(&self) -> Option<u64> {
        match self {
            ExchangeError::InvalidDate { line, .. }
            | ExchangeError::InvalidAmount { line, .. }
            | ExchangeError::MissingField { line, .. }
            | ExchangeError::MissingAmount { line }
            | ExchangeError::BothSides { line } => Some(*line),
            _ => None,
        }
    }
}

/// What a collected issue is attached to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueScope {
    /// A physical line of the input file (1-based)
    Line(u64),
    /// A whole journal move
    Move(MoveKey),
}

impl std::fmt::Display for IssueScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueScope::Line(n) => write!(f, "line {}", n),
            IssueScope::Move(key) => write!(f, "move {}", key),
        }
    }
}

/// A non-fatal problem collected during import scanning or compliance
/// validation, attached to its line or move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceIssue {
    pub scope: IssueScope,
    pub message: String,
}

impl ComplianceIssue {
    /// Attach a line-level error to its 1-based line number
    pub fn for_line(error: &ExchangeError) -> Self {
        ComplianceIssue {
            scope: IssueScope::Line(error.line().unwrap_or(0)),
            message: error.to_string(),
        }
    }

    /// Build a move-level issue
    pub fn for_move(key: &MoveKey, message: impl Into<String>) -> Self {
        ComplianceIssue {
            scope: IssueScope::Move(key.clone()),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_date(
        ExchangeError::invalid_date(12, "20249999"),
        "line 12: invalid date '20249999'"
    )]
    #[case::invalid_amount(
        ExchangeError::invalid_amount(3, "abc"),
        "line 3: invalid amount 'abc'"
    )]
    #[case::missing_field(
        ExchangeError::missing_field(7, "JournalCode"),
        "line 7: missing required field 'JournalCode'"
    )]
    #[case::missing_amount(
        ExchangeError::missing_amount(2),
        "line 2: neither debit nor credit carries an amount"
    )]
    #[case::empty_result(
        ExchangeError::EmptyResult,
        "no posted moves in the requested period"
    )]
    #[case::unknown_journal(
        ExchangeError::unknown_journal("ZZ"),
        "unknown journal 'ZZ'"
    )]
    #[case::compliance(
        ExchangeError::ComplianceFailure { count: 2 },
        "export refused: 2 compliance issue(s)"
    )]
    fn test_error_display(#[case] error: ExchangeError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_immutable_move_display() {
        let key = MoveKey {
            journal_code: "VT".to_string(),
            move_id: "42".to_string(),
        };
        assert_eq!(
            ExchangeError::immutable_move(&key).to_string(),
            "move VT/42 has already been exported and is immutable"
        );
    }

    #[rstest]
    #[case(ExchangeError::invalid_date(5, "x"), Some(5))]
    #[case(ExchangeError::missing_amount(9), Some(9))]
    #[case(ExchangeError::EmptyResult, None)]
    fn test_error_line(#[case] error: ExchangeError, #[case] expected: Option<u64>) {
        assert_eq!(error.line(), expected);
    }

    #[test]
    fn test_issue_for_line_carries_line_number() {
        let issue = ComplianceIssue::for_line(&ExchangeError::missing_amount(4));
        assert_eq!(issue.scope, IssueScope::Line(4));
        assert!(issue.message.contains("line 4"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: ExchangeError = io_error.into();
        assert!(matches!(error, ExchangeError::Io { .. }));
    }
}
