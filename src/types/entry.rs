//! Canonical journal types for the ledger exchange engine
//!
//! This module defines the typed, validated representation that both wire
//! formats (FEC and XIMPORT) are parsed into and generated from:
//!
//! - [`EntryLine`] - one validated ledger line
//! - [`MoveKey`] - the grouping key for a journal move
//! - [`JournalMove`] - a balanced group of entry lines posted together

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a ledger line
///
/// Debits and credits are carried as separate magnitudes on the wire, but
/// an accepted line always has exactly one non-zero side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    /// Debit side (left column of the ledger)
    Debit,
    /// Credit side (right column of the ledger)
    Credit,
}

/// One validated, typed ledger line
///
/// Constructed only by the per-format line validators; immutable afterwards.
/// Exactly one of `debit` / `credit` is non-zero on an accepted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryLine {
    /// Short journal code (e.g. "VT" for sales)
    pub journal_code: String,
    /// Human-readable journal label
    pub journal_label: String,
    /// Move identifier within the journal; empty when the file gives none
    pub move_id: String,
    /// Entry (booking) date
    pub date: NaiveDate,
    /// Account code
    pub account_code: String,
    /// Account label
    pub account_label: String,
    /// Counterpart / partner account reference
    pub partner_ref: String,
    /// Counterpart / partner label
    pub partner_label: String,
    /// Piece (source document) reference
    pub piece_ref: String,
    /// Piece date
    pub piece_date: Option<NaiveDate>,
    /// Free-text line label
    pub label: String,
    /// Debit amount (zero when the line is a credit)
    pub debit: Decimal,
    /// Credit amount (zero when the line is a debit)
    pub credit: Decimal,
    /// Matching (lettrage) code linking reconciled lines
    pub matching_code: String,
    /// Date the matching was established
    pub matching_date: Option<NaiveDate>,
    /// Date the line was validated in the originating system
    pub validation_date: Option<NaiveDate>,
    /// Amount in the foreign currency, zero when none
    pub currency_amount: Decimal,
    /// Foreign currency code, empty when the line is in the company currency
    pub currency_code: String,
    /// Maturity (due) date for receivable/payable lines
    pub maturity_date: Option<NaiveDate>,
}

impl EntryLine {
    /// Which side of the ledger this line posts to
    pub fn sense(&self) -> Sense {
        if self.credit > Decimal::ZERO {
            Sense::Credit
        } else {
            Sense::Debit
        }
    }

    /// The non-zero magnitude of the line
    pub fn amount(&self) -> Decimal {
        match self.sense() {
            Sense::Debit => self.debit,
            Sense::Credit => self.credit,
        }
    }

    /// Signed amount: positive for debits, negative for credits
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Grouping key for a journal move
///
/// A move is identified by its journal code plus the move identifier from
/// the file. When the file carries no identifier, the entry date (formatted
/// `YYYYMMDD`) stands in, so same-day lines of one journal group together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveKey {
    pub journal_code: String,
    pub move_id: String,
}

impl MoveKey {
    /// Build the key for a validated line, applying the date fallback
    pub fn for_line(line: &EntryLine) -> Self {
        let move_id = if line.move_id.is_empty() {
            line.date.format("%Y%m%d").to_string()
        } else {
            line.move_id.clone()
        };
        MoveKey {
            journal_code: line.journal_code.clone(),
            move_id,
        }
    }
}

impl std::fmt::Display for MoveKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.journal_code, self.move_id)
    }
}

/// A journal move: the unit of ledger posting
///
/// Holds ≥1 entry lines in file order. The bookkeeping invariant is that
/// debit and credit totals agree within [`crate::core::balance_epsilon`];
/// the compliance validator enforces it before export or posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalMove {
    pub key: MoveKey,
    pub lines: Vec<EntryLine>,
}

impl JournalMove {
    /// Create a move from its first line; the key is only ever created
    /// when a first line exists, so a zero-line move cannot be constructed.
    pub fn new(key: MoveKey, first_line: EntryLine) -> Self {
        JournalMove {
            key,
            lines: vec![first_line],
        }
    }

    /// Append a line, preserving file order
    pub fn push(&mut self, line: EntryLine) {
        self.lines.push(line);
    }

    /// Sum of the debit column
    pub fn debit_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of the credit column
    pub fn credit_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// Whether the move balances within the given tolerance
    pub fn is_balanced(&self, epsilon: Decimal) -> bool {
        let diff = self.debit_total() - self.credit_total();
        diff.abs() <= epsilon
    }
}
