//! XIMPORT fixed-width format: record dispatch, extraction and validation
//!
//! XIMPORT is a legacy interchange format used by several third-party
//! accounting packages: one 107-character record per ledger line, fields
//! located by a fixed offset table, no separators. The first character
//! selects the record type:
//!
//! - `L` - ledger line, processed
//! - `M` - move header, optional and ignored
//! - `#` / `;` - comment, ignored
//! - anything else - ignored
//!
//! Lines shorter than a field's end offset simply yield that field empty;
//! third-party writers routinely truncate trailing blanks.

use crate::io::scalar::{parse_ximport_amount, parse_ximport_date};
use crate::io::ScanOutcome;
use crate::types::{EntryLine, ExchangeError};
use rust_decimal::Decimal;
use std::ops::Range;

/// Byte-offset table for `L` records (start..end, end-exclusive)
///
/// Byte 0 holds the record type, so the first field starts at 1.
pub const JOURNAL: Range<usize> = 1..3;
pub const DATE: Range<usize> = 3..9;
pub const ACCOUNT: Range<usize> = 9..19;
pub const LABEL: Range<usize> = 19..44;
pub const DEBIT: Range<usize> = 44..58;
pub const CREDIT: Range<usize> = 58..72;
pub const SENSE: Range<usize> = 72..73;
pub const PIECE: Range<usize> = 73..81;
pub const MATCHING: Range<usize> = 81..84;
pub const CURRENCY: Range<usize> = 84..87;
pub const CURRENCY_AMOUNT: Range<usize> = 87..101;
pub const MATURITY: Range<usize> = 101..107;

/// Total width of a full `L` record
pub const RECORD_WIDTH: usize = MATURITY.end;

/// What one physical line turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum XimportRecord {
    /// A ledger line with its extracted raw fields
    Line(XimportFields),
    /// A move header, a comment, or an unrecognized record type
    Skipped,
}

/// Raw field map for one `L` record, fixed-shape by construction
#[derive(Debug, Clone, PartialEq)]
pub struct XimportFields {
    pub journal_code: String,
    pub date: String,
    pub account_code: String,
    pub label: String,
    pub debit: String,
    pub credit: String,
    pub sense: String,
    pub piece_ref: String,
    pub matching_code: String,
    pub currency_code: String,
    pub currency_amount: String,
    pub maturity_date: String,
}

/// Extract a trimmed field from a line by character range
///
/// Short lines yield empty fields rather than raising. Character (not
/// byte) positions keep accented labels from shifting later fields once
/// the 8-bit source has been decoded.
fn field(line: &str, range: Range<usize>) -> String {
    line.chars()
        .skip(range.start)
        .take(range.end - range.start)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Dispatch one physical line on its record type and extract `L` fields
pub fn extract(line: &str) -> XimportRecord {
    match line.chars().next() {
        Some('L') => XimportRecord::Line(XimportFields {
            journal_code: field(line, JOURNAL),
            date: field(line, DATE),
            account_code: field(line, ACCOUNT),
            label: field(line, LABEL),
            debit: field(line, DEBIT),
            credit: field(line, CREDIT),
            sense: field(line, SENSE),
            piece_ref: field(line, PIECE),
            matching_code: field(line, MATCHING),
            currency_code: field(line, CURRENCY),
            currency_amount: field(line, CURRENCY_AMOUNT),
            maturity_date: field(line, MATURITY),
        }),
        _ => XimportRecord::Skipped,
    }
}

/// Validate one extracted `L` record into a typed entry line
///
/// Required fields are the journal code and the account number. The sense
/// flag, when present, overrides which parsed magnitude lands on the debit
/// or credit side.
pub fn validate(line: u64, rec: XimportFields) -> Result<EntryLine, ExchangeError> {
    if rec.journal_code.is_empty() {
        return Err(ExchangeError::missing_field(line, "journal"));
    }
    if rec.account_code.is_empty() {
        return Err(ExchangeError::missing_field(line, "account"));
    }

    let date = parse_ximport_date(&rec.date)
        .ok_or_else(|| ExchangeError::invalid_date(line, &rec.date))?;

    let debit = parse_ximport_amount(&rec.debit)
        .ok_or_else(|| ExchangeError::invalid_amount(line, &rec.debit))?;
    let credit = parse_ximport_amount(&rec.credit)
        .ok_or_else(|| ExchangeError::invalid_amount(line, &rec.credit))?;

    // The sense flag wins over column position when both disagree.
    let (debit, credit) = match rec.sense.as_str() {
        "D" => {
            let magnitude = if debit.is_zero() { credit } else { debit };
            (magnitude, Decimal::ZERO)
        }
        "C" => {
            let magnitude = if credit.is_zero() { debit } else { credit };
            (Decimal::ZERO, magnitude)
        }
        _ => (debit, credit),
    };

    if debit.is_zero() && credit.is_zero() {
        return Err(ExchangeError::missing_amount(line));
    }
    if !debit.is_zero() && !credit.is_zero() {
        return Err(ExchangeError::both_sides(line));
    }

    let currency_amount = parse_ximport_amount(&rec.currency_amount)
        .ok_or_else(|| ExchangeError::invalid_amount(line, &rec.currency_amount))?;

    Ok(EntryLine {
        journal_code: rec.journal_code,
        journal_label: String::new(),
        move_id: String::new(),
        date,
        account_code: rec.account_code,
        account_label: String::new(),
        partner_ref: String::new(),
        partner_label: String::new(),
        piece_ref: rec.piece_ref,
        piece_date: None,
        label: rec.label,
        debit,
        credit,
        matching_code: rec.matching_code,
        matching_date: None,
        validation_date: None,
        currency_amount,
        currency_code: rec.currency_code,
        maturity_date: parse_ximport_date(&rec.maturity_date),
    })
}

/// Scan a whole decoded XIMPORT buffer
///
/// Every physical line is processed independently; `M` headers, comments
/// and unknown record types count as skipped, never as errors.
pub fn scan(text: &str) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    for (idx, raw_line) in text.lines().enumerate() {
        let line = (idx + 1) as u64;
        outcome.total_lines += 1;
        if raw_line.trim().is_empty() {
            outcome.skipped += 1;
            continue;
        }
        match extract(raw_line) {
            XimportRecord::Skipped => outcome.skipped += 1,
            XimportRecord::Line(fields) => match validate(line, fields) {
                Ok(entry) => outcome.accepted.push(entry),
                Err(e) => outcome.errors.push(e),
            },
        }
    }
    outcome
}
