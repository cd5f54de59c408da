//! FEC delimited format: detection, extraction and line validation
//!
//! The FEC regulatory export is a pipe-delimited file of 18 fixed columns
//! (tab-delimited variants exist in the wild and are accepted on read).
//! There is no quoting. A header row is optional; it is recognized by its
//! first field spelling the canonical first column name.
//!
//! Scanning is line-independent: each physical line either yields a typed
//! [`EntryLine`] or a collected error, and a malformed line never stops
//! the scan.

use crate::io::scalar::{parse_fec_amount, parse_fec_date};
use crate::io::ScanOutcome;
use crate::types::{EntryLine, ExchangeError};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::debug;

/// The 18 FEC columns, in wire order
pub const FEC_COLUMNS: [&str; 18] = [
    "JournalCode",
    "JournalLib",
    "EcritureNum",
    "EcritureDate",
    "CompteNum",
    "CompteLib",
    "CompAuxNum",
    "CompAuxLib",
    "PieceRef",
    "PieceDate",
    "EcritureLib",
    "Debit",
    "Credit",
    "EcritureLet",
    "DateLet",
    "ValidDate",
    "Montantdevise",
    "Idevise",
];

/// Raw field map for one FEC line, fixed-shape by construction
///
/// Missing trailing fields read as empty strings rather than errors, since
/// several exporters drop the foreign-currency tail entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct FecRecord {
    pub journal_code: String,
    pub journal_label: String,
    pub move_id: String,
    pub date: String,
    pub account_code: String,
    pub account_label: String,
    pub partner_ref: String,
    pub partner_label: String,
    pub piece_ref: String,
    pub piece_date: String,
    pub label: String,
    pub debit: String,
    pub credit: String,
    pub matching_code: String,
    pub matching_date: String,
    pub validation_date: String,
    pub currency_amount: String,
    pub currency_code: String,
}

/// Pick the delimiter from the first physical line: pipe wins, else tab
pub fn detect_delimiter(first_line: &str) -> u8 {
    if first_line.contains('|') {
        b'|'
    } else {
        b'\t'
    }
}

/// Whether a first record is the optional header row
pub fn is_header(first_field: &str) -> bool {
    first_field.trim().eq_ignore_ascii_case(FEC_COLUMNS[0])
}

/// Turn one delimited record into the fixed-shape raw field map
pub fn extract(record: &csv::StringRecord) -> FecRecord {
    let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
    FecRecord {
        journal_code: field(0),
        journal_label: field(1),
        move_id: field(2),
        date: field(3),
        account_code: field(4),
        account_label: field(5),
        partner_ref: field(6),
        partner_label: field(7),
        piece_ref: field(8),
        piece_date: field(9),
        label: field(10),
        debit: field(11),
        credit: field(12),
        matching_code: field(13),
        matching_date: field(14),
        validation_date: field(15),
        currency_amount: field(16),
        currency_code: field(17),
    }
}

/// Parse an optional date field; unparseable content degrades to `None`
/// rather than rejecting the line, matching how third-party exporters
/// leave these columns half-filled.
fn optional_date(raw: &str) -> Option<NaiveDate> {
    parse_fec_date(raw)
}

/// Validate one extracted record into a typed entry line
///
/// Required fields are journal code, move number, entry date and account
/// number. Exactly one of debit/credit must be non-zero.
pub fn validate(line: u64, rec: FecRecord) -> Result<EntryLine, ExchangeError> {
    if rec.journal_code.is_empty() {
        return Err(ExchangeError::missing_field(line, "JournalCode"));
    }
    if rec.move_id.is_empty() {
        return Err(ExchangeError::missing_field(line, "EcritureNum"));
    }
    if rec.date.is_empty() {
        return Err(ExchangeError::missing_field(line, "EcritureDate"));
    }
    if rec.account_code.is_empty() {
        return Err(ExchangeError::missing_field(line, "CompteNum"));
    }

    let date =
        parse_fec_date(&rec.date).ok_or_else(|| ExchangeError::invalid_date(line, &rec.date))?;
    let debit = parse_fec_amount(&rec.debit)
        .ok_or_else(|| ExchangeError::invalid_amount(line, &rec.debit))?;
    let credit = parse_fec_amount(&rec.credit)
        .ok_or_else(|| ExchangeError::invalid_amount(line, &rec.credit))?;

    if debit.is_zero() && credit.is_zero() {
        return Err(ExchangeError::missing_amount(line));
    }
    if !debit.is_zero() && !credit.is_zero() {
        return Err(ExchangeError::both_sides(line));
    }

    let currency_amount = parse_fec_amount(&rec.currency_amount)
        .ok_or_else(|| ExchangeError::invalid_amount(line, &rec.currency_amount))?;

    Ok(EntryLine {
        journal_code: rec.journal_code,
        journal_label: rec.journal_label,
        move_id: rec.move_id,
        date,
        account_code: rec.account_code,
        account_label: rec.account_label,
        partner_ref: rec.partner_ref,
        partner_label: rec.partner_label,
        piece_ref: rec.piece_ref,
        piece_date: optional_date(&rec.piece_date),
        label: rec.label,
        debit,
        credit,
        matching_code: rec.matching_code,
        matching_date: optional_date(&rec.matching_date),
        validation_date: optional_date(&rec.validation_date),
        currency_amount,
        currency_code: rec.currency_code,
        maturity_date: None,
    })
}

/// Scan a whole decoded FEC buffer
///
/// Detects the delimiter from the first line, skips an optional header
/// row, and validates every remaining line independently. Errors are
/// collected, never propagated.
pub fn scan(text: &str) -> ScanOutcome {
    let first_line = text.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);
    debug!(delimiter = %(delimiter as char), "detected FEC delimiter");

    // The reader silently drops blank lines, so physical counts come
    // from the text itself and record line numbers from the reader's
    // position; errors stay attached to physical line numbers.
    let mut outcome = ScanOutcome {
        total_lines: text.lines().count() as u64,
        skipped: text.lines().filter(|l| l.is_empty()).count() as u64,
        ..ScanOutcome::default()
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut first_record = true;
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                outcome.errors.push(ExchangeError::from(e));
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if first_record {
            first_record = false;
            if is_header(record.get(0).unwrap_or("")) {
                outcome.skipped += 1;
                continue;
            }
        }
        match validate(line, extract(&record)) {
            Ok(entry) => outcome.accepted.push(entry),
            Err(e) => outcome.errors.push(e),
        }
    }
    outcome
}
