//! XIMPORT generator
//!
//! Serializes canonical moves into the fixed-width legacy layout: one `L`
//! record of 107 characters per ledger line, text fields left-justified
//! and space-padded, amounts right-justified as integer cents, dates as
//! `DDMMYY`, the whole payload encoded in Windows-1252. The output
//! filename is the fixed literal the receiving packages poll for.

use crate::io::ximport_format::{
    ACCOUNT, CREDIT, CURRENCY, CURRENCY_AMOUNT, DATE, DEBIT, JOURNAL, LABEL, MATCHING, MATURITY,
    PIECE, SENSE,
};
use crate::types::{JournalMove, Sense};
use chrono::NaiveDate;
use encoding_rs::WINDOWS_1252;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fixed output filename the legacy packages expect
pub const XIMPORT_FILENAME: &str = "XIMPORT.TXT";

// date6 output must match the offset table's date column widths
const _: () = assert!(DATE.end - DATE.start == 6 && MATURITY.end - MATURITY.start == 6);

/// Amount as an integer count of minor currency units
///
/// Amounts beyond i64 cents are not representable in the format and
/// collapse to zero; compliance validation upstream keeps real ledgers
/// far away from that bound.
fn cents(amount: Decimal) -> i64 {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    (rounded * Decimal::new(100, 0)).to_i64().unwrap_or_default()
}

/// Left-justified, space-padded, truncated text field
fn text(value: &str, width: usize) -> String {
    let cut: String = value.chars().take(width).collect();
    format!("{:<width$}", cut)
}

/// Right-justified integer-cents field
fn numeric(amount: Decimal, width: usize) -> String {
    let cut: String = cents(amount).to_string().chars().take(width).collect();
    format!("{:>width$}", cut)
}

/// `DDMMYY` date field, blank when absent
fn date6(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d%m%y").to_string(),
        None => " ".repeat(6),
    }
}

/// Serialize moves into XIMPORT bytes (fixed-width, Windows-1252, CRLF)
pub fn generate(moves: &[JournalMove]) -> Vec<u8> {
    let mut out = String::new();
    for mv in moves {
        for line in &mv.lines {
            let sense = match line.sense() {
                Sense::Debit => "D",
                Sense::Credit => "C",
            };
            out.push('L');
            out.push_str(&text(&line.journal_code, JOURNAL.len()));
            out.push_str(&date6(Some(line.date)));
            out.push_str(&text(&line.account_code, ACCOUNT.len()));
            out.push_str(&text(&line.label, LABEL.len()));
            out.push_str(&numeric(line.debit, DEBIT.len()));
            out.push_str(&numeric(line.credit, CREDIT.len()));
            out.push_str(&text(sense, SENSE.len()));
            out.push_str(&text(&line.piece_ref, PIECE.len()));
            out.push_str(&text(&line.matching_code, MATCHING.len()));
            out.push_str(&text(&line.currency_code, CURRENCY.len()));
            out.push_str(&numeric(line.currency_amount, CURRENCY_AMOUNT.len()));
            out.push_str(&date6(line.maturity_date));
            out.push_str("\r\n");
        }
    }
    WINDOWS_1252.encode(&out).0.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ximport_format::{self, XimportRecord, RECORD_WIDTH};
    use crate::types::{EntryLine, MoveKey};

    fn sample_move() -> JournalMove {
        let debit = EntryLine {
            journal_code: "VT".to_string(),
            journal_label: String::new(),
            move_id: "VT-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            account_code: "411000".to_string(),
            account_label: String::new(),
            partner_ref: String::new(),
            partner_label: String::new(),
            piece_ref: "F001".to_string(),
            piece_date: None,
            label: "Facture client".to_string(),
            debit: Decimal::new(12000, 2),
            credit: Decimal::ZERO,
            matching_code: String::new(),
            matching_date: None,
            validation_date: None,
            currency_amount: Decimal::ZERO,
            currency_code: String::new(),
            maturity_date: NaiveDate::from_ymd_opt(2024, 3, 15),
        };
        let mut credit = debit.clone();
        credit.account_code = "707000".to_string();
        credit.debit = Decimal::ZERO;
        credit.credit = Decimal::new(12000, 2);
        credit.maturity_date = None;

        let key = MoveKey {
            journal_code: "VT".to_string(),
            move_id: "VT-1".to_string(),
        };
        let mut mv = JournalMove::new(key, debit);
        mv.push(credit);
        mv
    }

    #[test]
    fn test_cents_conversion() {
        assert_eq!(cents(Decimal::new(12000, 2)), 12000);
        assert_eq!(cents(Decimal::new(-4250, 2)), -4250);
        assert_eq!(cents(Decimal::ZERO), 0);
        // sub-cent precision rounds before conversion
        assert_eq!(cents(Decimal::new(12345, 3)), 1235);
    }

    #[test]
    fn test_records_are_fixed_width() {
        let payload = generate(&[sample_move()]);
        let text = String::from_utf8(payload).unwrap();
        for line in text.split("\r\n").filter(|l| !l.is_empty()) {
            assert_eq!(line.chars().count(), RECORD_WIDTH);
            assert!(line.starts_with('L'));
        }
    }

    #[test]
    fn test_field_placement() {
        let payload = generate(&[sample_move()]);
        let text = String::from_utf8(payload).unwrap();
        let first = text.split("\r\n").next().unwrap();

        assert_eq!(&first[1..3], "VT");
        assert_eq!(&first[3..9], "150124");
        assert_eq!(&first[9..19], "411000    ");
        assert_eq!(&first[44..58].trim_start(), &"12000");
        assert_eq!(&first[72..73], "D");
        assert_eq!(&first[101..107], "150324");
    }

    #[test]
    fn test_sense_flag_follows_line_side() {
        let payload = generate(&[sample_move()]);
        let text = String::from_utf8(payload).unwrap();
        let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(&lines[0][72..73], "D");
        assert_eq!(&lines[1][72..73], "C");
    }

    #[test]
    fn test_output_reparses_through_the_reader() {
        let payload = generate(&[sample_move()]);
        let text = String::from_utf8(payload).unwrap();
        let first = text.split("\r\n").next().unwrap();

        let XimportRecord::Line(fields) = ximport_format::extract(first) else {
            panic!("generated record did not dispatch as an L line");
        };
        let entry = ximport_format::validate(1, fields).unwrap();
        assert_eq!(entry.journal_code, "VT");
        assert_eq!(entry.debit, Decimal::new(12000, 2));
        assert_eq!(
            entry.maturity_date,
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn test_accented_label_encodes_as_windows_1252() {
        let mut mv = sample_move();
        mv.lines[0].label = "Opération diverse".to_string();

        let payload = generate(&[mv]);
        // 'é' is a single 0xE9 byte in Windows-1252
        assert!(payload.contains(&0xE9));
        // every record still spans exactly RECORD_WIDTH bytes
        let first_len = payload.split(|b| *b == b'\r').next().unwrap().len();
        assert_eq!(first_len, RECORD_WIDTH);
    }
}
