//! FEC generator
//!
//! Serializes canonical moves back into the regulatory delimited layout:
//! 18 pipe-delimited columns, CRLF line endings, no header row, amounts
//! with exactly two decimals and a comma separator, UTF-8 bytes. Overlong
//! values are truncated to the per-column caps, never rejected - the
//! receiving ecosystem's loaders reject overlong fields outright.

use crate::types::{ExchangeError, JournalMove};
use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use rust_decimal::{Decimal, RoundingStrategy};

/// Per-column length caps, in wire order; 0 means uncapped
///
/// Journal code 10, labels 100/200, references 20, matching 8, dates 8,
/// currency 3. Amount columns are uncapped.
const FIELD_CAPS: [usize; 18] = [
    10,  // JournalCode
    100, // JournalLib
    20,  // EcritureNum
    8,   // EcritureDate
    20,  // CompteNum
    200, // CompteLib
    20,  // CompAuxNum
    200, // CompAuxLib
    20,  // PieceRef
    8,   // PieceDate
    200, // EcritureLib
    0,   // Debit
    0,   // Credit
    8,   // EcritureLet
    8,   // DateLet
    8,   // ValidDate
    0,   // Montantdevise
    3,   // Idevise
];

/// Cap a value to its column width and strip characters that would break
/// the unquoted record layout.
fn clamp(value: &str, cap: usize) -> String {
    let sanitized: String = value
        .chars()
        .map(|c| match c {
            '|' | '\t' | '\r' | '\n' => ' ',
            other => other,
        })
        .collect();
    if cap == 0 {
        sanitized
    } else {
        sanitized.chars().take(cap).collect()
    }
}

/// Format an amount as `1234,56`: two decimals, comma separator.
/// Midpoints round away from zero, the convention of the receiving
/// accounting packages.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded).replace('.', ",")
}

/// Format an optional date as `YYYYMMDD`, empty when absent
fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y%m%d").to_string())
        .unwrap_or_default()
}

/// Compute the regulatory FEC filename
///
/// The company registry identifier (SIREN) is digit-filtered and brought
/// to exactly 9 digits: left-padded with zeros when short, cut when long.
pub fn fec_filename(registry_id: &str, closing_date: NaiveDate) -> String {
    let digits: String = registry_id.chars().filter(char::is_ascii_digit).collect();
    let siren: String = format!("{:0>9}", digits).chars().take(9).collect();
    format!("{}FEC{}.txt", siren, closing_date.format("%Y%m%d"))
}

/// Serialize moves into FEC bytes (UTF-8, pipe-delimited, CRLF, no header)
pub fn generate(moves: &[JournalMove]) -> Result<Vec<u8>, ExchangeError> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'|')
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());

    for mv in moves {
        for line in &mv.lines {
            let has_currency = !line.currency_code.is_empty();
            let columns = [
                line.journal_code.clone(),
                line.journal_label.clone(),
                mv.key.move_id.clone(),
                line.date.format("%Y%m%d").to_string(),
                line.account_code.clone(),
                line.account_label.clone(),
                line.partner_ref.clone(),
                line.partner_label.clone(),
                line.piece_ref.clone(),
                format_date(line.piece_date),
                line.label.clone(),
                format_amount(line.debit),
                format_amount(line.credit),
                line.matching_code.clone(),
                format_date(line.matching_date),
                format_date(line.validation_date),
                if has_currency {
                    format_amount(line.currency_amount)
                } else {
                    String::new()
                },
                line.currency_code.clone(),
            ];
            let record: Vec<String> = columns
                .iter()
                .zip(FIELD_CAPS.iter())
                .map(|(value, cap)| clamp(value, *cap))
                .collect();
            writer.write_record(&record)?;
        }
    }
    writer.into_inner().map_err(|e| ExchangeError::Io {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryLine, MoveKey};
    use rstest::rstest;

    fn sample_move() -> JournalMove {
        let debit = EntryLine {
            journal_code: "VT".to_string(),
            journal_label: "Ventes".to_string(),
            move_id: "VT-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            account_code: "411000".to_string(),
            account_label: "Clients".to_string(),
            partner_ref: "C001".to_string(),
            partner_label: "Client A".to_string(),
            piece_ref: "F001".to_string(),
            piece_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            label: "Facture 1".to_string(),
            debit: Decimal::new(12000, 2),
            credit: Decimal::ZERO,
            matching_code: String::new(),
            matching_date: None,
            validation_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            currency_amount: Decimal::ZERO,
            currency_code: String::new(),
            maturity_date: None,
        };
        let mut credit = debit.clone();
        credit.account_code = "707000".to_string();
        credit.account_label = "Produits".to_string();
        credit.debit = Decimal::ZERO;
        credit.credit = Decimal::new(12000, 2);

        let key = MoveKey {
            journal_code: "VT".to_string(),
            move_id: "VT-1".to_string(),
        };
        let mut mv = JournalMove::new(key, debit);
        mv.push(credit);
        mv
    }

    #[rstest]
    #[case(Decimal::new(12000, 2), "120,00")]
    #[case(Decimal::ZERO, "0,00")]
    #[case(Decimal::new(-4250, 2), "-42,50")]
    #[case(Decimal::new(1, 0), "1,00")]
    #[case(Decimal::new(12345, 3), "12,35")] // rounded to two decimals
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[rstest]
    #[case("123456789", "123456789FEC20241231.txt")]
    #[case("123 456 789", "123456789FEC20241231.txt")]
    #[case("12345", "000012345FEC20241231.txt")]
    #[case("1234567890123", "123456789FEC20241231.txt")]
    fn test_fec_filename(#[case] registry: &str, #[case] expected: &str) {
        let closing = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(fec_filename(registry, closing), expected);
    }

    #[test]
    fn test_generate_layout() {
        let payload = generate(&[sample_move()]).unwrap();
        let text = String::from_utf8(payload).unwrap();

        // CRLF endings, no header, one record per line
        assert!(!text.starts_with("JournalCode"));
        let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 2);

        let fields: Vec<&str> = lines[0].split('|').collect();
        assert_eq!(fields.len(), 18);
        assert_eq!(fields[0], "VT");
        assert_eq!(fields[2], "VT-1");
        assert_eq!(fields[3], "20240115");
        assert_eq!(fields[11], "120,00");
        assert_eq!(fields[12], "0,00");
        assert_eq!(fields[15], "20240131");
        assert_eq!(fields[16], ""); // no foreign currency
    }

    #[test]
    fn test_generate_truncates_overlong_fields() {
        let mut mv = sample_move();
        mv.lines[0].journal_code = "TOOLONGJOURNAL".to_string();
        mv.lines[0].label = "x".repeat(300);

        let payload = generate(&[mv]).unwrap();
        let text = String::from_utf8(payload).unwrap();
        let fields: Vec<&str> = text.split("\r\n").next().unwrap().split('|').collect();
        assert_eq!(fields[0], "TOOLONGJOU"); // capped at 10
        assert_eq!(fields[10].len(), 200); // capped at 200
    }

    #[test]
    fn test_generate_sanitizes_delimiter_in_labels() {
        let mut mv = sample_move();
        mv.lines[0].label = "a|b\tc".to_string();

        let payload = generate(&[mv]).unwrap();
        let text = String::from_utf8(payload).unwrap();
        let fields: Vec<&str> = text.split("\r\n").next().unwrap().split('|').collect();
        assert_eq!(fields.len(), 18);
        assert_eq!(fields[10], "a b c");
    }

    #[test]
    fn test_generate_emits_currency_pair_when_present() {
        let mut mv = sample_move();
        mv.lines[0].currency_code = "USD".to_string();
        mv.lines[0].currency_amount = Decimal::new(13050, 2);

        let payload = generate(&[mv]).unwrap();
        let text = String::from_utf8(payload).unwrap();
        let fields: Vec<&str> = text.split("\r\n").next().unwrap().split('|').collect();
        assert_eq!(fields[16], "130,50");
        assert_eq!(fields[17], "USD");
    }
}
