//! Shared scalar parsers: dates and amounts
//!
//! Both wire formats lean on the same recovery strategy: try an ordered
//! list of shapes and accept the first that fits. Dates in FEC files come
//! in three layouts depending on the exporting software; XIMPORT dates are
//! day-first with an optional two-digit year whose century is inferred
//! (`YY < 50` is 2000s, otherwise 1900s - the rule the legacy ecosystem
//! bakes in, preserved as-is).
//!
//! Amounts are locale-tolerant: spaces are thousands padding and the comma
//! is the decimal separator. The XIMPORT variant first reads the field as
//! an integer count of minor currency units.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Accepted FEC date layouts, in fallback order
const FEC_DATE_FORMATS: &[&str] = &["%Y%m%d", "%Y-%m-%d", "%d/%m/%Y"];

/// Parse a FEC date field; `None` when no layout matches
pub fn parse_fec_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    FEC_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Century inference for two-digit years
fn expand_century(yy: i32) -> i32 {
    if yy < 50 {
        2000 + yy
    } else {
        1900 + yy
    }
}

/// Parse an XIMPORT date field
///
/// Accepts `DDMMYY`, `DDMMYYYY` and `DD/MM/YY[YY]`; two-digit years go
/// through the century rule. A six-digit string that is not a valid
/// day-first date is retried year-first (`YYMMDD`), the layout found in
/// older archival dumps. `None` for anything else, including empty.
pub fn parse_ximport_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Some((d, rest)) = raw.split_once('/') {
        let (m, y) = rest.split_once('/')?;
        let day: u32 = d.parse().ok()?;
        let month: u32 = m.parse().ok()?;
        let year: i32 = match y.len() {
            2 => expand_century(y.parse().ok()?),
            4 => y.parse().ok()?,
            _ => return None,
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match raw.len() {
        6 => {
            let first: u32 = raw[0..2].parse().ok()?;
            let month: u32 = raw[2..4].parse().ok()?;
            let last: u32 = raw[4..6].parse().ok()?;
            // day-first wins when both readings are valid calendar dates
            NaiveDate::from_ymd_opt(expand_century(last as i32), month, first)
                .or_else(|| NaiveDate::from_ymd_opt(expand_century(first as i32), month, last))
        }
        8 => {
            let day: u32 = raw[0..2].parse().ok()?;
            let month: u32 = raw[2..4].parse().ok()?;
            let year: i32 = raw[4..8].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        }
        _ => None,
    }
}

/// Parse a FEC amount field
///
/// Spaces (regular and no-break) are stripped, the comma becomes a period,
/// and the result is read as a decimal. Empty means zero; `None` only for
/// genuinely non-numeric content.
pub fn parse_fec_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(&cleaned).ok()
}

/// Parse an XIMPORT amount field
///
/// The primary rule treats the field as an integer number of minor
/// currency units (cents). When the field is not a plain integer, the
/// FEC decimal rule applies as a fallback. Empty means zero.
pub fn parse_ximport_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(Decimal::ZERO);
    }
    if let Ok(cents) = raw.parse::<i64>() {
        return Some(Decimal::new(cents, 2));
    }
    parse_fec_amount(raw)
}
