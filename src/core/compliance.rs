//! Compliance validator
//!
//! Move-level bookkeeping invariants, enforced before a move may be
//! exported or committed: a real identifier, a journal, an account and a
//! label on every line, single-sided lines, and debit/credit totals that
//! agree within [`balance_epsilon`]. Violations are collected per move;
//! export treats any violation as fatal while import applies the caller's
//! policy.

use crate::types::{ComplianceIssue, JournalMove};
use rust_decimal::Decimal;
use serde::Serialize;

/// Balance tolerance: one minor currency unit, i.e. 0.01 in a
/// two-decimal ledger currency. Covers floating rounding introduced by
/// third-party exporters.
pub fn balance_epsilon() -> Decimal {
    Decimal::new(1, 2)
}

/// What the import job does with non-compliant moves
///
/// Export ignores this: a non-compliant move always blocks an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompliancePolicy {
    /// Record issues but persist the move anyway
    Advisory,
    /// Record issues and exclude the move from persistence
    Strict,
}

/// Move identifiers that stand for "not numbered yet"
fn is_placeholder(move_id: &str) -> bool {
    move_id.is_empty() || move_id == "/"
}

/// Validate one move against the bookkeeping invariants
///
/// Returns every violation, not just the first, so a report names all the
/// problems of a move at once.
pub fn validate_move(mv: &JournalMove) -> Vec<ComplianceIssue> {
    let mut issues = Vec::new();
    let key = &mv.key;

    if is_placeholder(&key.move_id) {
        issues.push(ComplianceIssue::for_move(key, "move identifier is missing"));
    }
    if key.journal_code.is_empty() {
        issues.push(ComplianceIssue::for_move(key, "journal code is empty"));
    }
    for line in &mv.lines {
        if line.account_code.is_empty() {
            issues.push(ComplianceIssue::for_move(key, "a line has no account"));
        }
        if line.label.is_empty() {
            issues.push(ComplianceIssue::for_move(key, "a line has no label"));
        }
        if !line.debit.is_zero() && !line.credit.is_zero() {
            issues.push(ComplianceIssue::for_move(
                key,
                "a line has both debit and credit set",
            ));
        }
    }
    if !mv.is_balanced(balance_epsilon()) {
        issues.push(ComplianceIssue::for_move(
            key,
            format!(
                "move is unbalanced: debits {} != credits {}",
                mv.debit_total(),
                mv.credit_total()
            ),
        ));
    }
    issues
}

/// Validate a batch of moves, concatenating their issues
pub fn validate_all(moves: &[JournalMove]) -> Vec<ComplianceIssue> {
    moves.iter().flat_map(validate_move).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryLine, MoveKey};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn line(account: &str, label: &str, debit: i64, credit: i64) -> EntryLine {
        EntryLine {
            journal_code: "VT".to_string(),
            journal_label: String::new(),
            move_id: "VT-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            account_code: account.to_string(),
            account_label: String::new(),
            partner_ref: String::new(),
            partner_label: String::new(),
            piece_ref: String::new(),
            piece_date: None,
            label: label.to_string(),
            debit: Decimal::new(debit, 2),
            credit: Decimal::new(credit, 2),
            matching_code: String::new(),
            matching_date: None,
            validation_date: None,
            currency_amount: Decimal::ZERO,
            currency_code: String::new(),
            maturity_date: None,
        }
    }

    fn balanced_move() -> JournalMove {
        let key = MoveKey {
            journal_code: "VT".to_string(),
            move_id: "VT-1".to_string(),
        };
        let mut mv = JournalMove::new(key, line("411000", "invoice", 12000, 0));
        mv.push(line("707000", "invoice", 0, 12000));
        mv
    }

    #[test]
    fn test_balanced_move_is_compliant() {
        assert!(validate_move(&balanced_move()).is_empty());
    }

    #[rstest]
    #[case::empty("")]
    #[case::slash("/")]
    fn test_placeholder_move_id(#[case] move_id: &str) {
        let mut mv = balanced_move();
        mv.key.move_id = move_id.to_string();
        let issues = validate_move(&mv);
        assert!(issues.iter().any(|i| i.message.contains("identifier")));
    }

    #[test]
    fn test_missing_account_and_label() {
        let mut mv = balanced_move();
        mv.lines[0].account_code = String::new();
        mv.lines[1].label = String::new();
        let issues = validate_move(&mv);
        assert!(issues.iter().any(|i| i.message.contains("no account")));
        assert!(issues.iter().any(|i| i.message.contains("no label")));
    }

    #[test]
    fn test_both_sides_on_one_line() {
        let mut mv = balanced_move();
        mv.lines[0].credit = Decimal::new(1, 2);
        mv.lines[1].credit = Decimal::new(11999, 2);
        let issues = validate_move(&mv);
        assert!(issues
            .iter()
            .any(|i| i.message.contains("both debit and credit")));
    }

    #[test]
    fn test_unbalanced_move_reports_both_totals() {
        let key = MoveKey {
            journal_code: "VT".to_string(),
            move_id: "VT-1".to_string(),
        };
        let mv = JournalMove::new(key, line("411000", "lonely debit", 10000, 0));
        let issues = validate_move(&mv);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("unbalanced"));
        assert!(issues[0].message.contains("100.00"));
        assert!(issues[0].message.contains("0"));
    }

    #[test]
    fn test_one_cent_imbalance_is_tolerated() {
        let mut mv = balanced_move();
        mv.lines[1].credit = Decimal::new(11999, 2);
        assert!(validate_move(&mv).is_empty());
    }

    #[test]
    fn test_validate_all_concatenates() {
        let mut bad = balanced_move();
        bad.key.move_id = "/".to_string();
        let issues = validate_all(&[balanced_move(), bad]);
        assert_eq!(issues.len(), 1);
    }
}
