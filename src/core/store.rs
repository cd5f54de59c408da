//! Ledger-store collaborator interface
//!
//! The codec never persists anything itself: accepted moves cross this
//! boundary as one atomic write each, and the export direction reads
//! canonical moves back through it. Modelling the store as a trait keeps
//! the codec compilable and testable without any persistence layer; the
//! bundled [`MemoryStore`] backs the test suite and the CLI.

use crate::types::{ExchangeError, JournalMove, MoveKey};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Reference to a journal known to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalRef {
    pub code: String,
    pub label: String,
}

/// Reference to an account, created on first sight during import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRef {
    pub code: String,
    pub label: String,
}

/// Reference to a partner, created on first sight during import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerRef {
    pub reference: String,
    pub name: String,
}

/// Reference to a currency known to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyRef {
    pub code: String,
}

/// Handle to a persisted move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRef {
    pub key: MoveKey,
}

/// Company metadata consumed by the codec
///
/// The registry identifier feeds the regulatory filename; the default
/// currency decides whether a line's foreign-currency pair is kept.
#[derive(Debug, Clone)]
pub struct CompanyProfile {
    /// Company registry identifier (SIREN), formatting-tolerant
    pub registry_id: String,
    /// Default ledger currency code, e.g. "EUR"
    pub currency: String,
}

/// The external ledger store, as seen from the codec
///
/// Implementations own accounts, partners, currencies and journals. The
/// codec guarantees it never calls `create_move` twice with the same key
/// within one job, so a store can rely on at-most-one-writer-per-move.
pub trait LedgerStore {
    /// Look up a journal by its short code
    fn find_journal(&self, code: &str) -> Option<JournalRef>;

    /// Look up an account, creating it when unknown
    fn find_or_create_account(&mut self, code: &str, label: &str) -> AccountRef;

    /// Look up a partner, creating it when a reference is given
    fn find_or_create_partner(&mut self, reference: &str, name: &str) -> Option<PartnerRef>;

    /// Look up a currency by its code
    fn find_currency(&self, code: &str) -> Option<CurrencyRef>;

    /// Persist one move as a single atomic write
    fn create_move(&mut self, mv: JournalMove) -> Result<MoveRef, ExchangeError>;

    /// Canonical posted moves for an export period, in posting order
    fn query_posted_moves(&self, from: NaiveDate, to: NaiveDate) -> Vec<JournalMove>;

    /// Whether a move has already been exported (and is thus immutable)
    fn is_exported(&self, key: &MoveKey) -> bool;

    /// Record that a move left through an export
    fn mark_exported(&mut self, key: &MoveKey);
}

/// In-memory ledger store
///
/// Strict by default: journals and currencies must be registered up
/// front; unknown journal codes surface as
/// [`ExchangeError::UnknownJournal`]. The permissive variant synthesizes
/// journals and currencies on demand, which is what the CLI wants when
/// inspecting arbitrary third-party files.
#[derive(Debug, Default)]
pub struct MemoryStore {
    journals: HashMap<String, JournalRef>,
    accounts: HashMap<String, AccountRef>,
    partners: HashMap<String, PartnerRef>,
    currencies: HashSet<String>,
    moves: Vec<JournalMove>,
    exported: HashSet<MoveKey>,
    auto_register: bool,
}

impl MemoryStore {
    /// Empty strict store
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Store that accepts any journal or currency code it sees
    pub fn permissive() -> Self {
        MemoryStore {
            auto_register: true,
            ..MemoryStore::default()
        }
    }

    /// Register a journal
    pub fn add_journal(&mut self, code: &str, label: &str) {
        self.journals.insert(
            code.to_string(),
            JournalRef {
                code: code.to_string(),
                label: label.to_string(),
            },
        );
    }

    /// Register a currency
    pub fn add_currency(&mut self, code: &str) {
        self.currencies.insert(code.to_string());
    }

    /// All persisted moves, in posting order
    pub fn moves(&self) -> &[JournalMove] {
        &self.moves
    }
}

impl LedgerStore for MemoryStore {
    fn find_journal(&self, code: &str) -> Option<JournalRef> {
        if let Some(journal) = self.journals.get(code) {
            return Some(journal.clone());
        }
        if self.auto_register && !code.is_empty() {
            return Some(JournalRef {
                code: code.to_string(),
                label: String::new(),
            });
        }
        None
    }

    fn find_or_create_account(&mut self, code: &str, label: &str) -> AccountRef {
        self.accounts
            .entry(code.to_string())
            .or_insert_with(|| AccountRef {
                code: code.to_string(),
                label: label.to_string(),
            })
            .clone()
    }

    fn find_or_create_partner(&mut self, reference: &str, name: &str) -> Option<PartnerRef> {
        if reference.is_empty() {
            return None;
        }
        Some(
            self.partners
                .entry(reference.to_string())
                .or_insert_with(|| PartnerRef {
                    reference: reference.to_string(),
                    name: name.to_string(),
                })
                .clone(),
        )
    }

    fn find_currency(&self, code: &str) -> Option<CurrencyRef> {
        if self.currencies.contains(code) || (self.auto_register && !code.is_empty()) {
            return Some(CurrencyRef {
                code: code.to_string(),
            });
        }
        None
    }

    fn create_move(&mut self, mv: JournalMove) -> Result<MoveRef, ExchangeError> {
        if self.find_journal(&mv.key.journal_code).is_none() {
            return Err(ExchangeError::unknown_journal(&mv.key.journal_code));
        }
        let key = mv.key.clone();
        self.moves.push(mv);
        Ok(MoveRef { key })
    }

    fn query_posted_moves(&self, from: NaiveDate, to: NaiveDate) -> Vec<JournalMove> {
        self.moves
            .iter()
            .filter(|mv| {
                mv.lines
                    .first()
                    .map(|l| l.date >= from && l.date <= to)
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    fn is_exported(&self, key: &MoveKey) -> bool {
        self.exported.contains(key)
    }

    fn mark_exported(&mut self, key: &MoveKey) {
        self.exported.insert(key.clone());
    }
}
