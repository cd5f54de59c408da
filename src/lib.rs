//! Ledger Exchange Engine
//!
//! # Overview
//!
//! This library parses two accounting interchange formats into one
//! canonical double-entry journal representation, validates that
//! representation against bookkeeping invariants, and serializes it back
//! into either wire format:
//!
//! - **FEC** - the pipe/tab-delimited regulatory ledger export (18 fixed
//!   columns, regulatory filename convention)
//! - **XIMPORT** - a fixed-width legacy interchange format used by
//!   several third-party accounting packages
//!
//! # Architecture
//!
//! - [`types`] - canonical data types (EntryLine, JournalMove, errors,
//!   job reports)
//! - [`io`] - wire-format codecs: encoding resolver, scalar parsers,
//!   per-format readers and writers
//! - [`core`] - business logic: move assembly, compliance validation,
//!   the ledger-store collaborator boundary, and job orchestration
//! - [`cli`] - command-line argument parsing
//!
//! # Partial-failure semantics
//!
//! Import scanning is line-independent: malformed lines are collected as
//! issues and the rest of the file stays usable. A job fails outright
//! only when the buffer cannot be decoded at all or when zero lines
//! produced an accepted entry. Exports are stricter: a single compliance
//! violation refuses the whole export before any byte is produced.

pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use crate::core::{
    CompanyProfile, CompliancePolicy, ExportJob, ImportJob, LedgerStore, MemoryStore, WireFormat,
};
pub use types::{
    ComplianceIssue, EntryLine, ExchangeError, ExportArtifact, ImportResult, JobState,
    JournalMove, MoveKey, Sense,
};
