//! Import and export job orchestration
//!
//! A job is a single-threaded, synchronous batch over one in-memory
//! buffer: the whole buffer is decoded and scanned before any result is
//! returned, and there is no cancellation mid-file. Jobs own every raw
//! record, entry line and assembled move for their duration; accepted
//! moves cross the [`LedgerStore`] boundary as one atomic write each.
//!
//! State machines:
//!
//! ```text
//! import:  NotStarted -> Scanning -> (Success | PartialSuccess | Failed)
//! export:  NotStarted -> ComplianceChecked -> Success
//!                     \-> Failed              (zero bytes produced)
//! ```
//!
//! An import reaches `Failed` only when zero lines produced an accepted
//! entry. An export refuses to emit a single byte unless every move in
//! scope passes compliance.

use crate::core::assembler::MoveAssembler;
use crate::core::compliance::{self, CompliancePolicy};
use crate::core::store::{CompanyProfile, LedgerStore};
use crate::io::{
    decode_with, fec_filename, fec_format, fec_writer, ximport_format, ximport_writer,
    FEC_ENCODINGS, XIMPORT_ENCODINGS, XIMPORT_FILENAME,
};
use crate::types::{
    ComplianceIssue, ExchangeError, ExportArtifact, ImportResult, JobState, JournalMove,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Which wire format a job reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// The delimited regulatory export
    Fec,
    /// The fixed-width legacy interchange format
    Ximport,
}

/// One import run: decode, scan, assemble, check, persist
pub struct ImportJob<'a, S: LedgerStore> {
    store: &'a mut S,
    company: &'a CompanyProfile,
    format: WireFormat,
    policy: CompliancePolicy,
    state: JobState,
}

impl<'a, S: LedgerStore> ImportJob<'a, S> {
    pub fn new(store: &'a mut S, company: &'a CompanyProfile, format: WireFormat) -> Self {
        ImportJob {
            store,
            company,
            format,
            policy: CompliancePolicy::Advisory,
            state: JobState::NotStarted,
        }
    }

    /// Override the default advisory compliance policy
    pub fn with_policy(mut self, policy: CompliancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Lifecycle state: `NotStarted` until [`run`](ImportJob::run) begins
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Run the job over one raw file buffer
    ///
    /// Only a decode failure is fatal; every line- and move-level problem
    /// is collected into the result. Foreign currency codes are resolved
    /// through the store and unknown ones are recorded as move-level
    /// issues. Moves that survive validation and (under a strict policy)
    /// compliance are handed to the store; the result reports exactly the
    /// moves that were persisted.
    pub fn run(mut self, bytes: &[u8]) -> Result<ImportResult, ExchangeError> {
        self.state = JobState::Scanning;
        debug!(state = ?self.state, format = ?self.format, size = bytes.len(), "import scanning started");
        let text = match self.format {
            WireFormat::Fec => decode_with(FEC_ENCODINGS, bytes)?,
            WireFormat::Ximport => decode_with(XIMPORT_ENCODINGS, bytes)?,
        };
        let mut outcome = match self.format {
            WireFormat::Fec => fec_format::scan(&text),
            WireFormat::Ximport => ximport_format::scan(&text),
        };

        // The foreign-currency pair only means something when it differs
        // from the company currency.
        for line in &mut outcome.accepted {
            if line.currency_code == self.company.currency {
                line.currency_code.clear();
                line.currency_amount = rust_decimal::Decimal::ZERO;
            }
        }

        let accepted_count = outcome.accepted.len() as u64;
        let mut issues: Vec<ComplianceIssue> = Vec::with_capacity(outcome.errors.len());
        for error in &outcome.errors {
            warn!(%error, "line rejected");
            issues.push(ComplianceIssue::for_line(error));
        }

        let mut assembler = MoveAssembler::new();
        for line in outcome.accepted {
            assembler.push(line);
        }

        let mut kept = Vec::new();
        for mv in assembler.into_moves() {
            let mut move_issues = compliance::validate_move(&mv);
            for line in &mv.lines {
                if !line.currency_code.is_empty()
                    && self.store.find_currency(&line.currency_code).is_none()
                {
                    move_issues.push(ComplianceIssue::for_move(
                        &mv.key,
                        format!("unknown currency '{}'", line.currency_code),
                    ));
                }
            }
            let compliant = move_issues.is_empty();
            issues.extend(move_issues);
            if compliant || self.policy == CompliancePolicy::Advisory {
                kept.push(mv);
            } else {
                warn!(key = %mv.key, "move excluded by strict compliance policy");
            }
        }

        let mut persisted = Vec::new();
        for mv in kept {
            match self.persist(mv) {
                Ok(mv) => persisted.push(mv),
                Err((key, error)) => {
                    warn!(%error, key = %key, "move not persisted");
                    issues.push(ComplianceIssue::for_move(&key, error.to_string()));
                }
            }
        }

        self.state = if accepted_count == 0 {
            JobState::Failed
        } else if issues.is_empty() {
            JobState::Success
        } else {
            JobState::PartialSuccess
        };
        info!(
            state = ?self.state,
            total = outcome.total_lines,
            accepted = accepted_count,
            errors = issues.len(),
            "import finished"
        );
        Ok(ImportResult {
            state: self.state,
            total_lines: outcome.total_lines,
            accepted_count,
            skipped_count: outcome.skipped,
            issues,
            moves: persisted,
        })
    }

    /// Hand one move to the store, registering its accounts and partners
    fn persist(&mut self, mv: JournalMove) -> Result<JournalMove, (crate::types::MoveKey, ExchangeError)> {
        if self.store.find_journal(&mv.key.journal_code).is_none() {
            return Err((
                mv.key.clone(),
                ExchangeError::unknown_journal(&mv.key.journal_code),
            ));
        }
        for line in &mv.lines {
            self.store
                .find_or_create_account(&line.account_code, &line.account_label);
            self.store
                .find_or_create_partner(&line.partner_ref, &line.partner_label);
        }
        let key = mv.key.clone();
        self.store
            .create_move(mv.clone())
            .map_err(|e| (key, e))
            .map(|_| mv)
    }
}

/// One export run: query, gate on compliance, serialize
pub struct ExportJob<'a, S: LedgerStore> {
    store: &'a mut S,
    company: &'a CompanyProfile,
    format: WireFormat,
    from: NaiveDate,
    to: NaiveDate,
    state: JobState,
}

impl<'a, S: LedgerStore> ExportJob<'a, S> {
    pub fn new(
        store: &'a mut S,
        company: &'a CompanyProfile,
        format: WireFormat,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Self {
        ExportJob {
            store,
            company,
            format,
            from,
            to,
            state: JobState::NotStarted,
        }
    }

    /// Lifecycle state: `ComplianceChecked` is entered only when every
    /// move in scope passed validation
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Run the export over the posted moves of the period
    ///
    /// Fatal errors: an empty period ([`ExchangeError::EmptyResult`]) and
    /// a move that has already left through an export
    /// ([`ExchangeError::ImmutableMove`]). Compliance violations are not
    /// errors but a `Failed` artifact carrying the issues and zero bytes:
    /// a non-compliant regulatory file is never produced, even partially.
    pub fn run(mut self) -> Result<ExportArtifact, ExchangeError> {
        let moves = self.store.query_posted_moves(self.from, self.to);
        if moves.is_empty() {
            return Err(ExchangeError::EmptyResult);
        }
        for mv in &moves {
            if self.store.is_exported(&mv.key) {
                return Err(ExchangeError::immutable_move(&mv.key));
            }
        }

        let issues = compliance::validate_all(&moves);
        if !issues.is_empty() {
            self.state = JobState::Failed;
            warn!(count = issues.len(), "export refused by compliance validator");
            return Ok(ExportArtifact {
                state: self.state,
                filename: String::new(),
                payload: Vec::new(),
                move_count: 0,
                issues,
            });
        }
        self.state = JobState::ComplianceChecked;
        debug!(state = ?self.state, moves = moves.len(), "generating payload");

        let (payload, filename) = match self.format {
            WireFormat::Fec => (
                fec_writer::generate(&moves)?,
                fec_filename(&self.company.registry_id, self.to),
            ),
            WireFormat::Ximport => (
                ximport_writer::generate(&moves),
                XIMPORT_FILENAME.to_string(),
            ),
        };
        for mv in &moves {
            self.store.mark_exported(&mv.key);
        }
        self.state = JobState::Success;
        info!(%filename, bytes = payload.len(), "export finished");
        Ok(ExportArtifact {
            state: self.state,
            filename,
            payload,
            move_count: moves.len() as u64,
            issues: Vec::new(),
        })
    }
}
