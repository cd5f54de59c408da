//! Job-level result types
//!
//! A job never surfaces a bare error list to the caller: the outcome is a
//! structured report carrying counts, the terminal state, and every
//! collected issue. The CLI serializes these as JSON with `--json`.

use crate::types::entry::JournalMove;
use crate::types::error::ComplianceIssue;
use serde::Serialize;

/// Terminal and intermediate states of an import/export job
///
/// Imports run `NotStarted -> Scanning -> (Success | PartialSuccess |
/// Failed)`. Exports pass through the additional `ComplianceChecked` gate
/// before any byte is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    NotStarted,
    Scanning,
    ComplianceChecked,
    Success,
    PartialSuccess,
    Failed,
}

/// Outcome of an import job
///
/// `Failed` only when zero lines produced an accepted entry; a file with
/// some bad lines and some good ones is a `PartialSuccess` and the caller
/// decides whether to keep the partial import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    /// Terminal job state
    pub state: JobState,
    /// Physical lines scanned, including skipped and malformed ones
    pub total_lines: u64,
    /// Lines that produced an accepted entry
    pub accepted_count: u64,
    /// Lines ignored by design (headers, comments, move-header records)
    pub skipped_count: u64,
    /// Every collected line- and move-level issue, in scan order
    pub issues: Vec<ComplianceIssue>,
    /// The assembled moves that were handed to the ledger store
    #[serde(skip)]
    pub moves: Vec<JournalMove>,
}

impl ImportResult {
    /// Number of collected issues
    pub fn error_count(&self) -> usize {
        self.issues.len()
    }
}

/// Outcome of an export job
///
/// On `Failed` the payload is empty: a non-compliant regulatory file is
/// never generated, not even partially.
#[derive(Debug, Clone, Serialize)]
pub struct ExportArtifact {
    /// Terminal job state
    pub state: JobState,
    /// Regulatory filename for the payload
    pub filename: String,
    /// Serialized file content in the format's native encoding
    #[serde(skip)]
    pub payload: Vec<u8>,
    /// Number of moves serialized into the payload
    pub move_count: u64,
    /// Compliance issues when the export was refused
    pub issues: Vec<ComplianceIssue>,
}
