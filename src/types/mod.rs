//! Types module
//!
//! Contains core data structures used throughout the engine:
//! - `entry`: the canonical journal representation (EntryLine, JournalMove)
//! - `error`: fatal errors and collected compliance issues
//! - `report`: job-level result objects

pub mod entry;
pub mod error;
pub mod report;

pub use entry::{EntryLine, JournalMove, MoveKey, Sense};
pub use error::{ComplianceIssue, ExchangeError, IssueScope};
pub use report::{ExportArtifact, ImportResult, JobState};
