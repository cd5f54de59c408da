//! I/O module: wire-format codecs
//!
//! Handles both wire formats at the byte level:
//!
//! - `encoding` - candidate-list encoding resolver
//! - `scalar` - shared date and amount parsers
//! - `fec_format` / `fec_writer` - the delimited regulatory format
//! - `ximport_format` / `ximport_writer` - the fixed-width legacy format
//!
//! Readers scan a whole decoded buffer and report a [`ScanOutcome`]:
//! accepted typed lines plus collected per-line errors. No line-level
//! failure ever aborts a scan.

pub mod encoding;
pub mod fec_format;
pub mod fec_writer;
pub mod scalar;
pub mod ximport_format;
pub mod ximport_writer;

use crate::types::{EntryLine, ExchangeError};

pub use encoding::{decode_with, FEC_ENCODINGS, XIMPORT_ENCODINGS};
pub use fec_writer::fec_filename;
pub use ximport_writer::XIMPORT_FILENAME;

/// Result of scanning one decoded buffer
///
/// Counts cover every physical line: `total_lines = accepted + skipped +
/// errors` holds for both formats.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Physical lines seen
    pub total_lines: u64,
    /// Lines ignored by design (header row, comments, move headers)
    pub skipped: u64,
    /// Lines that validated into a typed entry
    pub accepted: Vec<EntryLine>,
    /// Collected line-level errors, in scan order
    pub errors: Vec<ExchangeError>,
}
