//! Encoding resolver
//!
//! Input files arrive from uncontrolled third-party accounting software,
//! so every buffer is decoded by trying an ordered candidate list and
//! keeping the first encoding that accepts the whole buffer without
//! replacement. The two wire formats carry different defaults: FEC files
//! are UTF-8 first with a Latin-9 fallback, XIMPORT files default to
//! Windows-1252.

use crate::types::ExchangeError;
use encoding_rs::{Encoding, ISO_8859_15, UTF_8, WINDOWS_1252};

/// Candidate encodings for the FEC delimited format, in decode order
pub const FEC_ENCODINGS: &[&Encoding] = &[UTF_8, ISO_8859_15];

/// Candidate encodings for the XIMPORT fixed-width format, in decode order
pub const XIMPORT_ENCODINGS: &[&Encoding] = &[WINDOWS_1252, UTF_8, ISO_8859_15];

/// Decode a raw buffer with the first candidate that accepts it strictly
///
/// A decode is rejected as soon as it would require a replacement
/// character. A leading UTF-8 BOM is stripped from the decoded text.
/// Fails with [`ExchangeError::Decode`] only when every candidate fails,
/// which with a single-byte candidate in the list is effectively limited
/// to pathological inputs.
pub fn decode_with(
    candidates: &'static [&'static Encoding],
    bytes: &[u8],
) -> Result<String, ExchangeError> {
    for encoding in candidates {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            let text = text.into_owned();
            return Ok(text.strip_prefix('\u{feff}').map(str::to_owned).unwrap_or(text));
        }
    }
    Err(ExchangeError::decode(candidates))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii_decodes_as_utf8() {
        let text = decode_with(FEC_ENCODINGS, b"VT|Ventes|1").unwrap();
        assert_eq!(text, "VT|Ventes|1");
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin9() {
        // 0xE9 is 'é' in ISO-8859-15 but an invalid UTF-8 sequence
        let bytes = b"Op\xE9rations diverses";
        let text = decode_with(FEC_ENCODINGS, bytes).unwrap();
        assert_eq!(text, "Opérations diverses");
    }

    #[test]
    fn test_ximport_prefers_windows_1252() {
        // 0x80 is '€' in Windows-1252
        let bytes = b"Solde \x80";
        let text = decode_with(XIMPORT_ENCODINGS, bytes).unwrap();
        assert_eq!(text, "Solde €");
    }

    #[test]
    fn test_valid_utf8_with_accents_survives() {
        let bytes = "Écritures clôturées".as_bytes();
        let text = decode_with(FEC_ENCODINGS, bytes).unwrap();
        assert_eq!(text, "Écritures clôturées");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"JournalCode|JournalLib");
        let text = decode_with(FEC_ENCODINGS, &bytes).unwrap();
        assert!(text.starts_with("JournalCode"));
    }
}
