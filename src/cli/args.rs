use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::core::{CompliancePolicy, WireFormat};

/// Validate and convert accounting ledger files (FEC / XIMPORT)
#[derive(Parser, Debug)]
#[command(name = "ledger-exchange")]
#[command(about = "Validate and convert accounting ledger files", long_about = None)]
pub struct CliArgs {
    /// Input ledger file
    #[arg(value_name = "INPUT", help = "Path to the input ledger file")]
    pub input_file: PathBuf,

    /// Wire format of the input file
    #[arg(long = "format", value_name = "FORMAT", default_value = "fec")]
    pub format: FormatArg,

    /// What to do with the file
    #[arg(
        long = "direction",
        value_name = "DIRECTION",
        default_value = "import",
        help = "'import' validates and reports; 'export' re-emits through compliance"
    )]
    pub direction: Direction,

    /// Wire format of the generated file (export only)
    #[arg(long = "to", value_name = "FORMAT")]
    pub target_format: Option<FormatArg>,

    /// Company registry identifier (SIREN) for the regulatory filename
    #[arg(long = "registry-id", value_name = "SIREN", default_value = "")]
    pub registry_id: String,

    /// Company ledger currency
    #[arg(long = "currency", value_name = "CODE", default_value = "EUR")]
    pub currency: String,

    /// Closing date of the exported period (YYYY-MM-DD, export only)
    #[arg(long = "closing-date", value_name = "DATE")]
    pub closing_date: Option<NaiveDate>,

    /// Exclude non-compliant moves instead of importing them with warnings
    #[arg(long = "strict")]
    pub strict: bool,

    /// Write the exported payload into this directory
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Emit the job report as JSON on stdout
    #[arg(long = "json")]
    pub json: bool,
}

/// Job direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    /// Parse, validate and report; moves stay in the in-memory store
    Import,
    /// Parse, then re-emit the moves through the export pipeline
    Export,
}

/// Wire format selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Fec,
    Ximport,
}

impl From<FormatArg> for WireFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Fec => WireFormat::Fec,
            FormatArg::Ximport => WireFormat::Ximport,
        }
    }
}

impl CliArgs {
    /// Compliance policy implied by the flags
    pub fn policy(&self) -> CompliancePolicy {
        if self.strict {
            CompliancePolicy::Strict
        } else {
            CompliancePolicy::Advisory
        }
    }

    /// Format to generate on export: `--to` when given, else the input format
    pub fn output_format(&self) -> WireFormat {
        self.target_format.unwrap_or(self.format).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["ledger-exchange", "book.txt"], FormatArg::Fec, Direction::Import)]
    #[case(
        &["ledger-exchange", "book.txt", "--format", "ximport"],
        FormatArg::Ximport,
        Direction::Import
    )]
    #[case(
        &["ledger-exchange", "book.txt", "--direction", "export"],
        FormatArg::Fec,
        Direction::Export
    )]
    fn test_parse_defaults(
        #[case] argv: &[&str],
        #[case] format: FormatArg,
        #[case] direction: Direction,
    ) {
        let args = CliArgs::try_parse_from(argv).unwrap();
        assert_eq!(args.format, format);
        assert_eq!(args.direction, direction);
        assert_eq!(args.currency, "EUR");
    }

    #[test]
    fn test_policy_from_strict_flag() {
        let args = CliArgs::try_parse_from(["ledger-exchange", "f", "--strict"]).unwrap();
        assert_eq!(args.policy(), CompliancePolicy::Strict);
        let args = CliArgs::try_parse_from(["ledger-exchange", "f"]).unwrap();
        assert_eq!(args.policy(), CompliancePolicy::Advisory);
    }

    #[test]
    fn test_output_format_falls_back_to_input_format() {
        let args = CliArgs::try_parse_from(["ledger-exchange", "f", "--format", "ximport"])
            .unwrap();
        assert_eq!(args.output_format(), WireFormat::Ximport);
        let args = CliArgs::try_parse_from([
            "ledger-exchange",
            "f",
            "--format",
            "ximport",
            "--to",
            "fec",
        ])
        .unwrap();
        assert_eq!(args.output_format(), WireFormat::Fec);
    }

    #[test]
    fn test_closing_date_parses_iso() {
        let args = CliArgs::try_parse_from([
            "ledger-exchange",
            "f",
            "--closing-date",
            "2024-12-31",
        ])
        .unwrap();
        assert_eq!(
            args.closing_date,
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
    }

    #[test]
    fn test_missing_input_is_an_error() {
        assert!(CliArgs::try_parse_from(["ledger-exchange"]).is_err());
    }
}
