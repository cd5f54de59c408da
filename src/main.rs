//! Ledger Exchange CLI
//!
//! Validates FEC / XIMPORT ledger files and converts between the two
//! formats through the compliance pipeline.
//!
//! # Usage
//!
//! ```bash
//! ledger-exchange book.txt                                   # validate a FEC file
//! ledger-exchange book.txt --format ximport                  # validate an XIMPORT file
//! ledger-exchange book.txt --direction export --to ximport   # convert FEC -> XIMPORT
//! ledger-exchange book.txt --direction export \
//!     --registry-id "123 456 789" --closing-date 2024-12-31  # regulatory export
//! ```
//!
//! # Exit codes
//!
//! - 0: success or partial success (per-line issues are reported, not fatal)
//! - 1: fatal error (unreadable file, undecodable buffer, refused export)

use chrono::NaiveDate;
use ledger_exchange::cli::{self, Direction};
use ledger_exchange::{
    CompanyProfile, ExchangeError, ExportJob, ImportJob, ImportResult, JobState, MemoryStore,
};
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &cli::CliArgs) -> Result<(), ExchangeError> {
    let bytes = fs::read(&args.input_file).map_err(|e| ExchangeError::Io {
        message: format!("failed to read '{}': {}", args.input_file.display(), e),
    })?;

    let company = CompanyProfile {
        registry_id: args.registry_id.clone(),
        currency: args.currency.clone(),
    };
    let mut store = MemoryStore::permissive();

    let result = ImportJob::new(&mut store, &company, args.format.into())
        .with_policy(args.policy())
        .run(&bytes)?;
    report_import(args, &result)?;

    if args.direction == Direction::Export && result.state != JobState::Failed {
        let (from, to) = export_period(&result, args.closing_date);
        let artifact =
            ExportJob::new(&mut store, &company, args.output_format(), from, to).run()?;
        if artifact.state == JobState::Failed {
            for issue in &artifact.issues {
                eprintln!("{}: {}", issue.scope, issue.message);
            }
            return Err(ExchangeError::ComplianceFailure {
                count: artifact.issues.len(),
            });
        }
        let path = args.output_dir.join(&artifact.filename);
        fs::write(&path, &artifact.payload)?;
        eprintln!(
            "wrote {} ({} moves, {} bytes)",
            path.display(),
            artifact.move_count,
            artifact.payload.len()
        );
    }

    if result.state == JobState::Failed {
        return Err(ExchangeError::Io {
            message: "no line of the input file could be parsed".to_string(),
        });
    }
    Ok(())
}

/// Period for the export job: the imported moves' date span, with the
/// closing date flag overriding the upper bound (it also names the file).
fn export_period(result: &ImportResult, closing: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let dates = result.moves.iter().flat_map(|m| m.lines.iter().map(|l| l.date));
    let min = dates.clone().min().unwrap_or(NaiveDate::MIN);
    let max = dates.max().unwrap_or(NaiveDate::MAX);
    (min, closing.unwrap_or(max))
}

fn report_import(args: &cli::CliArgs, result: &ImportResult) -> Result<(), ExchangeError> {
    if args.json {
        let json = serde_json::to_string_pretty(result).map_err(|e| ExchangeError::Io {
            message: e.to_string(),
        })?;
        println!("{}", json);
        return Ok(());
    }
    println!(
        "{:?}: {} lines scanned, {} accepted, {} skipped, {} issue(s)",
        result.state,
        result.total_lines,
        result.accepted_count,
        result.skipped_count,
        result.error_count()
    );
    for issue in &result.issues {
        println!("  {}: {}", issue.scope, issue.message);
    }
    Ok(())
}
