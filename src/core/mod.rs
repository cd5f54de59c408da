//! Core business logic module
//!
//! - `assembler` - groups accepted lines into journal moves
//! - `compliance` - move-level bookkeeping invariants
//! - `store` - ledger-store collaborator trait and in-memory implementation
//! - `job` - import/export orchestration and state machine

pub mod assembler;
pub mod compliance;
pub mod job;
pub mod store;

pub use assembler::MoveAssembler;
pub use compliance::{balance_epsilon, validate_all, validate_move, CompliancePolicy};
pub use job::{ExportJob, ImportJob, WireFormat};
pub use store::{
    AccountRef, CompanyProfile, CurrencyRef, JournalRef, LedgerStore, MemoryStore, MoveRef,
    PartnerRef,
};
