//! Move assembler
//!
//! Groups accepted entry lines into journal moves keyed by
//! (journal code, move identifier), with the entry date standing in when
//! the file carries no identifier. Keys keep first-seen order and lines
//! keep file order, so a re-serialized file reads in the same sequence as
//! its source. A key exists only once its first line has been seen; a
//! zero-line move cannot be produced.

use crate::types::{EntryLine, JournalMove, MoveKey};
use std::collections::HashMap;

/// Accumulates entry lines into moves during one import job
#[derive(Debug, Default)]
pub struct MoveAssembler {
    order: Vec<MoveKey>,
    moves: HashMap<MoveKey, JournalMove>,
}

impl MoveAssembler {
    pub fn new() -> Self {
        MoveAssembler::default()
    }

    /// Add one accepted line to its move, creating the move on first sight
    pub fn push(&mut self, line: EntryLine) {
        let key = MoveKey::for_line(&line);
        match self.moves.get_mut(&key) {
            Some(mv) => mv.push(line),
            None => {
                self.order.push(key.clone());
                self.moves.insert(key.clone(), JournalMove::new(key, line));
            }
        }
    }

    /// Finish assembly, yielding moves in first-seen key order
    ///
    /// Each key appears exactly once, which is the at-most-one-writer
    /// guarantee the ledger store relies on.
    pub fn into_moves(mut self) -> Vec<JournalMove> {
        self.order
            .into_iter()
            .filter_map(|key| self.moves.remove(&key))
            .collect()
    }
}
