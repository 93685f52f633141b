//! Transposition table keyed by position digest.
//!
//! Only exact values are stored, so a hit can be returned as-is when its
//! depth suffices. Win/loss scores are kept relative to the node they were
//! found at and shifted by ply on the way in and out.

use rustc_hash::FxHashMap;

use super::driver::is_decided;
use crate::moves::MoveRecord;

/// One cached result.
#[derive(Clone, Debug)]
pub struct TranspositionEntry {
    pub best_move: Option<MoveRecord>,
    /// Exact value, relative to the node.
    pub value: f64,
    /// Remaining depth the value was searched to.
    pub depth: u32,
}

/// Digest → entry map with a size cap.
#[derive(Clone, Debug, Default)]
pub struct TranspositionTable {
    entries: FxHashMap<u64, TranspositionEntry>,
    capacity: usize,
}

impl TranspositionTable {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            capacity,
        }
    }

    #[must_use]
    pub fn get(&self, digest: u64) -> Option<&TranspositionEntry> {
        self.entries.get(&digest)
    }

    /// Value of an entry as seen from a node at `ply`.
    #[must_use]
    pub fn value_at(entry: &TranspositionEntry, ply: u32) -> f64 {
        if is_decided(entry.value) {
            entry.value - entry.value.signum() * f64::from(ply)
        } else {
            entry.value
        }
    }

    /// Store an exact value found at `ply`. Deeper entries are kept.
    pub fn store(
        &mut self,
        digest: u64,
        value: f64,
        depth: u32,
        ply: u32,
        best_move: Option<MoveRecord>,
    ) {
        if let Some(existing) = self.entries.get(&digest) {
            if existing.depth > depth {
                return;
            }
        } else if self.entries.len() >= self.capacity {
            return;
        }
        let value = if is_decided(value) {
            value + value.signum() * f64::from(ply)
        } else {
            value
        };
        self.entries.insert(
            digest,
            TranspositionEntry {
                best_move,
                value,
                depth,
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
