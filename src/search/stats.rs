//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes entered (including leaves).
    pub nodes: u64,

    /// Leaf evaluations.
    pub evaluations: u64,

    /// Beta cutoffs.
    pub cutoffs: u64,

    /// Transposition probes and hits.
    pub tt_probes: u64,
    pub tt_hits: u64,

    /// Interior nodes pruned by a null move.
    pub null_prunes: u64,

    /// Nodes scored as repetitions of the search path.
    pub repetitions: u64,

    /// Deepest fully completed iteration.
    pub completed_depth: u32,

    /// Search stopped before completing.
    pub interrupted: bool,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate nodes per second.
    #[must_use]
    pub fn nodes_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.nodes as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Fraction of transposition probes that hit.
    #[must_use]
    pub fn tt_hit_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_hits as f64 / self.tt_probes as f64
        }
    }
}
