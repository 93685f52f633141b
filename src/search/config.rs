//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// Alpha-beta search configuration.
///
/// Every enhancement can be toggled on its own; with all of them off the
/// driver is a plain fixed-depth negamax.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum search depth in plies.
    pub depth: u32,

    /// Search depths 1..=depth in turn, reordering the root each time.
    pub iterative_deepening: bool,

    /// Probe and store a transposition table keyed by digest.
    pub use_transposition: bool,

    /// Entry cap of the transposition table.
    pub transposition_capacity: usize,

    /// Calibrate width limits with a null-move search at the root.
    pub use_null_move: bool,

    /// Prune interior nodes whose null-move result already reaches beta.
    pub null_move_pruning: bool,

    /// Depth reduction of null-move searches.
    pub null_move_reduction: u32,

    /// Minimum remaining depth for interior null-move pruning.
    pub null_move_min_depth: u32,

    /// Null-move swing at or above which the position is "serious".
    pub serious_swing: f64,

    /// Null-move swing at or below which the position is "casual".
    pub casual_swing: f64,

    /// Width multiplier for serious positions.
    pub serious_factor: f64,

    /// Width multiplier for casual positions.
    pub casual_factor: f64,

    /// Retry moves that caused cutoffs at the same ply first.
    pub use_killers: bool,

    /// Order children by their static evaluation (make/eval/unmake).
    pub static_ordering: bool,

    /// Moves examined per ply; plies past the end are unlimited.
    /// Empty means no width limit.
    pub widths: Vec<usize>,

    /// Choose among this many top moves (1 = always the best).
    pub random_top_n: usize,

    /// How far below the best a move may score and still be chosen.
    pub random_tolerance: f64,

    /// `random_top_n` shrinks by one every this many turns (0 = never).
    pub random_decay_turns: u32,

    /// Answer a predicted position with the previous principal variation.
    pub use_pv_reuse: bool,

    /// Stop the root as soon as a move scores at least this much.
    pub good_enough: Option<f64>,

    /// Node budget.
    pub node_limit: Option<u64>,

    /// Wall-clock budget in milliseconds.
    pub time_limit_ms: Option<u64>,

    /// Value of positions repeated on the search path.
    pub draw_value: f64,

    /// Check execute/unexecute round trips at every node (slow).
    pub verify_digests: bool,

    /// Seed of the randomized move choice.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            iterative_deepening: false,
            use_transposition: true,
            transposition_capacity: 1 << 20,
            use_null_move: false,
            null_move_pruning: false,
            null_move_reduction: 2,
            null_move_min_depth: 3,
            serious_swing: 50.0,
            casual_swing: 5.0,
            serious_factor: 1.5,
            casual_factor: 0.75,
            use_killers: true,
            static_ordering: false,
            widths: Vec::new(),
            random_top_n: 1,
            random_tolerance: 0.0,
            random_decay_turns: 0,
            use_pv_reuse: false,
            good_enough: None,
            node_limit: None,
            time_limit_ms: None,
            draw_value: 0.0,
            verify_digests: false,
            seed: 42,
        }
    }
}

impl SearchConfig {
    /// Create a new config with custom depth.
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        assert!(depth > 0, "Search depth must be at least 1");
        self.depth = depth;
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_iterative_deepening(mut self, enabled: bool) -> Self {
        self.iterative_deepening = enabled;
        self
    }

    #[must_use]
    pub fn with_transposition(mut self, enabled: bool) -> Self {
        self.use_transposition = enabled;
        self
    }

    #[must_use]
    pub fn with_null_move(mut self, enabled: bool) -> Self {
        self.use_null_move = enabled;
        self
    }

    #[must_use]
    pub fn with_null_move_pruning(mut self, enabled: bool) -> Self {
        self.null_move_pruning = enabled;
        self
    }

    #[must_use]
    pub fn with_killers(mut self, enabled: bool) -> Self {
        self.use_killers = enabled;
        self
    }

    #[must_use]
    pub fn with_static_ordering(mut self, enabled: bool) -> Self {
        self.static_ordering = enabled;
        self
    }

    #[must_use]
    pub fn with_widths(mut self, widths: Vec<usize>) -> Self {
        self.widths = widths;
        self
    }

    /// Pick randomly among the best `top_n` moves within `tolerance`.
    #[must_use]
    pub fn with_randomization(mut self, top_n: usize, tolerance: f64) -> Self {
        self.random_top_n = top_n.max(1);
        self.random_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_random_decay(mut self, turns: u32) -> Self {
        self.random_decay_turns = turns;
        self
    }

    #[must_use]
    pub fn with_pv_reuse(mut self, enabled: bool) -> Self {
        self.use_pv_reuse = enabled;
        self
    }

    #[must_use]
    pub fn with_good_enough(mut self, value: f64) -> Self {
        self.good_enough = Some(value);
        self
    }

    #[must_use]
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    #[must_use]
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn with_draw_value(mut self, value: f64) -> Self {
        self.draw_value = value;
        self
    }

    #[must_use]
    pub fn with_verify_digests(mut self, enabled: bool) -> Self {
        self.verify_digests = enabled;
        self
    }

    /// Width allowed at `ply`, scaled by the seriousness factor.
    #[must_use]
    pub fn width_at(&self, ply: usize, factor: f64) -> Option<usize> {
        self.widths
            .get(ply)
            .map(|&w| ((w as f64 * factor).round() as usize).max(1))
    }

    /// Number of top moves eligible for random choice at `move_number`.
    #[must_use]
    pub fn random_choices(&self, move_number: u32) -> usize {
        let decay = match self.random_decay_turns {
            0 => 0,
            turns => (move_number / turns) as usize,
        };
        self.random_top_n.saturating_sub(decay).max(1)
    }
}
