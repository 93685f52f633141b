//! Robot strength presets.
//!
//! | Level  | Depth | Time/move | Random top moves       |
//! |--------|-------|-----------|------------------------|
//! | Easy   | 2     | 0.5s      | 3 within 25, fading    |
//! | Medium | 4     | 1.5s      | 2 within 5, fading     |
//! | Hard   | 6     | 3.0s      | none                   |
//!
//! Deeper levels add iterative deepening, null-move pruning and
//! principal-variation reuse, so the time limit rather than the depth is
//! what usually ends a Hard search.

use serde::{Deserialize, Serialize};

use crate::search::SearchConfig;

/// Preset search strength.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum RobotLevel {
    /// Shallow and deliberately loose. Misses two-move tactics.
    Easy,
    #[default]
    Medium,
    /// Full strength within its time budget.
    Hard,
}

impl RobotLevel {
    pub const ALL: [RobotLevel; 3] = [RobotLevel::Easy, RobotLevel::Medium, RobotLevel::Hard];

    /// Thinking time per move in milliseconds.
    #[must_use]
    pub const fn time_limit_ms(self) -> u64 {
        match self {
            RobotLevel::Easy => 500,
            RobotLevel::Medium => 1500,
            RobotLevel::Hard => 3000,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            RobotLevel::Easy => "easy (depth 2, playful)",
            RobotLevel::Medium => "medium (depth 4)",
            RobotLevel::Hard => "hard (depth 6, full pruning)",
        }
    }

    /// Search settings for this level, seeded with `seed`.
    #[must_use]
    pub fn config(self, seed: u64) -> SearchConfig {
        let base = SearchConfig::default()
            .with_seed(seed)
            .with_time_limit_ms(self.time_limit_ms());
        match self {
            RobotLevel::Easy => base
                .with_depth(2)
                .with_randomization(3, 25.0)
                .with_random_decay(12),
            RobotLevel::Medium => base
                .with_depth(4)
                .with_iterative_deepening(true)
                .with_randomization(2, 5.0)
                .with_random_decay(8),
            RobotLevel::Hard => base
                .with_depth(6)
                .with_iterative_deepening(true)
                .with_null_move(true)
                .with_null_move_pruning(true)
                .with_pv_reuse(true),
        }
    }
}

impl std::fmt::Display for RobotLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
