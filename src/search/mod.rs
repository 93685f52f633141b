//! Alpha-beta search over the board engine.
//!
//! - `SearchDriver`: negamax with fail-hard bounds, iterative deepening,
//!   transposition table, killer moves and optional null-move pruning
//! - `SearchConfig`: knobs, all with conservative defaults
//! - `Evaluator`: leaf scoring, `GameRules::evaluate` unless overridden
//! - `StopFlag`: cooperative cancellation shared with other threads

pub mod config;
pub mod driver;
pub mod evaluator;
pub mod node;
pub mod ordering;
pub mod stats;
pub mod stop;
pub mod transposition;

pub use config::SearchConfig;
pub use driver::{is_decided, RootMove, SearchDriver, SearchResult, MAX_PLY, WIN_VALUE};
pub use evaluator::{Evaluator, RulesEvaluator};
pub use node::{NodeId, SearchNode, Variation};
pub use ordering::KillerTable;
pub use stats::SearchStats;
pub use stop::StopFlag;
pub use transposition::{TranspositionEntry, TranspositionTable};
