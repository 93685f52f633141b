//! # rust-boardgame
//!
//! A generic two-player board engine with exactly reversible moves, plus an
//! alpha-beta search driver that plays on it.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: No hardcoded boards, pieces or rules. Games supply
//!    a `Topology`, a `GameConfig` and a `GameRules` implementation.
//!
//! 2. **Reversible by Construction**: Every mutation is journaled, so
//!    `unexecute` restores the previous position bit for bit, and the
//!    position digest proves it.
//!
//! 3. **Configuration Over Convention**: Pools, counters, stack heights and
//!    digest membership are declared in `GameConfig`; search behaviour in
//!    `SearchConfig`.
//!
//! ## Architecture
//!
//! - **Position Digest**: A 64-bit fingerprint of everything that affects
//!   play and nothing else. Used for transposition lookups, repetition
//!   detection and undo verification.
//!
//! - **Persistent Journal**: The undo journal lives in an `im` vector so a
//!   board clone for a search thread is cheap.
//!
//! - **Explicit Phases**: `BoardPhase` drives which operations are legal;
//!   pick/drop/done compose into a move, and a `move` operation runs the
//!   whole sequence at once.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, identifiers, game configuration
//! - `topology`: Square and hex cell graphs
//! - `moves`: Move records, their text form, transcripts
//! - `rules`: The `GameRules` trait games implement
//! - `board`: Board state, journal, digest, repetition tracking
//! - `search`: Negamax alpha-beta driver
//! - `robot`: Background move selection and strength presets
//! - `games`: Reference games (tic-tac-toe, hasami)

pub mod board;
pub mod core;
pub mod error;
pub mod games;
pub mod moves;
pub mod robot;
pub mod rules;
pub mod search;
pub mod topology;

// Re-export commonly used types
pub use crate::core::{
    CellId, CounterConfig, GameConfig, GameRng, Piece, PieceConfig, PieceKind,
    PlayerId, PlayerMap, PoolConfig, PoolId, PLAYER_COUNT,
};

pub use crate::topology::{Coord, Direction, HexGrid, SquareGrid, Topology};

pub use crate::moves::{Location, MoveRecord, OpCode, Transcript};

pub use crate::rules::{GameResult, GameRules};

pub use crate::board::{Board, BoardPhase, DigestTable, RepetitionTracker};

pub use crate::search::{
    Evaluator, RulesEvaluator, SearchConfig, SearchDriver, SearchResult, SearchStats, StopFlag,
    TranspositionTable, MAX_PLY, WIN_VALUE,
};

pub use crate::robot::{RobotController, RobotLevel};

pub use crate::error::{MoveParseError, ReplayError, ReplayResult};
