//! Core engine types: players, RNG, identifiers, configuration.
//!
//! This module contains the fundamental building blocks that are game-agnostic.
//! Games configure these via `GameConfig` rather than modifying the core.

pub mod player;
pub mod rng;
pub mod config;

pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::GameRng;
pub use config::{
    CellId, CounterConfig, GameConfig, Piece, PieceConfig, PieceKind, PoolConfig, PoolId,
};
