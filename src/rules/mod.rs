//! Rules trait for game implementations.
//!
//! Games implement `GameRules` to define:
//! - The board geometry and piece configuration
//! - Which complete moves are legal for the side to move
//! - Captures caused by a placement
//! - Win/draw conditions and a static evaluation
//!
//! The board engine calls into `GameRules` but never interprets
//! game-specific concepts directly.

pub mod engine;

pub use engine::{GameResult, GameRules};
