//! Reference game implementations.
//!
//! Small games that instantiate the board contract and exercise the
//! search: a placement game from inexhaustible pools and a movement game
//! with captures.

pub mod hasami;
pub mod tictactoe;

pub use hasami::{Hasami, HasamiBuilder};
pub use tictactoe::TicTacToe;
