//! Tic-tac-toe.
//!
//! - 3×3 square grid, one piece per cell
//! - Each player places from an inexhaustible pool (`#0` for X, `#1` for O)
//! - Three in a row wins; a full board is a draw

mod game;

pub use game::TicTacToe;
