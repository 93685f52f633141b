//! Hasami shogi on a small board.
//!
//! - Square grid (5×5 by default), each side starts with a full home row
//! - Pieces move like rooks through empty cells
//! - Custodian capture: a line of enemy pieces sandwiched orthogonally
//!   between the moved piece and another friendly piece is removed
//! - Capturing enough pieces, or leaving the opponent without a move, wins
//!
//! Capture tallies are part of the position digest. The per-player
//! "advancement" counter only feeds the evaluator and is not digested.

mod game;

pub use game::{Hasami, HasamiBuilder, ADVANCEMENT};
