//! The transactional board engine.
//!
//! ## Board
//!
//! A `Board<G>` holds the piece placement, side to move, phase and a journal
//! of reversible deltas. Every mutation goes through `execute`, which pushes
//! an execute mark, and is reversed by `unexecute`, which pops the journal
//! back to that mark. Boards clone in O(cells) with the journal shared
//! structurally, so the search can work on a private copy.
//!
//! ## Digest
//!
//! `Board::digest` is a 64-bit fingerprint of the logical position, used
//! for undo verification, repetition detection and the transposition table.
//!
//! ## Repetition
//!
//! `RepetitionTracker` counts digests at confirmed turn boundaries of a live
//! game and moves the board to `DrawPending` on the configured occurrence.

pub mod digest;
pub mod journal;
pub mod phase;
pub mod repetition;
pub mod state;

pub use digest::DigestTable;
pub use journal::{Delta, PendingStep, Slot, StepKind};
pub use phase::BoardPhase;
pub use repetition::RepetitionTracker;
pub use state::Board;
