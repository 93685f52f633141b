//! Board phases.

use serde::{Deserialize, Serialize};

/// Explicit state of a board.
///
/// ```text
/// Setup --start--> Play --drop--> Confirm --done--> Play | Gameover
///                   ^                |
///                   +----take-back---+
/// ```
///
/// `Resign` is reachable from any active phase and a second resign returns
/// to the phase it came from. `DrawPending` is entered on a repeated
/// position; `done` there ends the game drawn, any move plays on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardPhase {
    Setup,
    Play,
    Confirm,
    Resign,
    DrawPending,
    Gameover,
}

impl BoardPhase {
    pub const ALL: [BoardPhase; 6] = [
        BoardPhase::Setup,
        BoardPhase::Play,
        BoardPhase::Confirm,
        BoardPhase::Resign,
        BoardPhase::DrawPending,
        BoardPhase::Gameover,
    ];

    /// Stable index used for digest keys.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Phases in which moves are accepted.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, BoardPhase::Gameover)
    }
}
