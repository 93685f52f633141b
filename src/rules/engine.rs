//! Rules trait for game implementations.
//!
//! Games implement `GameRules` to define their rules:
//! - What moves are legal
//! - What a placement captures
//! - Win/loss conditions

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::Board;
use crate::core::{CellId, GameConfig, GameRng, Piece, PlayerId};
use crate::moves::{Location, MoveRecord};
use crate::topology::Topology;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }
}

/// Rules trait.
///
/// Games implement this trait to define their rules.
/// The board calls these methods while executing moves, and the search
/// driver calls `legal_moves` and `evaluate` at every node.
///
/// ## Implementation Notes
///
/// - `legal_moves`: return only turn-completing moves (`move`, `pass`, ...)
///   for the side to move; the board adds `done` when a draw can be claimed
/// - `captures_after_drop`: read-only, the board performs the removals
/// - `winner`: called after each confirmed placement, before the turn passes
/// - `evaluate`: must be deterministic for search consistency
pub trait GameRules: Sized + Send + Sync + 'static {
    /// Get the game configuration.
    fn config(&self) -> &GameConfig;

    /// Get the board's cell graph.
    fn topology(&self) -> &dyn Topology;

    /// Place the initial position on a fresh board.
    ///
    /// `rng` is seeded from the board seed for randomized setups.
    fn setup(&self, board: &mut Board<Self>, rng: &mut GameRng);

    /// Complete moves available to the side to move.
    ///
    /// Returns empty if the player has no legal moves.
    fn legal_moves(&self, board: &Board<Self>) -> Vec<MoveRecord>;

    /// Check if the game is over after the current placement.
    ///
    /// Returns `Some(result)` if the game has ended, `None` if it continues.
    fn winner(&self, board: &Board<Self>) -> Option<GameResult>;

    /// Static evaluation from `player`'s point of view.
    fn evaluate(&self, board: &Board<Self>, player: PlayerId) -> f64;

    // === Hooks with defaults ===

    /// Cells emptied by dropping `piece` on `cell`.
    fn captures_after_drop(
        &self,
        _board: &Board<Self>,
        _cell: CellId,
        _piece: Piece,
    ) -> SmallVec<[CellId; 4]> {
        SmallVec::new()
    }

    /// Called when a placement is confirmed, before `winner`.
    ///
    /// Use journaled board mutations (`set_counter`) only.
    fn on_turn_end(&self, _board: &mut Board<Self>, _mover: PlayerId) {}

    /// Whether `pass` is a legal move for the side to move.
    fn can_pass(&self, _board: &Board<Self>) -> bool {
        false
    }

    // === Convenience Methods ===

    /// Destinations a piece lifted from `from` may be moved to.
    ///
    /// Default implementation filters `legal_moves` by source.
    fn legal_destinations(&self, board: &Board<Self>, from: Location) -> Vec<Location> {
        self.legal_moves(board)
            .iter()
            .filter(|mv| mv.source() == Some(from))
            .filter_map(MoveRecord::destination)
            .collect()
    }
}
