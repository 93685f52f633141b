//! Live-game repetition tracking.

use rustc_hash::FxHashMap;
use tracing::info;

use super::{Board, BoardPhase};
use crate::rules::GameRules;

/// Multiset of digests seen at confirmed turn boundaries.
///
/// This belongs to the live game. The search keeps its own path set and
/// never touches a tracker.
#[derive(Clone, Debug, Default)]
pub struct RepetitionTracker {
    seen: FxHashMap<u64, u32>,
}

impl RepetitionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the board's position if it sits at a turn boundary.
    ///
    /// When the count reaches the configured limit the board enters
    /// `DrawPending`. Returns the occurrence count, 0 if not counted.
    pub fn observe<G: GameRules>(&mut self, board: &mut Board<G>) -> u32 {
        if !board.is_turn_boundary() {
            return 0;
        }
        let digest = board.digest();
        let count = self.seen.entry(digest).or_insert(0);
        *count += 1;
        let count = *count;

        if count >= board.config().repetition_limit && board.phase() == BoardPhase::Play {
            info!(
                digest,
                count,
                player = %board.player(),
                "position repeated, draw offered"
            );
            board.enter_draw_pending();
        }
        count
    }

    /// Remove one occurrence, for a move that was taken back.
    pub fn forget(&mut self, digest: u64) {
        if let Some(count) = self.seen.get_mut(&digest) {
            *count -= 1;
            if *count == 0 {
                self.seen.remove(&digest);
            }
        }
    }

    #[must_use]
    pub fn occurrences(&self, digest: u64) -> u32 {
        self.seen.get(&digest).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::TicTacToe;
    use crate::moves::MoveRecord;

    #[test]
    fn test_ignores_positions_mid_move() {
        let mut board = Board::new(TicTacToe::new(), 0);
        let mut tracker = RepetitionTracker::new();
        board.execute(&"P0 pick #0".parse::<MoveRecord>().unwrap());
        assert_eq!(tracker.observe(&mut board), 0);
    }

    #[test]
    fn test_forget() {
        let mut board = Board::new(TicTacToe::new(), 0);
        let mut tracker = RepetitionTracker::new();
        let digest = board.digest();

        assert_eq!(tracker.observe(&mut board), 1);
        assert_eq!(tracker.observe(&mut board), 2);
        tracker.forget(digest);
        assert_eq!(tracker.occurrences(digest), 1);
        tracker.forget(digest);
        tracker.forget(digest);
        assert_eq!(tracker.occurrences(digest), 0);
    }

    #[test]
    fn test_third_occurrence_offers_draw() {
        let mut board = Board::new(TicTacToe::new(), 0);
        let mut tracker = RepetitionTracker::new();

        tracker.observe(&mut board);
        tracker.observe(&mut board);
        assert_eq!(board.phase(), BoardPhase::Play);
        tracker.observe(&mut board);
        assert_eq!(board.phase(), BoardPhase::DrawPending);
    }
}
