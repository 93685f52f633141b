//! Hasami implementation.

use smallvec::SmallVec;

use crate::board::Board;
use crate::core::{
    CellId, CounterConfig, GameConfig, GameRng, Piece, PieceConfig, PieceKind, PlayerId,
    PoolConfig, PoolId,
};
use crate::moves::{Location, MoveRecord};
use crate::rules::{GameResult, GameRules};
use crate::topology::{cells, ray, SquareGrid, Topology};

const STONE: PieceKind = PieceKind(0);

/// Counter index of the advancement total.
pub const ADVANCEMENT: usize = 0;

/// Rules of hasami.
#[derive(Clone, Debug)]
pub struct Hasami {
    config: GameConfig,
    grid: SquareGrid,
    captures_to_win: u32,
}

/// Builder for creating a Hasami variant.
pub struct HasamiBuilder {
    size: u8,
    captures_to_win: u32,
}

impl Default for HasamiBuilder {
    fn default() -> Self {
        Self {
            size: 5,
            captures_to_win: 3,
        }
    }
}

impl HasamiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, size: u8) -> Self {
        assert!((3..=9).contains(&size), "Board size must be 3-9");
        self.size = size;
        self
    }

    pub fn captures_to_win(mut self, count: u32) -> Self {
        assert!(count > 0, "At least one capture must be needed to win");
        self.captures_to_win = count;
        self
    }

    pub fn build(self) -> Hasami {
        let config = GameConfig::new(format!("hasami-{}", self.size))
            .with_piece(PieceConfig::new(STONE, "stone", ['x', 'o']))
            .with_pool(PoolConfig::unlimited(PoolId::new(0), PlayerId::FIRST, STONE).with_count(0))
            .with_pool(PoolConfig::unlimited(PoolId::new(1), PlayerId::SECOND, STONE).with_count(0))
            .with_counter(CounterConfig::evaluator_only("advancement"));

        Hasami {
            config,
            grid: SquareGrid::new(self.size, self.size),
            captures_to_win: self.captures_to_win,
        }
    }
}

impl Default for Hasami {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasami {
    /// The standard 5×5 game.
    pub fn new() -> Self {
        HasamiBuilder::new().build()
    }

    pub fn builder() -> HasamiBuilder {
        HasamiBuilder::new()
    }

    /// Off-board reserve used when editing positions.
    #[must_use]
    pub fn pool_of(player: PlayerId) -> PoolId {
        PoolId::new(player.0)
    }

    fn home_row(&self, player: PlayerId) -> u8 {
        if player == PlayerId::FIRST {
            0
        } else {
            self.grid.height() - 1
        }
    }

    /// Rook moves for `player`, whoever is to move.
    fn moves_for(&self, board: &Board<Self>, player: PlayerId) -> Vec<MoveRecord> {
        let mut moves = Vec::new();
        for cell in cells(&self.grid) {
            if board.occupant(cell).map(|p| p.owner) != Some(player) {
                continue;
            }
            let from = Location::Cell(self.grid.coord_of(cell));
            for dir in SquareGrid::ORTHOGONAL {
                for target in ray(&self.grid, cell, dir) {
                    if board.occupant(target).is_some() {
                        break;
                    }
                    moves.push(MoveRecord::moving(
                        player,
                        from,
                        Location::Cell(self.grid.coord_of(target)),
                    ));
                }
            }
        }
        moves
    }

    fn pieces_of(&self, board: &Board<Self>, player: PlayerId) -> usize {
        cells(&self.grid)
            .filter(|&c| board.occupant(c).map(|p| p.owner) == Some(player))
            .count()
    }

    fn advancement(&self, board: &Board<Self>, player: PlayerId) -> i64 {
        let home = i64::from(self.home_row(player));
        cells(&self.grid)
            .filter(|&c| board.occupant(c).map(|p| p.owner) == Some(player))
            .map(|c| (i64::from(self.grid.coord_of(c).row) - home).abs())
            .sum()
    }
}

impl GameRules for Hasami {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn topology(&self) -> &dyn Topology {
        &self.grid
    }

    fn setup(&self, board: &mut Board<Self>, _rng: &mut GameRng) {
        for player in PlayerId::both() {
            let row = self.home_row(player);
            for col in 0..self.grid.width() {
                let cell = board.cell(crate::topology::Coord::new(col, row));
                board.place_piece(cell, Piece::new(STONE, player));
            }
        }
    }

    fn legal_moves(&self, board: &Board<Self>) -> Vec<MoveRecord> {
        self.moves_for(board, board.player())
    }

    fn captures_after_drop(
        &self,
        board: &Board<Self>,
        cell: CellId,
        piece: Piece,
    ) -> SmallVec<[CellId; 4]> {
        let mut captured = SmallVec::new();
        for dir in SquareGrid::ORTHOGONAL {
            let mut run: SmallVec<[CellId; 4]> = SmallVec::new();
            for next in ray(&self.grid, cell, dir) {
                match board.occupant(next) {
                    Some(p) if p.owner != piece.owner => run.push(next),
                    Some(_) => {
                        captured.extend(run.drain(..));
                        break;
                    }
                    None => break,
                }
            }
        }
        captured
    }

    fn on_turn_end(&self, board: &mut Board<Self>, mover: PlayerId) {
        let value = self.advancement(board, mover);
        board.set_counter(mover, ADVANCEMENT, value);
    }

    fn winner(&self, board: &Board<Self>) -> Option<GameResult> {
        let mover = board.player();
        if board.captured(mover) >= self.captures_to_win {
            return Some(GameResult::Winner(mover));
        }
        if self.moves_for(board, mover.opponent()).is_empty() {
            return Some(GameResult::Winner(mover));
        }
        None
    }

    /// Material first, then advancement.
    fn evaluate(&self, board: &Board<Self>, player: PlayerId) -> f64 {
        let opponent = player.opponent();
        let material =
            self.pieces_of(board, player) as f64 - self.pieces_of(board, opponent) as f64;
        let advance =
            (board.counter(player, ADVANCEMENT) - board.counter(opponent, ADVANCEMENT)) as f64;
        material * 100.0 + advance * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Coord;

    fn play(board: &mut Board<Hasami>, moves: &[&str]) {
        for s in moves {
            board.execute(&s.parse().unwrap());
        }
    }

    #[test]
    fn test_setup() {
        let board = Board::new(Hasami::new(), 0);
        assert_eq!(board.occupied_count(), 10);
        assert_eq!(board.undo_depth(), 0);
        // each of 5 pieces can move 1-3 cells forward
        assert_eq!(board.legal_moves().len(), 15);
    }

    #[test]
    fn test_custodian_capture() {
        let mut board = Board::new(Hasami::new(), 0);
        play(&mut board, &["P0 move a1 a3", "P1 move b5 b3", "P0 move c1 c3"]);
        assert_eq!(board.captured(PlayerId::FIRST), 1);
        assert_eq!(board.occupant(board.cell(Coord::new(1, 2))), None);
    }

    #[test]
    fn test_moving_between_enemies_is_safe() {
        let mut board = Board::new(Hasami::new(), 0);
        play(&mut board, &["P0 move a1 a3", "P1 move e5 e4", "P0 move c1 c3", "P1 move b5 b3"]);
        assert_eq!(board.captured(PlayerId::FIRST), 0);
        assert!(board.occupant(board.cell(Coord::new(1, 2))).is_some());
    }

    #[test]
    fn test_advancement_counter_not_in_digest() {
        let mut board = Board::new(Hasami::new(), 0);
        let before = board.digest();
        board.set_counter(PlayerId::FIRST, ADVANCEMENT, 42);
        assert_eq!(board.digest(), before);
    }

    #[test]
    fn test_capture_win() {
        let game = Hasami::builder().captures_to_win(1).build();
        let mut board = Board::new(game, 0);
        play(&mut board, &["P0 move a1 a3", "P1 move b5 b3", "P0 move c1 c3"]);
        assert_eq!(board.outcome(), Some(GameResult::Winner(PlayerId::FIRST)));
    }

    #[test]
    fn test_evaluate_counts_material() {
        let mut board = Board::new(Hasami::new(), 0);
        play(&mut board, &["P0 move a1 a3", "P1 move b5 b3", "P0 move c1 c3"]);
        let game = board.rules().clone();
        assert!(game.evaluate(&board, PlayerId::FIRST) >= 100.0);
        assert!(game.evaluate(&board, PlayerId::SECOND) <= -100.0);
    }
}
