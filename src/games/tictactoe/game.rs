//! Tic-tac-toe implementation.

use crate::board::Board;
use crate::core::{
    CellId, GameConfig, GameRng, PieceConfig, PieceKind, PlayerId, PoolConfig, PoolId,
};
use crate::moves::{Location, MoveRecord};
use crate::rules::{GameResult, GameRules};
use crate::topology::{SquareGrid, Topology};

const MARK: PieceKind = PieceKind(0);

/// Rules of 3×3 tic-tac-toe.
#[derive(Clone, Debug)]
pub struct TicTacToe {
    config: GameConfig,
    grid: SquareGrid,
    lines: Vec<[CellId; 3]>,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    pub fn new() -> Self {
        let config = GameConfig::new("tictactoe")
            .with_piece(PieceConfig::new(MARK, "mark", ['X', 'O']))
            .with_pool(PoolConfig::unlimited(PoolId::new(0), PlayerId::FIRST, MARK))
            .with_pool(PoolConfig::unlimited(PoolId::new(1), PlayerId::SECOND, MARK));
        let grid = SquareGrid::new(3, 3);

        let at = |col: u16, row: u16| CellId::new(row * 3 + col);
        let mut lines = Vec::with_capacity(8);
        for i in 0..3 {
            lines.push([at(0, i), at(1, i), at(2, i)]);
            lines.push([at(i, 0), at(i, 1), at(i, 2)]);
        }
        lines.push([at(0, 0), at(1, 1), at(2, 2)]);
        lines.push([at(2, 0), at(1, 1), at(0, 2)]);

        Self {
            config,
            grid,
            lines,
        }
    }

    /// Pool a player places from.
    #[must_use]
    pub fn pool_of(player: PlayerId) -> PoolId {
        PoolId::new(player.0)
    }

    fn line_owners(&self, board: &Board<Self>, line: &[CellId; 3]) -> [Option<PlayerId>; 3] {
        line.map(|cell| board.occupant(cell).map(|p| p.owner))
    }
}

impl GameRules for TicTacToe {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn topology(&self) -> &dyn Topology {
        &self.grid
    }

    fn setup(&self, _board: &mut Board<Self>, _rng: &mut GameRng) {}

    fn legal_moves(&self, board: &Board<Self>) -> Vec<MoveRecord> {
        let player = board.player();
        let pool = Location::Pool(Self::pool_of(player));
        crate::topology::cells(&self.grid)
            .filter(|&cell| board.occupant(cell).is_none())
            .map(|cell| MoveRecord::moving(player, pool, Location::Cell(self.grid.coord_of(cell))))
            .collect()
    }

    fn winner(&self, board: &Board<Self>) -> Option<GameResult> {
        for line in &self.lines {
            if let [Some(a), Some(b), Some(c)] = self.line_owners(board, line) {
                if a == b && b == c {
                    return Some(GameResult::Winner(a));
                }
            }
        }
        (board.empty_count() == 0).then_some(GameResult::Draw)
    }

    /// Sum over open lines of the squared number of marks, signed by owner.
    fn evaluate(&self, board: &Board<Self>, player: PlayerId) -> f64 {
        self.lines
            .iter()
            .map(|line| {
                let owners = self.line_owners(board, line);
                let mine = owners.iter().filter(|o| **o == Some(player)).count();
                let theirs = owners.iter().filter(|o| o.is_some()).count() - mine;
                match (mine, theirs) {
                    (m, 0) => (m * m) as f64,
                    (0, t) => -((t * t) as f64),
                    _ => 0.0,
                }
            })
            .sum()
    }
}
