//! Position digest constants.
//!
//! Every durable feature of a position gets a fixed 64-bit constant drawn
//! from a ChaCha8 stream seeded with `GameConfig::digest_seed`. The draw
//! order below is part of the digest format: reordering it changes every
//! digest.

use crate::core::{CellId, GameConfig, GameRng, Piece, PlayerId, PoolId, PLAYER_COUNT};
use crate::rules::GameResult;

use super::{BoardPhase, Slot, StepKind};

/// Immutable table of digest keys for one game configuration.
#[derive(Debug)]
pub struct DigestTable {
    cells: Vec<u64>,
    occupants: Vec<u64>,
    side_to_move: [u64; PLAYER_COUNT],
    phases: Vec<u64>,
    floating: Vec<u64>,
    picks: Vec<u64>,
    drops: Vec<u64>,
    pools: Vec<u64>,
    captured: [u64; PLAYER_COUNT],
    counters: Vec<u64>,
    outcomes: [u64; PLAYER_COUNT + 1],
    kinds: usize,
    cell_count: usize,
    counter_count: usize,
}

impl DigestTable {
    #[must_use]
    pub fn new(config: &GameConfig, cell_count: usize) -> Self {
        let mut rng = GameRng::new(config.digest_seed);
        let kinds = config.kind_count();
        let slots = cell_count + config.pools.len();
        let counter_count = config.counters.len();

        let mut draw = |n: usize| (0..n).map(|_| rng.next_odd_u64()).collect::<Vec<_>>();
        let cells = draw(cell_count);
        let occupants = draw(kinds * PLAYER_COUNT);
        let side = draw(PLAYER_COUNT);
        let phases = draw(BoardPhase::ALL.len() * PLAYER_COUNT);
        let floating = draw(kinds * PLAYER_COUNT);
        let picks = draw(slots);
        let drops = draw(slots);
        let pools = draw(config.pools.len());
        let captured = draw(PLAYER_COUNT);
        let counters = draw(counter_count * PLAYER_COUNT);
        let outcomes = draw(PLAYER_COUNT + 1);

        Self {
            cells,
            occupants,
            side_to_move: [side[0], side[1]],
            phases,
            floating,
            picks,
            drops,
            pools,
            captured: [captured[0], captured[1]],
            counters,
            outcomes: [outcomes[0], outcomes[1], outcomes[2]],
            kinds,
            cell_count,
            counter_count,
        }
    }

    fn piece_index(&self, piece: Piece) -> usize {
        piece.owner.index() * self.kinds + piece.kind.0 as usize
    }

    /// Term for `piece` at stack `level` of `cell`.
    #[inline]
    #[must_use]
    pub fn stacked(&self, cell: CellId, piece: Piece, level: usize) -> u64 {
        self.cells[cell.index()]
            .wrapping_mul(self.occupants[self.piece_index(piece)])
            .wrapping_mul(level as u64 + 1)
    }

    #[must_use]
    pub fn side_to_move(&self, player: PlayerId) -> u64 {
        self.side_to_move[player.index()]
    }

    #[must_use]
    pub fn phase(&self, phase: BoardPhase, player: PlayerId) -> u64 {
        self.phases[phase.ordinal() * PLAYER_COUNT + player.index()]
    }

    #[must_use]
    pub fn floating(&self, piece: Piece) -> u64 {
        self.floating[self.piece_index(piece)]
    }

    #[must_use]
    pub fn pending(&self, kind: StepKind, slot: Slot) -> u64 {
        let index = match slot {
            Slot::Cell(cell) => cell.index(),
            Slot::Pool(pool) => self.cell_count + pool.index(),
        };
        match kind {
            StepKind::Pick => self.picks[index],
            StepKind::Drop => self.drops[index],
        }
    }

    #[must_use]
    pub fn pool(&self, pool: PoolId, count: u32) -> u64 {
        self.pools[pool.index()].wrapping_mul(u64::from(count))
    }

    #[must_use]
    pub fn captured(&self, player: PlayerId, count: u32) -> u64 {
        self.captured[player.index()].wrapping_mul(u64::from(count))
    }

    #[must_use]
    pub fn counter(&self, player: PlayerId, index: usize, value: i64) -> u64 {
        self.counters[player.index() * self.counter_count + index].wrapping_mul(value as u64)
    }

    #[must_use]
    pub fn outcome(&self, result: GameResult) -> u64 {
        match result {
            GameResult::Winner(p) => self.outcomes[p.index()],
            GameResult::Draw => self.outcomes[PLAYER_COUNT],
        }
    }
}
