//! Game configuration types.
//!
//! Games configure the board engine at startup by providing:
//! - `PieceConfig`: the kinds of pieces that can occupy cells
//! - `PoolConfig`: off-board reserves pieces are placed from
//! - `CounterConfig`: per-player auxiliary counters and whether they are
//!   part of the position digest
//! - `GameConfig`: combines the above with capacity and digest settings
//!
//! The engine never hardcodes piece kinds or pools - games define them.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Index of a cell in a board's topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub u16);

impl CellId {
    /// Create a new cell ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Off-board piece reserve identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoolId(pub u8);

impl PoolId {
    /// Create a new pool ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque piece kind. Games assign meaning via `PieceConfig`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceKind(pub u8);

impl PieceKind {
    /// Create a new piece kind.
    #[must_use]
    pub const fn new(kind: u8) -> Self {
        Self(kind)
    }
}

/// A piece on the board: its kind and its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: PlayerId,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceKind, owner: PlayerId) -> Self {
        Self { kind, owner }
    }
}

/// Display data for one piece kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PieceConfig {
    pub kind: PieceKind,
    pub name: String,
    /// Glyph per owner, used by text dumps of the board.
    pub glyphs: [char; 2],
}

impl PieceConfig {
    pub fn new(kind: PieceKind, name: impl Into<String>, glyphs: [char; 2]) -> Self {
        Self {
            kind,
            name: name.into(),
            glyphs,
        }
    }
}

/// An off-board reserve of identical pieces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolConfig {
    pub id: PoolId,
    pub owner: PlayerId,
    pub kind: PieceKind,
    /// Starting count. `None` for an inexhaustible source/sink.
    pub count: Option<u32>,
}

impl PoolConfig {
    /// An inexhaustible pool.
    pub fn unlimited(id: PoolId, owner: PlayerId, kind: PieceKind) -> Self {
        Self {
            id,
            owner,
            kind,
            count: None,
        }
    }

    /// A pool holding `count` pieces.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }
}

/// A per-player auxiliary counter.
///
/// `digest` decides whether the counter is part of the position digest.
/// Counters that affect legality (ownership flags, tallies that end the
/// game) must be digested; evaluator-only bookkeeping should not be, or
/// transpositions that differ only in bookkeeping stop matching.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CounterConfig {
    pub name: String,
    pub digest: bool,
    pub initial: i64,
}

impl CounterConfig {
    /// A counter that is part of the digest.
    pub fn digested(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            digest: true,
            initial: 0,
        }
    }

    /// A counter that only the evaluator reads.
    pub fn evaluator_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            digest: false,
            initial: 0,
        }
    }

    #[must_use]
    pub fn with_initial(mut self, value: i64) -> Self {
        self.initial = value;
        self
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Variant name, recorded in transcripts.
    pub name: String,

    pub pieces: Vec<PieceConfig>,

    pub pools: Vec<PoolConfig>,

    /// Maximum stack height of a cell.
    pub cell_capacity: usize,

    pub counters: Vec<CounterConfig>,

    /// Seed of the digest constant generator. Changing it invalidates
    /// every stored digest.
    pub digest_seed: u64,

    /// Occurrences of a position that trigger a pending draw.
    pub repetition_limit: u32,

    /// Start in free-placement setup instead of turn-based play.
    pub starts_in_setup: bool,
}

impl GameConfig {
    /// Create a configuration with single-occupancy cells.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pieces: Vec::new(),
            pools: Vec::new(),
            cell_capacity: 1,
            counters: Vec::new(),
            digest_seed: 64 * 1000,
            repetition_limit: 3,
            starts_in_setup: false,
        }
    }

    #[must_use]
    pub fn with_piece(mut self, piece: PieceConfig) -> Self {
        self.pieces.push(piece);
        self
    }

    /// Add a pool. Pool ids must be dense and in order.
    #[must_use]
    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        assert_eq!(
            pool.id.index(),
            self.pools.len(),
            "Pool ids must be added in order"
        );
        self.pools.push(pool);
        self
    }

    #[must_use]
    pub fn with_counter(mut self, counter: CounterConfig) -> Self {
        self.counters.push(counter);
        self
    }

    #[must_use]
    pub fn with_cell_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Cells must hold at least one piece");
        self.cell_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_digest_seed(mut self, seed: u64) -> Self {
        self.digest_seed = seed;
        self
    }

    #[must_use]
    pub fn with_repetition_limit(mut self, limit: u32) -> Self {
        self.repetition_limit = limit;
        self
    }

    #[must_use]
    pub fn in_setup(mut self) -> Self {
        self.starts_in_setup = true;
        self
    }

    /// Get a pool config by ID.
    #[must_use]
    pub fn pool(&self, id: PoolId) -> Option<&PoolConfig> {
        self.pools.get(id.index())
    }

    /// Index of a counter by name.
    #[must_use]
    pub fn counter_index(&self, name: &str) -> Option<usize> {
        self.counters.iter().position(|c| c.name == name)
    }

    /// Number of distinct piece kinds (at least one).
    #[must_use]
    pub fn kind_count(&self) -> usize {
        self.pieces
            .iter()
            .map(|p| p.kind.0 as usize + 1)
            .max()
            .unwrap_or(1)
    }

    /// Display glyph of a piece.
    #[must_use]
    pub fn glyph(&self, piece: Piece) -> char {
        self.pieces
            .iter()
            .find(|p| p.kind == piece.kind)
            .map(|p| p.glyphs[piece.owner.index() & 1])
            .unwrap_or('?')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stones() -> GameConfig {
        GameConfig::new("stones")
            .with_piece(PieceConfig::new(PieceKind::new(0), "stone", ['X', 'O']))
            .with_pool(PoolConfig::unlimited(PoolId::new(0), PlayerId::FIRST, PieceKind::new(0)))
            .with_pool(
                PoolConfig::unlimited(PoolId::new(1), PlayerId::SECOND, PieceKind::new(0))
                    .with_count(4),
            )
            .with_counter(CounterConfig::digested("captures"))
            .with_counter(CounterConfig::evaluator_only("drift").with_initial(2))
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::new("plain");
        assert_eq!(config.cell_capacity, 1);
        assert_eq!(config.repetition_limit, 3);
        assert!(!config.starts_in_setup);
        assert_eq!(config.kind_count(), 1);
    }

    #[test]
    fn test_builder() {
        let config = stones();

        assert_eq!(config.pools.len(), 2);
        assert_eq!(config.pool(PoolId::new(1)).unwrap().count, Some(4));
        assert!(config.pool(PoolId::new(2)).is_none());
        assert_eq!(config.counter_index("drift"), Some(1));
        assert!(!config.counters[1].digest);
        assert_eq!(config.counters[1].initial, 2);
    }

    #[test]
    fn test_glyph() {
        let config = stones();
        assert_eq!(config.glyph(Piece::new(PieceKind::new(0), PlayerId::SECOND)), 'O');
        assert_eq!(config.glyph(Piece::new(PieceKind::new(5), PlayerId::FIRST)), '?');
    }

    #[test]
    #[should_panic(expected = "Pool ids must be added in order")]
    fn test_pool_order_enforced() {
        let _ = GameConfig::new("bad")
            .with_pool(PoolConfig::unlimited(PoolId::new(1), PlayerId::FIRST, PieceKind::new(0)));
    }

    #[test]
    fn test_pool_display() {
        assert_eq!(PoolId::new(3).to_string(), "#3");
    }

    #[test]
    fn test_serialization() {
        let config = stones();
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "stones");
        assert_eq!(back.counters.len(), 2);
    }
}
