//! Cell graphs.
//!
//! A board never knows its geometry. It asks a `Topology` for the number of
//! cells, the neighbor of a cell in a direction, and the mapping between
//! cells and printable coordinates. Games pick a grid and walk it.

pub mod hex;
pub mod square;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::CellId;

pub use hex::HexGrid;
pub use square::SquareGrid;

/// Column/row coordinate as written in move text (`a1` is column 0, row 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub col: u8,
    pub row: u8,
}

impl Coord {
    #[must_use]
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, u32::from(self.row) + 1)
    }
}

impl FromStr for Coord {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(())?;
        if !letter.is_ascii_lowercase() {
            return Err(());
        }
        let row: u16 = chars.as_str().parse().map_err(|_| ())?;
        if row == 0 || row > 256 {
            return Err(());
        }
        Ok(Coord::new(letter as u8 - b'a', (row - 1) as u8))
    }
}

/// Direction index, meaningful only to the topology that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction(pub u8);

/// Capability object describing a board's cell graph.
pub trait Topology: Send + Sync + fmt::Debug {
    /// Total number of cells.
    fn cell_count(&self) -> usize;

    /// Number of directions; valid directions are `0..direction_count()`.
    fn direction_count(&self) -> usize;

    /// Adjacent cell, `None` at the edge.
    fn neighbor(&self, cell: CellId, dir: Direction) -> Option<CellId>;

    /// Cell at a coordinate, `None` when off the board.
    fn cell_at(&self, coord: Coord) -> Option<CellId>;

    fn coord_of(&self, cell: CellId) -> Coord;

    /// The direction pointing back along `dir`.
    fn opposite(&self, dir: Direction) -> Direction {
        let n = self.direction_count() as u8;
        Direction((dir.0 + n / 2) % n)
    }
}

/// Every cell of a topology, in index order.
pub fn cells(topology: &dyn Topology) -> impl Iterator<Item = CellId> {
    (0..topology.cell_count() as u16).map(CellId::new)
}

/// Every direction of a topology.
pub fn directions(topology: &dyn Topology) -> impl Iterator<Item = Direction> {
    (0..topology.direction_count() as u8).map(Direction)
}

/// Cells reached by repeatedly stepping in one direction, excluding the start.
///
/// ```
/// use rust_boardgame::topology::{ray, Coord, Direction, SquareGrid, Topology};
///
/// let grid = SquareGrid::new(3, 3);
/// let a1 = grid.cell_at(Coord::new(0, 0)).unwrap();
/// assert_eq!(ray(&grid, a1, SquareGrid::EAST).count(), 2);
/// ```
pub fn ray(topology: &dyn Topology, from: CellId, dir: Direction) -> Ray<'_> {
    Ray {
        topology,
        current: Some(from),
        dir,
    }
}

/// Iterator returned by [`ray`].
pub struct Ray<'a> {
    topology: &'a dyn Topology,
    current: Option<CellId>,
    dir: Direction,
}

impl Iterator for Ray<'_> {
    type Item = CellId;

    fn next(&mut self) -> Option<CellId> {
        let next = self.topology.neighbor(self.current?, self.dir);
        self.current = next;
        next
    }
}
