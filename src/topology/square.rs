//! Rectangular grid with eight-way adjacency.

use crate::core::CellId;

use super::{Coord, Direction, Topology};

/// `width` × `height` square cells, row-major.
///
/// Directions run clockwise from north; even directions are orthogonal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SquareGrid {
    width: u8,
    height: u8,
}

const STEPS: [(i8, i8); 8] = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];

impl SquareGrid {
    pub const NORTH: Direction = Direction(0);
    pub const NORTH_EAST: Direction = Direction(1);
    pub const EAST: Direction = Direction(2);
    pub const SOUTH_EAST: Direction = Direction(3);
    pub const SOUTH: Direction = Direction(4);
    pub const SOUTH_WEST: Direction = Direction(5);
    pub const WEST: Direction = Direction(6);
    pub const NORTH_WEST: Direction = Direction(7);

    /// The four rook directions.
    pub const ORTHOGONAL: [Direction; 4] = [Self::NORTH, Self::EAST, Self::SOUTH, Self::WEST];

    #[must_use]
    pub fn new(width: u8, height: u8) -> Self {
        assert!(width > 0 && height > 0, "Grid must have at least one cell");
        assert!(width <= 26, "Columns are lettered a..z");
        Self { width, height }
    }

    #[must_use]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u8 {
        self.height
    }
}

impl Topology for SquareGrid {
    fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn direction_count(&self) -> usize {
        STEPS.len()
    }

    fn neighbor(&self, cell: CellId, dir: Direction) -> Option<CellId> {
        let coord = self.coord_of(cell);
        let (dc, dr) = STEPS[dir.0 as usize];
        let col = coord.col.checked_add_signed(dc)?;
        let row = coord.row.checked_add_signed(dr)?;
        self.cell_at(Coord::new(col, row))
    }

    fn cell_at(&self, coord: Coord) -> Option<CellId> {
        (coord.col < self.width && coord.row < self.height).then(|| {
            CellId::new(u16::from(coord.row) * u16::from(self.width) + u16::from(coord.col))
        })
    }

    fn coord_of(&self, cell: CellId) -> Coord {
        let w = u16::from(self.width);
        Coord::new((cell.0 % w) as u8, (cell.0 / w) as u8)
    }
}
