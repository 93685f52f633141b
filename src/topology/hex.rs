//! Rhombus of hexagons in axial coordinates.

use crate::core::CellId;

use super::{Coord, Direction, Topology};

/// Hex board where column and row are axial `q`/`r` coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexGrid {
    width: u8,
    height: u8,
}

// Clockwise from "north", opposite directions three apart.
const STEPS: [(i8, i8); 6] = [(0, 1), (1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1)];

impl HexGrid {
    #[must_use]
    pub fn new(width: u8, height: u8) -> Self {
        assert!(width > 0 && height > 0, "Grid must have at least one cell");
        assert!(width <= 26, "Columns are lettered a..z");
        Self { width, height }
    }
}

impl Topology for HexGrid {
    fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn direction_count(&self) -> usize {
        STEPS.len()
    }

    fn neighbor(&self, cell: CellId, dir: Direction) -> Option<CellId> {
        let coord = self.coord_of(cell);
        let (dq, dr) = STEPS[dir.0 as usize];
        let col = coord.col.checked_add_signed(dq)?;
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
