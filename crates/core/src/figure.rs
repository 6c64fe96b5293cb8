//! Figure module - player-movable chains of triangles
//!
//! A figure is a free-floating template: its cells are positions relative to the
//! ring origin, and `cells[0]` is the grab cell that gets aligned to the board.
//! Rotation steps every cell one slot along the shared [`RING`] and flips its
//! orientation, so six rotations are the identity.

use arrayvec::ArrayVec;

use crate::error::FigureError;
use crate::types::{
    ring_index, Color, Orientation, Position, FIGURE_MAX_CELLS, RING, ROTATION_STEPS,
};

/// One triangle of a figure, relative to the ring origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FigureCell {
    pub offset: Position,
    pub orientation: Orientation,
}

/// Absolute triangle produced by [`Figure::cells_absolute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedCell {
    pub position: Position,
    pub orientation: Orientation,
    pub color: Color,
}

pub type FigureCells = ArrayVec<FigureCell, FIGURE_MAX_CELLS>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Figure {
    color: Color,
    cells: FigureCells,
    rotation_index: u8,
}

impl Figure {
    /// Create a figure of `cell_count` triangles (clamped to 1..=6)
    pub fn new(color: Color, cell_count: usize) -> Self {
        let count = cell_count.clamp(1, FIGURE_MAX_CELLS);
        let cells = RING[..count]
            .iter()
            .map(|&offset| FigureCell {
                offset,
                orientation: offset.orientation(),
            })
            .collect();

        Self {
            color,
            cells,
            rotation_index: 0,
        }
    }

    /// Like [`Figure::new`] but rejects counts outside 1..=6
    pub fn try_new(color: Color, cell_count: usize) -> Result<Self, FigureError> {
        if !(1..=FIGURE_MAX_CELLS).contains(&cell_count) {
            return Err(FigureError::InvalidCellCount(cell_count));
        }
        Ok(Self::new(color, cell_count))
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn cells(&self) -> &[FigureCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Grab cell used to align the figure with the board
    pub fn first_cell(&self) -> FigureCell {
        self.cells[0]
    }

    pub fn rotation_index(&self) -> u8 {
        self.rotation_index
    }

    /// Presentation angle for the current rotation
    pub fn rotation_degrees(&self) -> u16 {
        self.rotation_index as u16 * 60
    }

    /// Step every cell to the next ring slot and flip its orientation
    pub fn rotate(&mut self) {
        for cell in self.cells.iter_mut() {
            // Offsets only ever hold ring slots: built from RING and moved along it.
            let index = ring_index(cell.offset).unwrap_or(0);
            cell.offset = RING[(index + 1) % RING.len()];
            cell.orientation = cell.orientation.toggled();
        }
        self.rotation_index = (self.rotation_index + 1) % ROTATION_STEPS;
    }

    /// Clone rotated forward until `rotation_index == index % 6`
    pub fn rotated_to(&self, index: u8) -> Figure {
        let target = index % ROTATION_STEPS;
        let mut figure = self.clone();
        while figure.rotation_index != target {
            figure.rotate();
        }
        figure
    }

    /// Absolute cells when the grab cell sits on `anchor`
    ///
    /// `None` if a cell would fall outside the coordinate range; no board has
    /// cells there, so callers treat it like any other off-board placement.
    pub fn cells_absolute(&self, anchor: Position) -> Option<ArrayVec<PlacedCell, FIGURE_MAX_CELLS>> {
        let origin = self.first_cell().offset;
        self.cells
            .iter()
            .map(|cell| {
                let position = anchor.checked_add(cell.offset - origin)?;
                Some(PlacedCell {
                    position,
                    orientation: cell.orientation,
                    color: self.color,
                })
            })
            .collect()
    }
}
