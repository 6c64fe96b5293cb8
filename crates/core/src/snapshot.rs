//! Plain-data views of a session for observers and presentation layers.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::figure::{Figure, FigureCell};
use crate::types::{Color, Position, FIGURE_MAX_CELLS};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FigureSnapshot {
    pub color: Color,
    pub rotation_index: u8,
    pub cells: ArrayVec<FigureCell, FIGURE_MAX_CELLS>,
}

impl From<&Figure> for FigureSnapshot {
    fn from(value: &Figure) -> Self {
        Self {
            color: value.color(),
            rotation_index: value.rotation_index(),
            cells: value.cells().iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    /// `rows x max_columns`; `None` = no cell, `Some(0)` = empty, `Some(code)` = color code
    pub board: Vec<Vec<Option<u8>>>,
    pub pool: Vec<FigureSnapshot>,
    pub score: u32,
    pub best_score: u32,
    pub game_over: bool,
    pub round: u32,
    pub figures_placed: u32,
    pub pending_removal: Vec<Position>,
}

impl SessionSnapshot {
    pub fn board_grid(board: &Board) -> Vec<Vec<Option<u8>>> {
        (0..board.rows() as i8)
            .map(|row| {
                (0..board.max_columns() as i8)
                    .map(|column| {
                        board
                            .get(Position::new(row, column))
                            .map(|cell| cell.fill.map_or(0, |c| c.code()))
                    })
                    .collect()
            })
            .collect()
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }
}
