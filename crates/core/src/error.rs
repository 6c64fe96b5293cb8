//! Construction errors
//!
//! Gameplay outcomes (rejected drops, no legal move) are plain values, not errors.
//! These variants only come out of building boards and figures from bad input.

use crate::types::Position;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Layout has no rows or no cells
    #[error("board layout has no cells")]
    EmptyLayout,

    /// Dimensions exceed what `i8` coordinates can address
    #[error("board layout of {rows} rows by {max_columns} columns is too large (limit {limit})")]
    LayoutTooLarge {
        rows: usize,
        max_columns: u8,
        limit: u8,
    },

    /// Row offset leaves no room in the row
    #[error("row {row} offset {offset} does not fit in {max_columns} columns")]
    RowTooWide { row: u8, offset: u8, max_columns: u8 },

    /// A hexagon references a slot the layout never created
    #[error("hexagon anchored at {anchor:?} is missing cell {missing:?}")]
    IncompleteHexagon { anchor: Position, missing: Position },
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureError {
    #[error("figure must have 1 to 6 cells, got {0}")]
    InvalidCellCount(usize),
}
