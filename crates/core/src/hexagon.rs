//! Hexagon module - the scoring unit of the board
//!
//! A hexagon is six triangles: the anchor plus every [`RING`] offset from it.
//! Hexagons overlap on the board, so one triangle can belong to up to three of them.

use crate::types::{Cell, Position, RING};

/// Fixed set of six board positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hexagon {
    anchor: Position,
    positions: [Position; 6],
}

impl Hexagon {
    /// Build the hexagon whose top-left (normal) triangle is `anchor`
    pub fn new(anchor: Position) -> Self {
        Self {
            anchor,
            positions: RING.map(|offset| anchor + offset),
        }
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn positions(&self) -> &[Position; 6] {
        &self.positions
    }

    pub fn contains(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    /// All six cells are filled with the anchor's color
    ///
    /// `lookup` resolves a position to its cell; a missing cell means "not completed".
    pub fn is_completed<'a, F>(&self, lookup: F) -> bool
    where
        F: Fn(Position) -> Option<&'a Cell>,
    {
        let Some(color) = lookup(self.anchor).and_then(|cell| cell.fill) else {
            return false;
        };

        self.positions
            .iter()
            .all(|&p| lookup(p).and_then(|cell| cell.fill) == Some(color))
    }
}
