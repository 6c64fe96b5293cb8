//! Layout module - board shape, cell geometry and board configuration
//!
//! The layout decides which triangle slots exist. The geometry maps those slots
//! to board-space rectangles so a drop point can be resolved to a cell the same
//! way a touch UI hit-tests its triangle views.

use crate::types::{
    Orientation, Point, Position, BOARD_MAX_COLUMNS, BOARD_ROW_OFFSETS, HEXAGON_BONUS,
};

/// Which slots exist: row `r` spans columns `row_offsets[r]..max_columns - row_offsets[r]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    pub row_offsets: Vec<u8>,
    pub max_columns: u8,
}

impl BoardLayout {
    pub fn rows(&self) -> u8 {
        self.row_offsets.len() as u8
    }

    /// Column range of `row`, `None` if the row does not exist
    pub fn columns(&self, row: u8) -> Option<std::ops::Range<u8>> {
        let offset = *self.row_offsets.get(row as usize)?;
        let end = self.max_columns.checked_sub(offset)?;
        Some(offset..end.max(offset))
    }

    /// All slot positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows()).flat_map(move |row| {
            self.columns(row)
                .unwrap_or(0..0)
                .map(move |column| Position::new(row as i8, column as i8))
        })
    }

    pub fn cell_count(&self) -> usize {
        self.positions().count()
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            row_offsets: BOARD_ROW_OFFSETS.to_vec(),
            max_columns: BOARD_MAX_COLUMNS,
        }
    }
}

/// Axis-aligned rectangle in board space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Half-open containment: left/top edges inside, right/bottom edges outside
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Triangle frame metrics
///
/// Frames are wider than the horizontal step, so neighbouring frames overlap;
/// resolution always takes the first matching cell in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub size: f32,
    pub step_x: f32,
    pub step_y: f32,
    /// Downward shift of reversed triangles
    pub reversed_padding: f32,
}

impl CellGeometry {
    pub fn frame(&self, position: Position) -> Rect {
        let padding = if position.orientation() == Orientation::Reversed {
            self.reversed_padding
        } else {
            0.0
        };
        Rect {
            x: self.step_x * position.column as f32,
            y: self.step_y * position.row as f32 + padding,
            width: self.size,
            height: self.size,
        }
    }

    pub fn cell_center(&self, position: Position) -> Point {
        self.frame(position).center()
    }
}

impl Default for CellGeometry {
    fn default() -> Self {
        Self {
            size: 56.0,
            step_x: 31.0,
            step_y: 55.0,
            reversed_padding: 5.0,
        }
    }
}

/// Everything needed to build a [`Board`](crate::Board)
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    pub layout: BoardLayout,
    pub geometry: CellGeometry,
    pub hexagon_bonus: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            layout: BoardLayout::default(),
            geometry: CellGeometry::default(),
            hexagon_bonus: HEXAGON_BONUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_has_54_cells() {
        let layout = BoardLayout::default();
        assert_eq!(layout.rows(), 6);
        assert_eq!(layout.columns(0), Some(2..9));
        assert_eq!(layout.columns(2), Some(0..11));
        assert_eq!(layout.columns(6), None);
        assert_eq!(layout.cell_count(), 7 + 9 + 11 + 11 + 9 + 7);
    }

    #[test]
    fn positions_are_row_major() {
        let layout = BoardLayout::default();
        let first: Vec<Position> = layout.positions().take(3).collect();
        assert_eq!(
            first,
            vec![Position::new(0, 2), Position::new(0, 3), Position::new(0, 4)]
        );
    }

    #[test]
    fn reversed_frames_are_shifted_down() {
        let geometry = CellGeometry::default();
        let normal = geometry.frame(Position::new(1, 1));
        let reversed = geometry.frame(Position::new(1, 2));
        assert_eq!(normal.y, 55.0);
        assert_eq!(reversed.y, 60.0);
        assert_eq!(reversed.x, 62.0);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(9.9, 9.9)));
        assert!(!rect.contains(Point::new(10.0, 5.0)));
        assert!(!rect.contains(Point::new(5.0, -0.1)));
    }
}
