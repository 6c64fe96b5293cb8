//! Board module - manages the triangle grid
//!
//! The board owns every cell (flat row-major slot array, `None` for slots outside
//! the layout) and the static list of hexagons. Coordinates: `(row, column)` with
//! rows top to bottom and columns left to right; with the default layout row 2
//! and row 3 are the widest at 11 triangles.
//!
//! Placement is all-or-nothing. After a successful placement every completed
//! hexagon is found first and only then cleared, so clearing order never matters
//! even though hexagons overlap.

use arrayvec::ArrayVec;
use log::debug;

use crate::error::BoardError;
use crate::figure::Figure;
use crate::hexagon::Hexagon;
use crate::layout::{BoardConfig, CellGeometry};
use crate::types::{Cell, Color, Point, Position, FIGURE_MAX_CELLS};

/// Positions a figure would occupy
pub type Targets = ArrayVec<Position, FIGURE_MAX_CELLS>;

/// Result of a placement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementResult {
    pub accepted: bool,
    /// Triangles filled by the figure itself
    pub cells_filled: u32,
    /// `hexagon_bonus * hexagons_cleared`
    pub bonus_points: u32,
    pub hexagons_cleared: u32,
}

impl PlacementResult {
    pub fn rejected() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    rows: u8,
    max_columns: u8,
    /// Row-major `rows * max_columns` slots
    slots: Vec<Option<Cell>>,
    hexagons: Vec<Hexagon>,
    geometry: CellGeometry,
    hexagon_bonus: u32,
    /// Cleared positions waiting to be animated out; presentation only
    pending_removal: Vec<Position>,
}

impl Board {
    /// Create an empty board with the default layout
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
            .expect("default board layout must produce complete hexagons")
    }

    /// Build a board, validating that every hexagon resolves to existing cells
    pub fn with_config(config: BoardConfig) -> Result<Self, BoardError> {
        let layout = &config.layout;
        let limit = i8::MAX as u8;
        if layout.max_columns > limit || layout.row_offsets.len() > limit as usize {
            return Err(BoardError::LayoutTooLarge {
                rows: layout.row_offsets.len(),
                max_columns: layout.max_columns,
                limit,
            });
        }

        let rows = layout.rows();
        let max_columns = layout.max_columns;

        for (row, &offset) in layout.row_offsets.iter().enumerate() {
            if offset as u16 * 2 >= max_columns as u16 {
                return Err(BoardError::RowTooWide {
                    row: row as u8,
                    offset,
                    max_columns,
                });
            }
        }

        let mut slots = vec![None; rows as usize * max_columns as usize];
        for position in layout.positions() {
            let idx = position.row as usize * max_columns as usize + position.column as usize;
            slots[idx] = Some(Cell::new(position));
        }

        let mut board = Self {
            rows,
            max_columns,
            slots,
            hexagons: Vec::new(),
            geometry: config.geometry,
            hexagon_bonus: config.hexagon_bonus,
            pending_removal: Vec::new(),
        };

        if board.cell_count() == 0 {
            return Err(BoardError::EmptyLayout);
        }

        board.hexagons = board.build_hexagons()?;
        debug!(
            "board built: {} cells, {} hexagons",
            board.cell_count(),
            board.hexagons.len()
        );
        Ok(board)
    }

    /// One hexagon per normal anchor whose right-hand column exists in both rows
    fn build_hexagons(&self) -> Result<Vec<Hexagon>, BoardError> {
        let mut hexagons = Vec::new();
        for cell in self.cells() {
            if cell.orientation.is_reversed() {
                continue;
            }
            let anchor = cell.position;
            let top_right = anchor.checked_add(Position::new(0, 2));
            let bottom_right = anchor.checked_add(Position::new(1, 2));
            let (Some(top_right), Some(bottom_right)) = (top_right, bottom_right) else {
                continue;
            };
            if self.get(top_right).is_none() || self.get(bottom_right).is_none() {
                continue;
            }

            let hexagon = Hexagon::new(anchor);
            if let Some(&missing) = hexagon.positions().iter().find(|&&p| self.get(p).is_none()) {
                return Err(BoardError::IncompleteHexagon { anchor, missing });
            }
            hexagons.push(hexagon);
        }
        Ok(hexagons)
    }

    #[inline(always)]
    fn index(&self, position: Position) -> Option<usize> {
        let Position { row, column } = position;
        if row < 0 || column < 0 || row >= self.rows as i8 || column >= self.max_columns as i8 {
            return None;
        }
        Some(row as usize * self.max_columns as usize + column as usize)
    }

    /// Cell at `position`, `None` if the slot is not part of the board
    pub fn get(&self, position: Position) -> Option<&Cell> {
        self.index(position).and_then(|idx| self.slots[idx].as_ref())
    }

    fn get_mut(&mut self, position: Position) -> Option<&mut Cell> {
        let idx = self.index(position)?;
        self.slots[idx].as_mut()
    }

    /// Overwrite the fill of a cell. Returns false if there is no cell there.
    pub fn set(&mut self, position: Position, fill: Option<Color>) -> bool {
        match self.get_mut(position) {
            Some(cell) => {
                cell.fill = fill;
                true
            }
            None => false,
        }
    }

    pub fn is_filled(&self, position: Position) -> bool {
        self.get(position).is_some_and(Cell::is_filled)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.slots.iter().flatten()
    }

    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    pub fn filled_count(&self) -> usize {
        self.cells().filter(|c| c.is_filled()).count()
    }

    pub fn hexagons(&self) -> &[Hexagon] {
        &self.hexagons
    }

    pub fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    pub fn hexagon_bonus(&self) -> u32 {
        self.hexagon_bonus
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn max_columns(&self) -> u8 {
        self.max_columns
    }

    /// Board positions the figure would fill with its grab cell on `anchor`
    ///
    /// `None` if any target is missing, of the wrong orientation, or filled.
    pub fn placement_targets(&self, figure: &Figure, anchor: Position) -> Option<Targets> {
        let mut targets = Targets::new();
        for placed in figure.cells_absolute(anchor)? {
            let cell = self.get(placed.position)?;
            if !cell.can_fill(placed.orientation) {
                return None;
            }
            targets.push(placed.position);
        }
        Some(targets)
    }

    pub fn can_place(&self, figure: &Figure, anchor: Position) -> bool {
        self.placement_targets(figure, anchor).is_some()
    }

    /// Whether the figure, as currently rotated, fits anywhere
    pub fn can_place_anywhere(&self, figure: &Figure) -> bool {
        let orientation = figure.first_cell().orientation;
        self.cells()
            .filter(|cell| cell.can_fill(orientation))
            .any(|cell| self.can_place(figure, cell.position))
    }

    /// Cell hit by `point` whose orientation matches the grab cell
    pub fn resolve_drop(&self, figure: &Figure, point: Point) -> Option<Position> {
        let orientation = figure.first_cell().orientation;
        self.cells()
            .find(|cell| {
                cell.orientation == orientation && self.geometry.frame(cell.position).contains(point)
            })
            .map(|cell| cell.position)
    }

    /// Preview: positions that a drop at `point` would fill, empty if not placeable
    pub fn highlight_candidates(&self, figure: &Figure, point: Point) -> Targets {
        self.resolve_drop(figure, point)
            .map(|anchor| self.highlight_candidates_at(figure, anchor))
            .unwrap_or_default()
    }

    pub fn highlight_candidates_at(&self, figure: &Figure, anchor: Position) -> Targets {
        self.placement_targets(figure, anchor).unwrap_or_default()
    }

    /// Drop the figure with its grab cell at `point`
    pub fn try_place(&mut self, figure: &Figure, point: Point) -> PlacementResult {
        match self.resolve_drop(figure, point) {
            Some(anchor) => self.try_place_at(figure, anchor),
            None => PlacementResult::rejected(),
        }
    }

    /// Place the figure with its grab cell on `anchor`, then clear completed hexagons
    pub fn try_place_at(&mut self, figure: &Figure, anchor: Position) -> PlacementResult {
        let Some(targets) = self.placement_targets(figure, anchor) else {
            return PlacementResult::rejected();
        };

        for &position in &targets {
            self.set(position, Some(figure.color()));
        }

        let hexagons_cleared = self.clear_completed();
        debug!(
            "placed {} cells at {:?}, cleared {} hexagons",
            targets.len(),
            anchor,
            hexagons_cleared
        );

        PlacementResult {
            accepted: true,
            cells_filled: targets.len() as u32,
            bonus_points: hexagons_cleared * self.hexagon_bonus,
            hexagons_cleared,
        }
    }

    /// Hexagons that are currently complete
    pub fn completed_hexagons(&self) -> Vec<Hexagon> {
        self.hexagons
            .iter()
            .filter(|hex| hex.is_completed(|p| self.get(p)))
            .copied()
            .collect()
    }

    /// Unfill every completed hexagon and return how many there were
    fn clear_completed(&mut self) -> u32 {
        let completed = self.completed_hexagons();
        if completed.is_empty() {
            return 0;
        }

        let mut cleared: Vec<Position> = completed
            .iter()
            .flat_map(|hex| hex.positions().iter().copied())
            .collect();
        cleared.sort_unstable();
        cleared.dedup();

        for &position in &cleared {
            self.set(position, None);
        }

        self.pending_removal.extend(cleared);
        self.pending_removal.sort_unstable();
        self.pending_removal.dedup();

        completed.len() as u32
    }

    /// Cleared positions not yet taken by the presentation layer, row then column
    pub fn pending_removal(&self) -> &[Position] {
        &self.pending_removal
    }

    pub fn take_pending_removal(&mut self) -> Vec<Position> {
        std::mem::take(&mut self.pending_removal)
    }

    /// Unfill every cell
    pub fn reset(&mut self) {
        for cell in self.slots.iter_mut().flatten() {
            cell.fill = None;
        }
        self.pending_removal.clear();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BoardLayout;
    use crate::types::Orientation;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new();
        assert_eq!(board.index(Position::new(0, 0)), Some(0));
        assert_eq!(board.index(Position::new(1, 0)), Some(11));
        assert_eq!(board.index(Position::new(5, 10)), Some(65));
        assert_eq!(board.index(Position::new(-1, 0)), None);
        assert_eq!(board.index(Position::new(0, 11)), None);
        assert_eq!(board.index(Position::new(6, 0)), None);
    }

    #[test]
    fn test_slots_outside_layout_have_no_cell() {
        let board = Board::new();
        // row 0 starts at column 2
        assert!(board.get(Position::new(0, 1)).is_none());
        assert!(board.get(Position::new(0, 2)).is_some());
        assert!(board.get(Position::new(5, 9)).is_none());
    }

    #[test]
    fn test_default_board_has_19_hexagons() {
        let board = Board::new();
        assert_eq!(board.cell_count(), 54);
        assert_eq!(board.hexagons().len(), 19);
        assert!(board
            .hexagons()
            .iter()
            .all(|h| h.anchor().orientation() == Orientation::Normal));
    }

    #[test]
    fn test_row_too_wide_is_rejected() {
        let config = BoardConfig {
            layout: BoardLayout {
                row_offsets: vec![0, 3],
                max_columns: 6,
            },
            ..BoardConfig::default()
        };
        assert_eq!(
            Board::with_config(config),
            Err(BoardError::RowTooWide {
                row: 1,
                offset: 3,
                max_columns: 6
            })
        );
    }

    #[test]
    fn test_layout_too_large_is_rejected() {
        let wide = BoardConfig {
            layout: BoardLayout {
                row_offsets: vec![0, 0],
                max_columns: 200,
            },
            ..BoardConfig::default()
        };
        assert_eq!(
            Board::with_config(wide),
            Err(BoardError::LayoutTooLarge {
                rows: 2,
                max_columns: 200,
                limit: 127
            })
        );

        let tall = BoardConfig {
            layout: BoardLayout {
                row_offsets: vec![0; 130],
                max_columns: 4,
            },
            ..BoardConfig::default()
        };
        assert!(matches!(
            Board::with_config(tall),
            Err(BoardError::LayoutTooLarge { rows: 130, .. })
        ));
    }

    #[test]
    fn test_largest_addressable_layout_builds() {
        let config = BoardConfig {
            layout: BoardLayout {
                row_offsets: vec![0, 0],
                max_columns: 127,
            },
            ..BoardConfig::default()
        };
        let board = Board::with_config(config).unwrap();
        assert_eq!(board.cell_count(), 254);
        let single = Figure::new(Color::Red, 1).rotated_to(1);
        assert!(board.can_place(&single, Position::new(1, 126)));
        assert!(!board.can_place(&Figure::new(Color::Red, 3), Position::new(0, 126)));
    }

    #[test]
    fn test_extreme_anchors_are_rejected_not_panicking() {
        let mut board = Board::new();
        let figure = Figure::new(Color::Red, 3);
        for anchor in [Position::new(127, 127), Position::new(-128, -128)] {
            assert!(!board.can_place(&figure, anchor));
            assert!(board.highlight_candidates_at(&figure, anchor).is_empty());
            assert!(!board.try_place_at(&figure, anchor).accepted);
        }
        for rotation in 0..6 {
            let turned = figure.rotated_to(rotation);
            assert!(!board.can_place(&turned, Position::new(-128, -128)));
            assert!(!board.can_place(&turned, Position::new(127, 127)));
        }
        assert_eq!(board.filled_count(), 0);
    }

    #[test]
    fn test_empty_layout_is_rejected() {
        let config = BoardConfig {
            layout: BoardLayout {
                row_offsets: vec![],
                max_columns: 11,
            },
            ..BoardConfig::default()
        };
        assert_eq!(Board::with_config(config), Err(BoardError::EmptyLayout));
    }

    #[test]
    fn test_incomplete_hexagon_is_rejected() {
        // row 1 starts two columns right of row 0, so the hexagon at (0,0)
        // has both right-hand corners but misses (1,0) and (1,1)
        let config = BoardConfig {
            layout: BoardLayout {
                row_offsets: vec![0, 2],
                max_columns: 7,
            },
            ..BoardConfig::default()
        };
        assert_eq!(
            Board::with_config(config),
            Err(BoardError::IncompleteHexagon {
                anchor: Position::new(0, 0),
                missing: Position::new(1, 1),
            })
        );
    }

    #[test]
    fn test_clear_queues_positions_sorted() {
        let mut board = Board::new();
        let hex = Hexagon::new(Position::new(2, 0));
        for &p in &hex.positions()[1..] {
            board.set(p, Some(Color::Red));
        }
        let result = board.try_place_at(&Figure::new(Color::Red, 1), Position::new(2, 0));
        assert!(result.accepted);
        assert_eq!(result.hexagons_cleared, 1);
        assert_eq!(
            board.pending_removal(),
            &[
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(2, 2),
                Position::new(3, 0),
                Position::new(3, 1),
                Position::new(3, 2),
            ]
        );
        assert_eq!(board.take_pending_removal().len(), 6);
        assert!(board.pending_removal().is_empty());
    }
}
