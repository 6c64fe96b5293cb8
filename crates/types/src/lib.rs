//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, planner, network protocol).
//!
//! # Board Shape
//!
//! The board is a triangular grid. Every slot is a triangle whose orientation is
//! derived from coordinate parity; two rows of three alternating triangles form
//! one hexagon:
//!
//! - **Rows**: 6 (indexed 0-5)
//! - **Widest row**: 11 triangles (rows 2 and 3)
//! - **Row offsets**: `[2, 1, 0, 0, 1, 2]` (row `r` spans `offset..11 - offset`)
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `HEXAGON_BONUS` | 60 | Points per cleared hexagon |
//! | `POINTS_PER_CELL` | 1 | Points per placed triangle |
//! | `POOL_SIZE` | 3 | Figures offered at a time |
//! | `FIGURE_MAX_CELLS` | 6 | Longest figure (a full ring) |
//!
//! # The Ring
//!
//! [`RING`] is the single canonical sequence of six relative slots. Figures take a
//! prefix of it and rotate by stepping along it; hexagons use all six slots from
//! their anchor.
//!
//! # Examples
//!
//! ```
//! use hexfill_types::{Color, Orientation, Position, RING};
//!
//! let p = Position::new(2, 3);
//! assert_eq!(p.orientation(), Orientation::Reversed);
//! assert_eq!(p + Position::new(1, 1), Position::new(3, 4));
//!
//! // Ring order is fixed.
//! assert_eq!(RING[3], Position::new(1, 2));
//! assert_eq!(RING.len(), 6);
//!
//! assert_eq!(Color::from_str("teal"), Some(Color::Teal));
//! ```

use std::ops::{Add, Sub};

/// Number of rows in the default layout
pub const BOARD_ROWS: u8 = 6;

/// Widest row in the default layout (triangles)
pub const BOARD_MAX_COLUMNS: u8 = 11;

/// Per-row column offsets of the default layout (top to bottom)
pub const BOARD_ROW_OFFSETS: [u8; BOARD_ROWS as usize] = [2, 1, 0, 0, 1, 2];

/// Points awarded for every cleared hexagon
pub const HEXAGON_BONUS: u32 = 60;

/// Points awarded for every triangle placed
pub const POINTS_PER_CELL: u32 = 1;

/// Number of figures offered to the player at a time
pub const POOL_SIZE: usize = 3;

/// Maximum number of triangles in one figure
pub const FIGURE_MAX_CELLS: usize = 6;

/// Number of distinct figure rotations
pub const ROTATION_STEPS: u8 = 6;

/// Canonical ring of relative slots shared by figures and hexagons.
pub const RING: [Position; 6] = [
    Position::new(0, 0),
    Position::new(0, 1),
    Position::new(0, 2),
    Position::new(1, 2),
    Position::new(1, 1),
    Position::new(1, 0),
];

/// Index of `offset` in [`RING`], if it is a ring slot
pub fn ring_index(offset: Position) -> Option<usize> {
    RING.iter().position(|&slot| slot == offset)
}

/// Triangle slot coordinate: `row` top to bottom, `column` left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub row: i8,
    pub column: i8,
}

impl Position {
    pub const fn new(row: i8, column: i8) -> Self {
        Self { row, column }
    }

    /// Component-wise sum
    pub const fn add(self, other: Position) -> Position {
        Position::new(self.row + other.row, self.column + other.column)
    }

    /// Component-wise difference
    pub const fn subtract(self, other: Position) -> Position {
        Position::new(self.row - other.row, self.column - other.column)
    }

    /// Component-wise sum, `None` when either coordinate leaves the `i8` range
    pub const fn checked_add(self, other: Position) -> Option<Position> {
        match (
            self.row.checked_add(other.row),
            self.column.checked_add(other.column),
        ) {
            (Some(row), Some(column)) => Some(Position::new(row, column)),
            _ => None,
        }
    }

    /// Component-wise difference, `None` when either coordinate leaves the `i8` range
    pub const fn checked_sub(self, other: Position) -> Option<Position> {
        match (
            self.row.checked_sub(other.row),
            self.column.checked_sub(other.column),
        ) {
            (Some(row), Some(column)) => Some(Position::new(row, column)),
            _ => None,
        }
    }

    /// Orientation of the triangle living at this coordinate
    ///
    /// # Examples
    ///
    /// ```
    /// use hexfill_types::{Orientation, Position};
    ///
    /// assert_eq!(Position::new(0, 0).orientation(), Orientation::Normal);
    /// assert_eq!(Position::new(0, 1).orientation(), Orientation::Reversed);
    /// assert_eq!(Position::new(1, 0).orientation(), Orientation::Reversed);
    /// assert_eq!(Position::new(1, 1).orientation(), Orientation::Normal);
    /// ```
    pub const fn orientation(self) -> Orientation {
        if (self.row as i16 + self.column as i16).rem_euclid(2) == 1 {
            Orientation::Reversed
        } else {
            Orientation::Normal
        }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::add(self, rhs)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::subtract(self, rhs)
    }
}

/// Triangle orientation
///
/// - **Normal**: points up, `(row + column)` even
/// - **Reversed**: points down, `(row + column)` odd
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Normal,
    Reversed,
}

impl Orientation {
    /// The other orientation
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Normal => Orientation::Reversed,
            Orientation::Reversed => Orientation::Normal,
        }
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, Orientation::Reversed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Normal => "normal",
            Orientation::Reversed => "reversed",
        }
    }
}

/// Figure colors
///
/// Seven fixed palette entries. An empty board triangle has no color at all,
/// so there is no "default" variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Yellow,
    Orange,
    Teal,
    Blue,
    Green,
    Purple,
}

impl Color {
    /// Full palette in draw order
    pub const ALL: [Color; 7] = [
        Color::Red,
        Color::Yellow,
        Color::Orange,
        Color::Teal,
        Color::Blue,
        Color::Green,
        Color::Purple,
    ];

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use hexfill_types::Color;
    ///
    /// assert_eq!(Color::from_str("red"), Some(Color::Red));
    /// assert_eq!(Color::from_str("PURPLE"), Some(Color::Purple));
    /// assert_eq!(Color::from_str("magenta"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "yellow" => Some(Color::Yellow),
            "orange" => Some(Color::Orange),
            "teal" => Some(Color::Teal),
            "blue" => Some(Color::Blue),
            "green" => Some(Color::Green),
            "purple" => Some(Color::Purple),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::Teal => "teal",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Purple => "purple",
        }
    }

    /// sRGB components for presentation layers
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Color::Red => (241, 73, 91),
            Color::Yellow => (243, 197, 41),
            Color::Orange => (244, 121, 34),
            Color::Teal => (3, 190, 172),
            Color::Blue => (52, 145, 249),
            Color::Green => (107, 190, 32),
            Color::Purple => (126, 59, 155),
        }
    }

    /// Stable 1-based code (0 is reserved for "empty" in compact grids)
    pub fn code(&self) -> u8 {
        match self {
            Color::Red => 1,
            Color::Yellow => 2,
            Color::Orange => 3,
            Color::Teal => 4,
            Color::Blue => 5,
            Color::Green => 6,
            Color::Purple => 7,
        }
    }
}

/// Board-space point (same units as the cell geometry)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A cell on the game board
///
/// Orientation is fixed at creation from the position parity; only the fill changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub position: Position,
    pub orientation: Orientation,
    pub fill: Option<Color>,
}

impl Cell {
    /// Create an empty cell at `position`
    pub fn new(position: Position) -> Self {
        Self {
            position,
            orientation: position.orientation(),
            fill: None,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.fill.is_some()
    }

    /// Whether a figure triangle of `orientation` may be dropped here
    pub fn can_fill(&self, orientation: Orientation) -> bool {
        self.orientation == orientation && !self.is_filled()
    }

    pub fn color(&self) -> Option<Color> {
        self.fill
    }
}
