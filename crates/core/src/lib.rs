//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules and state management for the
//! triangle-and-hexagon puzzle. It has **no dependencies** on rendering, input,
//! networking, or storage, which makes it:
//!
//! - **Deterministic**: same seed produces identical figure sequences
//! - **Testable**: every rule is a pure query or an explicit mutation
//! - **Portable**: usable from a touch UI, a terminal, a bot, or a server
//!
//! # Module Structure
//!
//! - [`board`]: triangle grid, placement legality, placement and hexagon clearing
//! - [`figure`]: figures, ring rotation, absolute cell mapping
//! - [`hexagon`]: the six-triangle scoring unit and its completion check
//! - [`layout`]: board shape, cell geometry for drop resolution, board config
//! - [`rng`]: injectable random source and the figure factory
//! - [`scoring`]: point awards, best-score store
//! - [`session`]: the turn cycle (pool, drops, no-legal-move check, restart)
//! - [`snapshot`]: plain-data views for observers
//!
//! # Game Rules
//!
//! - **Board**: 6 rows of alternating up/down triangles, 7-9-11-11-9-7 wide
//! - **Figures**: 1 to 6 triangles taken along the ring, one color each
//! - **Rotation**: every triangle steps one ring slot and flips orientation
//! - **Placement**: all triangles must land on empty cells of matching orientation
//! - **Clearing**: a hexagon whose six cells share one color is emptied (+60)
//! - **Scoring**: 1 point per placed triangle plus hexagon bonuses
//! - **Game over**: no offered figure fits anywhere in any rotation
//!
//! # Example
//!
//! ```
//! use hexfill_core::{Board, Figure};
//! use hexfill_core::types::{Color, Position};
//!
//! let mut board = Board::new();
//! let figure = Figure::new(Color::Blue, 3);
//!
//! assert!(board.can_place(&figure, Position::new(2, 0)));
//! let result = board.try_place_at(&figure, Position::new(2, 0));
//! assert!(result.accepted);
//! assert_eq!(result.cells_filled, 3);
//!
//! // the same spot is now taken
//! assert!(!board.can_place(&figure, Position::new(2, 0)));
//! ```

pub mod board;
pub mod error;
pub mod figure;
pub mod hexagon;
pub mod layout;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use hexfill_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, PlacementResult, Targets};
pub use error::{BoardError, FigureError};
pub use figure::{Figure, FigureCell, PlacedCell};
pub use hexagon::Hexagon;
pub use layout::{BoardConfig, BoardLayout, CellGeometry, Rect};
pub use rng::{FigureFactory, RandomSource, SimpleRng};
pub use scoring::{calculate_drop_score, BestScoreStore, MemoryBestScore, Scoreboard};
pub use session::{has_legal_move, DropOutcome, GameSession, SessionConfig};
pub use snapshot::{FigureSnapshot, SessionSnapshot};
