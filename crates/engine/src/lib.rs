//! Placement planner
//!
//! Works purely through the core's public queries: enumerate where a figure
//! fits, simulate a drop on a cloned board, and pick the best move. The adapter
//! serves these as hints and the binary uses them for autoplay.

pub mod place;

pub use place::{apply_place, best_hint, evaluate, legal_placements, Evaluation, PlaceError, Placement};
