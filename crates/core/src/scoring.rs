//! Scoring module - point awards and best-score tracking
//!
//! A successful drop is worth `cells_filled * points_per_cell` plus the hexagon
//! bonus the board reported. The current score only grows within a session; the
//! best score only grows across sessions and is written through a
//! [`BestScoreStore`] whenever it changes.

use crate::board::PlacementResult;

/// Points for one placement
pub fn calculate_drop_score(result: &PlacementResult, points_per_cell: u32) -> u32 {
    if !result.accepted {
        return 0;
    }
    result
        .cells_filled
        .saturating_mul(points_per_cell)
        .saturating_add(result.bonus_points)
}

/// Persistence for the single best-score value
pub trait BestScoreStore {
    fn get(&self) -> u32;
    fn set(&mut self, score: u32);
}

/// Best score held in memory only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryBestScore(pub u32);

impl BestScoreStore for MemoryBestScore {
    fn get(&self) -> u32 {
        self.0
    }

    fn set(&mut self, score: u32) {
        self.0 = score;
    }
}

impl<S: BestScoreStore + ?Sized> BestScoreStore for Box<S> {
    fn get(&self) -> u32 {
        (**self).get()
    }

    fn set(&mut self, score: u32) {
        (**self).set(score)
    }
}

/// Current and best score of one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    score: u32,
    best: u32,
}

impl Scoreboard {
    pub fn new(best: u32) -> Self {
        Self { score: 0, best }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Add points; returns true if this raised the best score
    pub fn add(&mut self, points: u32) -> bool {
        self.score = self.score.saturating_add(points);
        if self.score > self.best {
            self.best = self.score;
            true
        } else {
            false
        }
    }

    /// Start a new round; the best score is kept
    pub fn reset(&mut self) {
        self.score = 0;
    }
}
