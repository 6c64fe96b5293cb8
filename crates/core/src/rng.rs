//! RNG module - random figure generation
//!
//! Figures get a uniformly random palette color and a uniformly random size in
//! 1..=6. The random source is a trait so sessions can be driven by scripted
//! sequences in tests; [`SimpleRng`] is the deterministic default.

use crate::figure::Figure;
use crate::types::{Color, FIGURE_MAX_CELLS};

/// Source of random numbers for figure generation
pub trait RandomSource {
    /// Next raw 32-bit value
    fn next_u32(&mut self) -> u32;

    /// Value in `[0, max)`; `max` must be non-zero
    fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // Low bits of a power-of-two LCG cycle quickly; hand out the high half.
        self.state >> 16
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// Builds the figures offered to the player
#[derive(Debug, Clone, Copy, Default)]
pub struct FigureFactory;

impl FigureFactory {
    /// Random color first, then random size
    pub fn make_figure<R: RandomSource + ?Sized>(rng: &mut R) -> Figure {
        let color = Color::ALL[rng.next_range(Color::ALL.len() as u32) as usize];
        let cell_count = rng.next_range(FIGURE_MAX_CELLS as u32) as usize + 1;
        Figure::new(color, cell_count)
    }
}
