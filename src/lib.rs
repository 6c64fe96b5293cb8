//! Hexfill (workspace facade crate).
//!
//! Re-exports the workspace crates as `hexfill::{core,engine,adapter,types}` and
//! hosts the headless autoplay driver used by the binary.

pub mod autoplay;

pub use hexfill_adapter as adapter;
pub use hexfill_core as core;
pub use hexfill_engine as engine;
pub use hexfill_types as types;
