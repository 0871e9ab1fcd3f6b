//! Falling-sand simulation core for smelt
//!
//! Owns the cell grid and the tick pipeline: phase update, heat conduction,
//! oxidation and gravity-driven displacement, plus the editing tools hosts
//! apply between ticks.

pub mod chemistry;
mod error;
pub mod gravity;
pub mod grid;
mod sandbox;
pub mod stats;
pub mod sweep;
pub mod thermal;
pub mod tools;
mod world;

pub use error::WorldError;
pub use grid::{CellView, Grid};
pub use sandbox::Sandbox;
pub use stats::{NoopStats, SimStats, TickStats};
pub use tools::Tool;
pub use world::{MIN_SIDE, World};

// Material data lives in smelt-simulation; re-exported for hosts
pub use smelt_simulation::{MaterialDef, MaterialId, Materials, Phase, SimRng};
