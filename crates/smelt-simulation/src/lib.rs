//! Material simulation data for smelt
//!
//! This crate provides the foundational, side-effect free pieces of the engine:
//! - Material definitions and the registry (MaterialId, MaterialDef, Materials)
//! - Physical phase and phase resolution (Phase, resolve)
//! - The random source abstraction used for randomized products (SimRng)

mod materials;
mod phase;
mod rng;

pub use materials::{
    MaterialDef, MaterialId, Materials, MaterialsBuilder, ProductPair, RegistryError,
};
pub use phase::{
    GAS_WEIGHT_DECAY, GAS_WEIGHT_FACTOR, LIQUID_WEIGHT_FACTOR, Phase, Resolution, resolve,
};
pub use rng::SimRng;
