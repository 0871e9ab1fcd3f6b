//! Physical phase and phase resolution
//!
//! A cell's phase and effective weight are derived from its material and
//! temperature. They are recomputed on every update and only cached in the
//! grid, never set independently.

use crate::{MaterialDef, MaterialId};
use serde::{Deserialize, Serialize};

/// Weight multiplier applied to the material density while liquid
pub const LIQUID_WEIGHT_FACTOR: f32 = 0.95;

/// Weight multiplier applied to the material density while gaseous
pub const GAS_WEIGHT_FACTOR: f32 = 0.90;

/// Kelvin above the boiling point at which a gas would lose all of its weight.
///
/// This is a heuristic decay that makes hot gas lighter than cool gas of the
/// same material, not a physical law.
pub const GAS_WEIGHT_DECAY: f32 = 5000.0;

/// How a cell behaves physically
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Doesn't move (iron, glass, empty space)
    #[default]
    Static,
    /// Falls, piles up (sand, rust)
    Grain,
    /// Flows, seeks level
    Liquid,
    /// Displaces like a liquid, but lighter
    Gas,
}

impl Phase {
    /// Whether the displacement engine moves cells in this phase
    pub fn is_mobile(self) -> bool {
        !matches!(self, Phase::Static)
    }

    /// Whether this phase stops a sideways liquid/gas scan
    pub fn blocks_flow(self) -> bool {
        matches!(self, Phase::Static | Phase::Grain)
    }
}

/// Phase and displacement weight of a material at a temperature
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub phase: Phase,
    pub weight: f32,
}

impl Resolution {
    pub const EMPTY: Resolution = Resolution {
        phase: Phase::Static,
        weight: 0.0,
    };
}

/// Resolve the phase and weight of `def` at `temperature` (Kelvin).
///
/// Melt decomposition is not applied here; see the grid update.
pub fn resolve(def: &MaterialDef, temperature: f32) -> Resolution {
    if def.id == MaterialId::NONE {
        return Resolution::EMPTY;
    }

    if temperature < def.melting_point {
        Resolution {
            phase: def.solid_phase,
            weight: def.density,
        }
    } else if temperature < def.boiling_point {
        Resolution {
            phase: Phase::Liquid,
            weight: def.density * LIQUID_WEIGHT_FACTOR,
        }
    } else {
        Resolution {
            phase: Phase::Gas,
            weight: gas_weight(def, temperature),
        }
    }
}

fn gas_weight(def: &MaterialDef, temperature: f32) -> f32 {
    let weight = def.density * GAS_WEIGHT_FACTOR;
    let excess = (temperature - def.boiling_point) / GAS_WEIGHT_DECAY;
    (weight - weight * excess).max(0.0)
}
