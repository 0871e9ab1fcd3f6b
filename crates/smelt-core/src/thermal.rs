//! Heat exchange between axis neighbors

use smelt_simulation::{MaterialId, Materials};

use crate::grid::Grid;

/// Exchange heat between cells `a` and `b`.
///
/// Both sides move toward each other by the mean of their conductivities,
/// computed from the temperatures before the exchange, so the pair's total
/// is unchanged. Empty cells neither give nor take heat.
#[inline]
pub fn conduct(grid: &mut Grid, materials: &Materials, a: usize, b: usize) {
    let (material_a, material_b) = (grid.material[a], grid.material[b]);
    if material_a == MaterialId::NONE || material_b == MaterialId::NONE {
        return;
    }

    let combined = (materials.thermal_conductivity(material_a)
        + materials.thermal_conductivity(material_b))
        / 2.0;
    let (ta, tb) = (grid.temperature[a], grid.temperature[b]);

    grid.temperature[a] = ta + (tb - ta) * combined;
    grid.temperature[b] = tb + (ta - tb) * combined;
}
