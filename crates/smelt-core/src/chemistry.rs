//! Oxidation and combustion

use smelt_simulation::{Materials, SimRng};

use crate::grid::Grid;
use crate::stats::SimStats;

/// Run one oxidation step of `cell` against `partner`.
///
/// The step happens when `cell` is reactive, `partner` holds an oxidizer
/// and `cell` is hotter than its ignition point. Each step advances the
/// oxidation progress by the material's speed and releases
/// `threshold * speed / 2` into both cells. Once progress reaches 1 both
/// cells turn into the oxidation products and stay pinned until the next
/// update.
///
/// Returns whether a step happened.
pub fn react<R: SimRng + ?Sized>(
    grid: &mut Grid,
    materials: &Materials,
    cell: usize,
    partner: usize,
    stats: &mut dyn SimStats,
    rng: &mut R,
) -> bool {
    let material = grid.material[cell];
    let def = materials.get(material);

    if !def.is_reactive()
        || !materials.is_oxidizer(grid.material[partner])
        || grid.temperature[cell] <= def.ignition_point
    {
        return false;
    }

    let heat = def.oxidation_threshold * def.oxidation_speed / 2.0;
    grid.oxidation[cell] += def.oxidation_speed;
    grid.temperature[cell] += heat;
    grid.temperature[partner] += heat;
    stats.record_reaction();

    if grid.oxidation[cell] >= 1.0 {
        let (product, partner_product) = def.oxidation_products.pick_pair(rng);
        log::trace!(
            "{} burned out into {} + {}",
            def.name,
            materials.get(product).name,
            materials.get(partner_product).name
        );

        grid.material[cell] = product;
        grid.material[partner] = partner_product;
        grid.oxidation[cell] = 0.0;
        grid.pin(cell, materials);
        grid.pin(partner, materials);
    }

    true
}
