//! Invariants that hold for any grid contents

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use smelt_core::{CellView, MaterialId, Materials, NoopStats, Phase, World};

const AMBIENT: f32 = 293.15;

/// Materials that neither react nor decompose at these temperatures
const INERT: [u16; 8] = [
    MaterialId::SAND,
    MaterialId::GLASS,
    MaterialId::WATER,
    MaterialId::OXYGEN,
    MaterialId::CARBON_DIOXIDE,
    MaterialId::SULFUR,
    MaterialId::SULFURIC_ACID,
    MaterialId::CALCIUM_OXIDE,
];

/// Built-in materials with heat conduction switched off
fn insulated() -> Arc<Materials> {
    let mut builder = Materials::builder().with_defaults();
    for id in 0..MaterialId::BUILTIN_COUNT as u16 {
        builder = builder.modify(id, |def| def.thermal_conductivity = 0.0);
    }
    Arc::new(builder.build().unwrap())
}

/// World randomly filled with inert materials, about a third left empty
fn random_world(materials: Arc<Materials>, seed: u64) -> (World, Xoshiro256StarStar) {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let mut world = World::with_materials(24, 18, AMBIENT, materials).unwrap();

    for y in 0..18 {
        for x in 0..24 {
            if rng.gen_bool(0.35) {
                continue;
            }
            let material = INERT[rng.gen_range(0..INERT.len())];
            let temperature = rng.gen_range(250.0..350.0);
            world.use_brush(material, temperature, x, y, 0);
        }
    }

    (world, rng)
}

fn snapshot(world: &World) -> Vec<CellView> {
    world.grid().cells().map(|(_, _, cell)| cell).collect()
}

fn sorted_contents(world: &World) -> Vec<(u16, u32, u32)> {
    let mut contents: Vec<_> = world
        .grid()
        .cells()
        .map(|(_, _, c)| (c.material, c.temperature.to_bits(), c.oxidation.to_bits()))
        .collect();
    contents.sort_unstable();
    contents
}

#[test]
fn test_simulate_only_permutes_cells() {
    for seed in 0..5 {
        let (mut world, mut rng) = random_world(insulated(), seed);
        world.update(AMBIENT, &mut NoopStats, &mut rng);
        let before = sorted_contents(&world);

        world.simulate(&mut NoopStats, &mut rng);

        assert_eq!(sorted_contents(&world), before, "seed {seed}");
    }
}

#[test]
fn test_material_counts_survive_many_ticks() {
    let (mut world, mut rng) = random_world(Materials::shared(), 11);
    world.update(AMBIENT, &mut NoopStats, &mut rng);
    let before = world.material_counts();

    for _ in 0..40 {
        world.update(AMBIENT, &mut NoopStats, &mut rng);
        world.simulate(&mut NoopStats, &mut rng);
    }

    assert_eq!(world.material_counts(), before);
}

#[test]
fn test_static_cells_never_move() {
    for seed in 0..5 {
        let (mut world, mut rng) = random_world(Materials::shared(), seed);
        world.update(AMBIENT, &mut NoopStats, &mut rng);

        let anchored: Vec<_> = world
            .grid()
            .cells()
            .filter(|(_, _, c)| !c.is_empty() && c.phase == Phase::Static)
            .map(|(x, y, c)| (x, y, c.material))
            .collect();
        assert!(!anchored.is_empty());

        world.simulate(&mut NoopStats, &mut rng);

        for (x, y, material) in anchored {
            assert_eq!(world.cell(x, y).material, material, "seed {seed}: ({x}, {y}) moved");
        }
    }
}

#[test]
fn test_update_is_idempotent() {
    let (mut world, mut rng) = random_world(Materials::shared(), 21);
    world.set_spawner(5, 0, MaterialId::WATER);
    world.set_spawner(9, 0, MaterialId::NONE);

    world.update(AMBIENT, &mut NoopStats, &mut rng);
    let first = snapshot(&world);
    world.update(AMBIENT, &mut NoopStats, &mut rng);

    assert_eq!(snapshot(&world), first);
}

#[test]
fn test_phase_cache_matches_temperature_after_update() {
    let (mut world, mut rng) = random_world(Materials::shared(), 8);
    for _ in 0..5 {
        world.update(AMBIENT, &mut NoopStats, &mut rng);
        world.simulate(&mut NoopStats, &mut rng);
    }
    world.update(AMBIENT, &mut NoopStats, &mut rng);

    let materials = world.materials();
    for (x, y, cell) in world.grid().cells() {
        let expected = smelt_simulation::resolve(materials.get(cell.material), cell.temperature);
        assert_eq!(cell.phase, expected.phase, "({x}, {y})");
        assert_eq!(cell.weight, expected.weight, "({x}, {y})");
    }
}

#[test]
fn test_empty_cells_are_static_and_weightless() {
    let (mut world, mut rng) = random_world(Materials::shared(), 5);
    for _ in 0..10 {
        world.update(AMBIENT, &mut NoopStats, &mut rng);
        world.simulate(&mut NoopStats, &mut rng);
    }

    for (_, _, cell) in world.grid().cells().filter(|(_, _, c)| c.is_empty()) {
        assert_eq!(cell.phase, Phase::Static);
        assert_eq!(cell.weight, 0.0);
    }
}

#[test]
fn test_temperatures_stay_non_negative() {
    let (mut world, mut rng) = random_world(Materials::shared(), 13);
    world.use_cooler(1000.0, 12, 9, 6);

    for _ in 0..20 {
        world.update(AMBIENT, &mut NoopStats, &mut rng);
        world.simulate(&mut NoopStats, &mut rng);
    }

    assert!(world.grid().cells().all(|(_, _, c)| c.temperature >= 0.0));
}
