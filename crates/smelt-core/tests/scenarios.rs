//! End-to-end tick scenarios on small worlds

use std::sync::Arc;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use smelt_core::{MaterialId, Materials, NoopStats, Phase, Sandbox, TickStats, World};
use smelt_simulation::ProductPair;

const AMBIENT: f32 = 293.15;

fn tick(world: &mut World, rng: &mut Xoshiro256StarStar) -> TickStats {
    let mut stats = TickStats::default();
    world.update(AMBIENT, &mut stats, rng);
    world.simulate(&mut stats, rng);
    stats
}

fn cells_of(world: &World, material: u16) -> Vec<(usize, usize)> {
    world
        .grid()
        .cells()
        .filter(|(_, _, cell)| cell.material == material)
        .map(|(x, y, _)| (x, y))
        .collect()
}

// ============================================================================
// Combustion
// ============================================================================

/// Hydrogen that burns out in a single step, already above its ignition point
fn instant_hydrogen() -> Arc<Materials> {
    let materials = Materials::builder()
        .with_defaults()
        .modify(MaterialId::HYDROGEN, |def| {
            def.ignition_point = 100.0;
            def.oxidation_speed = 1.0;
            def.oxidation_products = ProductPair::fixed(MaterialId::WATER, MaterialId::NONE);
        })
        .build()
        .unwrap();
    Arc::new(materials)
}

#[test]
fn test_hydrogen_burns_to_water_in_one_tick() {
    let mut world = World::with_materials(3, 3, AMBIENT, instant_hydrogen()).unwrap();
    world.use_brush(MaterialId::OXYGEN, AMBIENT, 1, 0, 0);
    world.use_brush(MaterialId::HYDROGEN, AMBIENT, 1, 1, 0);
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    let stats = tick(&mut world, &mut rng);

    assert_eq!(world.cell(1, 1).material, MaterialId::WATER);
    assert!(world.cell(1, 0).is_empty());
    assert_eq!(world.cell(1, 0).temperature, 0.0);
    assert_eq!(stats.reactions, 1);
}

#[test]
fn test_burned_product_waits_for_next_update() {
    let mut world = World::with_materials(3, 3, AMBIENT, instant_hydrogen()).unwrap();
    world.use_brush(MaterialId::OXYGEN, AMBIENT, 1, 0, 0);
    world.use_brush(MaterialId::HYDROGEN, AMBIENT, 1, 1, 0);
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    tick(&mut world, &mut rng);
    // Pinned in place until the update re-resolves it
    assert_eq!(world.cell(1, 1).phase, Phase::Static);

    world.update(AMBIENT, &mut NoopStats, &mut rng);
    // Heat of the reaction turns the new water into steam
    assert_eq!(world.cell(1, 1).phase, Phase::Gas);
}

#[test]
fn test_fuel_burns_on_both_fronts_in_one_sweep() {
    let mut world = World::new(5, 5, AMBIENT).unwrap();
    world.use_brush(MaterialId::OXYGEN, AMBIENT, 1, 4, 0);
    world.use_brush(MaterialId::METHANE, 1500.0, 2, 4, 0);
    world.use_brush(MaterialId::OXYGEN, AMBIENT, 3, 4, 0);
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    let stats = tick(&mut world, &mut rng);

    assert_eq!(stats.reactions, 2);
    assert_eq!(world.cell(2, 4).material, MaterialId::METHANE);
    assert!((world.cell(2, 4).oxidation - 0.4).abs() < 1e-6);
}

#[test]
fn test_cold_fuel_does_not_burn() {
    let mut world = World::new(5, 5, AMBIENT).unwrap();
    world.use_brush(MaterialId::OXYGEN, AMBIENT, 2, 1, 0);
    world.use_brush(MaterialId::METHANE, AMBIENT, 2, 2, 0);
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    for _ in 0..10 {
        assert_eq!(tick(&mut world, &mut rng).reactions, 0);
    }
}

#[test]
fn test_heated_black_powder_burns_out() {
    let mut sandbox = Sandbox::new(16, 12, AMBIENT, 9).unwrap();
    sandbox.use_brush(MaterialId::OXYGEN, AMBIENT, 8, 3, 7);
    sandbox.use_brush(MaterialId::BLACK_POWDER, AMBIENT, 8, 10, 1);
    sandbox.use_heater(600.0, 8, 10, 1);

    let stats = sandbox.run(20);

    assert!(stats.reactions > 0);
    let counts = sandbox.world().material_counts();
    assert!(counts[MaterialId::BLACK_POWDER as usize] < 9);
    assert!(
        counts[MaterialId::SULFUR_TRIOXIDE as usize] + counts[MaterialId::CARBON_DIOXIDE as usize] > 0
    );
}

// ============================================================================
// Gravity
// ============================================================================

#[test]
fn test_sand_falls_one_row_per_tick() {
    let mut world = World::new(10, 10, AMBIENT).unwrap();
    world.use_brush(MaterialId::SAND, AMBIENT, 5, 0, 0);
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    for t in 1..=15 {
        tick(&mut world, &mut rng);
        let expected = t.min(9);
        assert_eq!(cells_of(&world, MaterialId::SAND), vec![(5, expected)], "tick {t}");
    }
}

#[test]
fn test_sand_piles_up() {
    let mut world = World::new(9, 8, AMBIENT).unwrap();
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    for _ in 0..6 {
        world.use_brush(MaterialId::SAND, AMBIENT, 4, 0, 0);
        for _ in 0..10 {
            tick(&mut world, &mut rng);
        }
    }

    let sand = cells_of(&world, MaterialId::SAND);
    assert_eq!(sand.len(), 6);
    // A heap, not a tower
    let highest = sand.iter().map(|&(_, y)| y).min().unwrap();
    assert!(highest >= 5, "sand stacked up to row {highest}");
}

#[test]
fn test_liquid_levels_around_obstacle() {
    let mut world = World::new(12, 6, AMBIENT).unwrap();
    world.use_brush(MaterialId::IRON, AMBIENT, 6, 3, 0);
    for x in 2..=9 {
        world.use_brush(MaterialId::WATER, AMBIENT, x, 2, 0);
    }
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    for _ in 0..50 {
        tick(&mut world, &mut rng);
    }

    let water = cells_of(&world, MaterialId::WATER);
    assert_eq!(water.len(), 8);
    for (x, y) in water {
        assert_eq!(y, 5, "water left hanging at ({x}, {y})");
    }
    assert_eq!(world.cell(6, 3).material, MaterialId::IRON);
}

#[test]
fn test_sand_sinks_below_water() {
    let mut world = World::new(5, 6, AMBIENT).unwrap();
    world.use_brush(MaterialId::WATER, AMBIENT, 2, 4, 2);
    world.use_brush(MaterialId::SAND, AMBIENT, 2, 0, 0);
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    for _ in 0..20 {
        tick(&mut world, &mut rng);
    }

    let sand = cells_of(&world, MaterialId::SAND);
    assert_eq!(sand.len(), 1);
    assert_eq!(sand[0].1, 5);
}

#[test]
fn test_gas_rests_on_liquid() {
    let mut world = World::new(6, 6, AMBIENT).unwrap();
    world.use_brush(MaterialId::WATER, AMBIENT, 2, 5, 3);
    world.use_brush(MaterialId::OXYGEN, AMBIENT, 2, 0, 0);
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    for _ in 0..20 {
        tick(&mut world, &mut rng);
    }

    let oxygen = cells_of(&world, MaterialId::OXYGEN);
    assert_eq!(oxygen.len(), 1);
    // Water fills rows 2..=5 from x=0 to x=5
    assert_eq!(oxygen[0].1, 1);
}

// ============================================================================
// Heat
// ============================================================================

#[test]
fn test_heater_melts_and_boils_water() {
    let mut world = World::new(5, 5, AMBIENT).unwrap();
    world.use_brush(MaterialId::WATER, 200.0, 2, 4, 0);
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    tick(&mut world, &mut rng);
    assert_eq!(world.cell(2, 4).phase, Phase::Static);

    world.use_heater(100.0, 2, 4, 0);
    tick(&mut world, &mut rng);
    assert_eq!(world.cell(2, 4).phase, Phase::Liquid);

    world.use_heater(100.0, 2, 4, 0);
    tick(&mut world, &mut rng);
    assert_eq!(world.cell(2, 4).phase, Phase::Gas);
}

#[test]
fn test_heat_spreads_through_metal() {
    let mut world = World::new(12, 5, AMBIENT).unwrap();
    for x in 1..=10 {
        world.use_brush(MaterialId::ALUMINUM, AMBIENT, x, 4, 0);
    }
    world.use_heater(500.0, 1, 4, 0);
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    for _ in 0..30 {
        tick(&mut world, &mut rng);
    }

    let far_end = world.cell(10, 4).temperature;
    assert!(far_end > AMBIENT, "heat never reached the far end");
    assert!(world.cell(1, 4).temperature < AMBIENT + 500.0);
}

#[test]
fn test_spawner_fills_basin() {
    let mut sandbox = Sandbox::new(8, 8, AMBIENT, 3).unwrap();
    sandbox.world_mut().set_spawner(4, 0, MaterialId::WATER);

    sandbox.run(40);

    let water = sandbox.world().material_counts()[MaterialId::WATER as usize];
    assert!(water >= 20, "only {water} water cells");
}

#[test]
fn test_drain_removes_flowing_water() {
    let mut sandbox = Sandbox::new(8, 6, AMBIENT, 3).unwrap();
    sandbox.use_brush(MaterialId::WATER, AMBIENT, 4, 1, 1);
    sandbox.use_spawner(MaterialId::NONE, 4, 5, 3);

    sandbox.run(20);

    assert_eq!(sandbox.world().material_counts()[MaterialId::WATER as usize], 0);
}
