//! Sandbox - a world bundled with its random source and counters
//!
//! Hosts that tick from another thread wrap one `Sandbox` in one lock; a
//! tick and every tool call each hold it for their whole duration.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::error::WorldError;
use crate::stats::TickStats;
use crate::tools::Tool;
use crate::world::World;

pub struct Sandbox {
    world: World,
    rng: Xoshiro256StarStar,
    spawner_temperature: f32,
    ticks: u64,
    totals: TickStats,
}

impl Sandbox {
    /// Empty world with the built-in materials. Spawners inject at ambient
    /// temperature until changed.
    pub fn new(width: usize, height: usize, ambient_temperature: f32, seed: u64) -> Result<Self, WorldError> {
        Ok(Self::with_world(World::new(width, height, ambient_temperature)?, seed))
    }

    pub fn with_world(world: World, seed: u64) -> Self {
        Self {
            spawner_temperature: world.ambient_temperature(),
            world,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            ticks: 0,
            totals: TickStats::default(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn spawner_temperature(&self) -> f32 {
        self.spawner_temperature
    }

    pub fn set_spawner_temperature(&mut self, temperature: f32) {
        self.spawner_temperature = temperature;
    }

    /// Completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Counters summed over every update and simulate so far
    pub fn totals(&self) -> TickStats {
        self.totals
    }

    pub fn update(&mut self) -> TickStats {
        let mut stats = TickStats::default();
        self.world
            .update(self.spawner_temperature, &mut stats, &mut self.rng);
        self.totals += stats;
        stats
    }

    pub fn simulate(&mut self) -> TickStats {
        let mut stats = TickStats::default();
        self.world.simulate(&mut stats, &mut self.rng);
        self.totals += stats;
        stats
    }

    /// Update then simulate, returning this tick's counters
    pub fn tick(&mut self) -> TickStats {
        let mut stats = self.update();
        stats += self.simulate();
        self.ticks += 1;

        log::trace!(
            "Tick {}: {} moved, {} state changes, {} reactions",
            self.ticks,
            stats.cells_moved,
            stats.state_changes,
            stats.reactions
        );
        stats
    }

    /// Run `count` ticks, returning their summed counters
    pub fn run(&mut self, count: u64) -> TickStats {
        let mut stats = TickStats::default();
        for _ in 0..count {
            stats += self.tick();
        }
        stats
    }

    pub fn apply_tool(&mut self, tool: Tool, center_x: i32, center_y: i32, radius: u32) -> usize {
        self.world.apply_tool(tool, center_x, center_y, radius)
    }

    pub fn use_brush(&mut self, material: u16, temperature: f32, center_x: i32, center_y: i32, radius: u32) {
        self.world
            .use_brush(material, temperature, center_x, center_y, radius);
    }

    pub fn use_eraser(&mut self, center_x: i32, center_y: i32, radius: u32) {
        self.world.use_eraser(center_x, center_y, radius);
    }

    pub fn use_heater(&mut self, delta: f32, center_x: i32, center_y: i32, radius: u32) {
        self.world.use_heater(delta, center_x, center_y, radius);
    }

    pub fn use_cooler(&mut self, delta: f32, center_x: i32, center_y: i32, radius: u32) {
        self.world.use_cooler(delta, center_x, center_y, radius);
    }

    pub fn use_spawner(&mut self, material: u16, center_x: i32, center_y: i32, radius: u32) {
        self.world.use_spawner(material, center_x, center_y, radius);
    }
}
