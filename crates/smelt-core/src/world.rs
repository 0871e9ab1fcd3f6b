//! World - owns the grid and runs the tick pipeline
//!
//! A tick is [`World::update`] followed by [`World::simulate`]. Tools may
//! change the grid between the two calls or between ticks, never during one.

use std::sync::Arc;

use smelt_simulation::{LIQUID_WEIGHT_FACTOR, MaterialId, Materials, Phase, SimRng, resolve};

use crate::chemistry;
use crate::error::WorldError;
use crate::gravity::Gravity;
use crate::grid::{CellView, Grid};
use crate::stats::SimStats;
use crate::sweep::{Sweep, Visit};
use crate::thermal;
use crate::tools::Tool;

/// Smallest width and height the sweep supports
pub const MIN_SIDE: usize = 3;

/// Falling-sand world
pub struct World {
    grid: Grid,
    materials: Arc<Materials>,
    ambient_temperature: f32,
}

impl World {
    /// Empty world using the built-in materials
    pub fn new(width: usize, height: usize, ambient_temperature: f32) -> Result<Self, WorldError> {
        Self::with_materials(width, height, ambient_temperature, Materials::shared())
    }

    pub fn with_materials(
        width: usize,
        height: usize,
        ambient_temperature: f32,
        materials: Arc<Materials>,
    ) -> Result<Self, WorldError> {
        if width < MIN_SIDE || height < MIN_SIDE {
            return Err(WorldError::DegenerateSize { width, height });
        }
        if width.checked_mul(height).is_none() {
            return Err(WorldError::TooLarge { width, height });
        }
        if ambient_temperature.is_nan() || ambient_temperature < 0.0 {
            return Err(WorldError::InvalidTemperature(ambient_temperature));
        }

        log::debug!(
            "Created {}x{} world at {:.2}K with {} materials",
            width,
            height,
            ambient_temperature,
            materials.len()
        );

        Ok(Self {
            grid: Grid::new(width, height, ambient_temperature),
            materials,
            ambient_temperature,
        })
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn ambient_temperature(&self) -> f32 {
        self.ambient_temperature
    }

    /// Read access to every cell
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn materials(&self) -> &Materials {
        &self.materials
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.grid.in_bounds(x, y)
    }

    /// Panics when (x, y) is outside the grid
    pub fn cell(&self, x: usize, y: usize) -> CellView {
        self.grid.cell(x, y)
    }

    /// Cells per material, indexed by material id
    pub fn material_counts(&self) -> Vec<usize> {
        self.grid.material_counts(self.materials.len())
    }

    pub fn total_heat(&self) -> f64 {
        self.grid.total_heat()
    }

    /// Inject spawner contents and resolve every cell's phase and weight.
    ///
    /// Cells that melt into a material with melt products are replaced by
    /// that product here. Call before [`World::simulate`].
    pub fn update<R: SimRng + ?Sized>(
        &mut self,
        spawner_temperature: f32,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        for i in 0..self.grid.len() {
            match self.grid.spawner[i] {
                Some(MaterialId::NONE) => self.grid.clear(i),
                Some(material) => {
                    self.grid.material[i] = material;
                    self.grid.temperature[i] = spawner_temperature;
                }
                None => {}
            }

            self.resolve_cell(i, stats, rng);
        }
    }

    fn resolve_cell<R: SimRng + ?Sized>(&mut self, i: usize, stats: &mut dyn SimStats, rng: &mut R) {
        let material = self.grid.material[i];
        let previous_phase = self.grid.phase[i];
        let mut resolution = resolve(self.materials.get(material), self.grid.temperature[i]);

        if resolution.phase == Phase::Liquid
            && let Some(product) = self.materials.melt_product(material, rng)
            && product != MaterialId::NONE
            && product != material
        {
            self.grid.material[i] = product;
            resolution.weight = self.materials.density(product) * LIQUID_WEIGHT_FACTOR;
            stats.record_state_change();
        } else if resolution.phase != previous_phase {
            stats.record_state_change();
        }

        self.grid.phase[i] = resolution.phase;
        self.grid.weight[i] = resolution.weight;
    }

    /// Run one sweep of conduction, reaction and displacement.
    ///
    /// Call after [`World::update`] so cached phases match temperatures.
    pub fn simulate<R: SimRng + ?Sized>(&mut self, stats: &mut dyn SimStats, rng: &mut R) {
        for visit in Sweep::new(self.grid.width(), self.grid.height()) {
            let i = self.grid.index(visit.x, visit.y);
            if self.grid.material[i] == MaterialId::NONE {
                continue;
            }

            for &offset in visit.region.conduction_neighbors() {
                let neighbor = self.neighbor(visit, offset);
                thermal::conduct(&mut self.grid, &self.materials, i, neighbor);
            }

            for &offset in visit.region.reaction_neighbors() {
                let neighbor = self.neighbor(visit, offset);
                chemistry::react(&mut self.grid, &self.materials, i, neighbor, stats, rng);
            }

            if visit.region.applies_gravity() {
                Gravity::apply(&mut self.grid, visit.x, visit.y, stats);
            }
        }
    }

    #[inline]
    fn neighbor(&self, visit: Visit, (dx, dy): (i32, i32)) -> usize {
        self.grid.index(
            visit.x.wrapping_add_signed(dx as isize),
            visit.y.wrapping_add_signed(dy as isize),
        )
    }

    /// Fill a square with `material` at `temperature`
    pub fn use_brush(&mut self, material: u16, temperature: f32, center_x: i32, center_y: i32, radius: u32) {
        self.apply_tool(
            Tool::Brush {
                material,
                temperature,
            },
            center_x,
            center_y,
            radius,
        );
    }

    /// Empty a square and remove its spawners
    pub fn use_eraser(&mut self, center_x: i32, center_y: i32, radius: u32) {
        self.apply_tool(Tool::Eraser, center_x, center_y, radius);
    }

    pub fn use_heater(&mut self, delta: f32, center_x: i32, center_y: i32, radius: u32) {
        self.apply_tool(Tool::Heater { delta }, center_x, center_y, radius);
    }

    /// Lower temperatures in a square, stopping at 0 K
    pub fn use_cooler(&mut self, delta: f32, center_x: i32, center_y: i32, radius: u32) {
        self.apply_tool(Tool::Cooler { delta }, center_x, center_y, radius);
    }

    /// Turn a square into spawners of `material`
    pub fn use_spawner(&mut self, material: u16, center_x: i32, center_y: i32, radius: u32) {
        self.apply_tool(Tool::Spawner { material }, center_x, center_y, radius);
    }

    /// Apply any tool, returning the number of cells it touched
    pub fn apply_tool(&mut self, tool: Tool, center_x: i32, center_y: i32, radius: u32) -> usize {
        tool.apply(&mut self.grid, &self.materials, center_x, center_y, radius)
    }

    /// Make a single cell a spawner. Panics outside the grid.
    pub fn set_spawner(&mut self, x: usize, y: usize, material: u16) {
        assert!(
            self.materials.contains(material),
            "spawner with unknown material id {material}"
        );
        let i = self.grid.index(x, y);
        self.grid.spawner[i] = Some(material);
    }

    /// Stop a single cell from spawning. Panics outside the grid.
    pub fn clear_spawner(&mut self, x: usize, y: usize) {
        let i = self.grid.index(x, y);
        self.grid.spawner[i] = None;
    }
}
