//! Per-cell state storage
//!
//! Every field lives in its own row-major array (`y * width + x`). Phase and
//! weight are a cache of [`resolve`] for the current material and
//! temperature; only the update step, tools and reaction pinning write them.

use serde::{Deserialize, Serialize};
use smelt_simulation::{MaterialId, Materials, Phase, resolve};

/// Copy of every field of one cell
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub material: u16,
    pub temperature: f32,
    pub oxidation: f32,
    pub phase: Phase,
    pub weight: f32,
    /// Material injected every update, if this cell is a spawner
    pub spawner: Option<u16>,
}

impl CellView {
    pub fn is_empty(&self) -> bool {
        self.material == MaterialId::NONE
    }
}

/// Dense W×H cell store
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    pub(crate) material: Vec<u16>,
    pub(crate) temperature: Vec<f32>,
    pub(crate) oxidation: Vec<f32>,
    pub(crate) phase: Vec<Phase>,
    pub(crate) weight: Vec<f32>,
    pub(crate) spawner: Vec<Option<u16>>,
}

impl Grid {
    /// Empty grid with every cell at `ambient_temperature`.
    ///
    /// Size validation is the caller's job, see `World::new`.
    pub(crate) fn new(width: usize, height: usize, ambient_temperature: f32) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            material: vec![MaterialId::NONE; len],
            temperature: vec![ambient_temperature; len],
            oxidation: vec![0.0; len],
            phase: vec![Phase::Static; len],
            weight: vec![0.0; len],
            spawner: vec![None; len],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.material.len()
    }

    pub fn is_empty(&self) -> bool {
        self.material.is_empty()
    }

    /// Whether signed coordinates fall inside the grid
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Array index of a cell
    ///
    /// Panics when the coordinates are outside the grid.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Coordinates of an array index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    pub fn material(&self, x: usize, y: usize) -> u16 {
        self.material[self.index(x, y)]
    }

    pub fn temperature(&self, x: usize, y: usize) -> f32 {
        self.temperature[self.index(x, y)]
    }

    pub fn oxidation(&self, x: usize, y: usize) -> f32 {
        self.oxidation[self.index(x, y)]
    }

    pub fn phase(&self, x: usize, y: usize) -> Phase {
        self.phase[self.index(x, y)]
    }

    pub fn weight(&self, x: usize, y: usize) -> f32 {
        self.weight[self.index(x, y)]
    }

    pub fn spawner(&self, x: usize, y: usize) -> Option<u16> {
        self.spawner[self.index(x, y)]
    }

    pub fn cell(&self, x: usize, y: usize) -> CellView {
        self.view(self.index(x, y))
    }

    /// All cells in row-major order with their coordinates
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, CellView)> + '_ {
        (0..self.len()).map(|i| {
            let (x, y) = self.coords(i);
            (x, y, self.view(i))
        })
    }

    /// Number of cells holding each material, indexed by material id
    pub fn material_counts(&self, material_count: usize) -> Vec<usize> {
        let mut counts = vec![0; material_count];
        for &material in &self.material {
            counts[material as usize] += 1;
        }
        counts
    }

    /// Sum of temperatures over all non-empty cells
    pub fn total_heat(&self) -> f64 {
        self.material
            .iter()
            .zip(&self.temperature)
            .filter(|(material, _)| **material != MaterialId::NONE)
            .map(|(_, &temperature)| f64::from(temperature))
            .sum()
    }

    pub(crate) fn view(&self, i: usize) -> CellView {
        CellView {
            material: self.material[i],
            temperature: self.temperature[i],
            oxidation: self.oxidation[i],
            phase: self.phase[i],
            weight: self.weight[i],
            spawner: self.spawner[i],
        }
    }

    /// Exchange the contents of two cells.
    ///
    /// Spawner settings belong to the position and stay put.
    #[inline]
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.material.swap(a, b);
        self.temperature.swap(a, b);
        self.oxidation.swap(a, b);
        self.phase.swap(a, b);
        self.weight.swap(a, b);
    }

    /// Empty a cell, resetting everything but its spawner
    pub(crate) fn clear(&mut self, i: usize) {
        self.material[i] = MaterialId::NONE;
        self.temperature[i] = 0.0;
        self.oxidation[i] = 0.0;
        self.phase[i] = Phase::Static;
        self.weight[i] = 0.0;
    }

    /// Re-derive phase and weight from the current material and temperature
    pub(crate) fn refresh(&mut self, i: usize, materials: &Materials) {
        let resolution = resolve(materials.get(self.material[i]), self.temperature[i]);
        self.phase[i] = resolution.phase;
        self.weight[i] = resolution.weight;
    }

    /// Hold a cell whose material was replaced mid-sweep in place until the
    /// next update re-resolves it. Cells that became empty are cleared.
    pub(crate) fn pin(&mut self, i: usize, materials: &Materials) {
        let material = self.material[i];
        if material == MaterialId::NONE {
            self.clear(i);
        } else {
            self.phase[i] = Phase::Static;
            self.weight[i] = materials.density(material);
        }
    }
}
