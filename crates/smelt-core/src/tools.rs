//! Editing tools applied between ticks
//!
//! Tools act on a square of side `2 * radius + 1` around a center point.
//! The square is clipped to the grid, so centers off the grid are fine;
//! material ids must still exist in the registry.

use serde::{Deserialize, Serialize};
use smelt_simulation::{MaterialId, Materials};

use crate::grid::Grid;

/// Inclusive cell rectangle clipped to a grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Area {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
}

impl Area {
    /// Square around (`center_x`, `center_y`) clipped to `width` x `height`,
    /// or `None` when nothing of it is left.
    pub fn clamped(width: usize, height: usize, center_x: i32, center_y: i32, radius: u32) -> Option<Self> {
        let r = i64::from(radius);
        let (cx, cy) = (i64::from(center_x), i64::from(center_y));

        let x1 = (cx - r).max(0);
        let y1 = (cy - r).max(0);
        let x2 = (cx + r).min(width as i64 - 1);
        let y2 = (cy + r).min(height as i64 - 1);

        if x1 > x2 || y1 > y2 {
            return None;
        }
        Some(Self {
            x1: x1 as usize,
            y1: y1 as usize,
            x2: x2 as usize,
            y2: y2 as usize,
        })
    }

    pub fn cell_count(&self) -> usize {
        (self.x2 - self.x1 + 1) * (self.y2 - self.y1 + 1)
    }

    /// Array indices of every covered cell
    pub fn indices<'a>(&self, grid: &'a Grid) -> impl Iterator<Item = usize> + 'a {
        let Area { x1, y1, x2, y2 } = *self;
        (y1..=y2).flat_map(move |y| (x1..=x2).map(move |x| grid.index(x, y)))
    }
}

/// Editing operation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Tool {
    /// Fill with a material at a temperature
    Brush { material: u16, temperature: f32 },
    /// Empty cells and remove spawners
    Eraser,
    /// Raise temperature
    Heater { delta: f32 },
    /// Lower temperature, never below absolute zero
    Cooler { delta: f32 },
    /// Turn cells into spawners of a material; empty space makes drains
    Spawner { material: u16 },
}

impl Tool {
    /// Tool display name
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Brush { .. } => "Brush",
            Tool::Eraser => "Eraser",
            Tool::Heater { .. } => "Heater",
            Tool::Cooler { .. } => "Cooler",
            Tool::Spawner { .. } => "Spawner",
        }
    }

    /// Apply to the clipped square, returning how many cells it touched
    pub(crate) fn apply(
        &self,
        grid: &mut Grid,
        materials: &Materials,
        center_x: i32,
        center_y: i32,
        radius: u32,
    ) -> usize {
        if let Tool::Brush { material, .. } | Tool::Spawner { material } = *self {
            assert!(
                materials.contains(material),
                "{} with unknown material id {material}",
                self.name()
            );
        }

        let Some(area) = Area::clamped(grid.width(), grid.height(), center_x, center_y, radius)
        else {
            return 0;
        };

        let indices: Vec<usize> = area.indices(grid).collect();
        for &i in &indices {
            match *self {
                Tool::Brush {
                    material: MaterialId::NONE,
                    ..
                } => grid.clear(i),
                Tool::Brush {
                    material,
                    temperature,
                } => {
                    grid.material[i] = material;
                    grid.temperature[i] = temperature;
                    grid.refresh(i, materials);
                }
                Tool::Eraser => {
                    grid.clear(i);
                    grid.spawner[i] = None;
                }
                Tool::Heater { delta } => {
                    grid.temperature[i] += delta;
                    grid.refresh(i, materials);
                }
                Tool::Cooler { delta } => {
                    grid.temperature[i] = (grid.temperature[i] - delta).max(0.0);
                    grid.refresh(i, materials);
                }
                Tool::Spawner { material } => {
                    grid.spawner[i] = Some(material);
                }
            }
        }

        log::trace!(
            "{} touched {} cells around ({center_x}, {center_y})",
            self.name(),
            indices.len()
        );
        indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smelt_simulation::Phase;

    #[test]
    fn test_area_inside_grid() {
        let area = Area::clamped(10, 10, 5, 5, 2).unwrap();
        assert_eq!(
            area,
            Area {
                x1: 3,
                y1: 3,
                x2: 7,
                y2: 7
            }
        );
        assert_eq!(area.cell_count(), 25);
    }

    #[test]
    fn test_area_clipped_at_corner() {
        let area = Area::clamped(10, 8, 0, 7, 3).unwrap();
        assert_eq!(
            area,
            Area {
                x1: 0,
                y1: 4,
                x2: 3,
                y2: 7
            }
        );
    }

    #[test]
    fn test_area_off_grid_is_none() {
        assert_eq!(Area::clamped(10, 10, -5, 2, 1), None);
        assert_eq!(Area::clamped(10, 10, 2, 20, 3), None);
        assert!(Area::clamped(10, 10, -5, 2, 5).is_some());
    }

    #[test]
    fn test_zero_radius_is_single_cell() {
        assert_eq!(Area::clamped(4, 4, 1, 2, 0).map(|a| a.cell_count()), Some(1));
    }

    #[test]
    fn test_brush_sets_material_and_phase() {
        let materials = Materials::new();
        let mut grid = Grid::new(5, 5, 293.15);

        let touched = Tool::Brush {
            material: MaterialId::WATER,
            temperature: 300.0,
        }
        .apply(&mut grid, &materials, 0, 0, 1);

        assert_eq!(touched, 4);
        assert_eq!(grid.material(1, 1), MaterialId::WATER);
        assert_eq!(grid.temperature(1, 1), 300.0);
        assert_eq!(grid.phase(1, 1), Phase::Liquid);
        assert_eq!(grid.material(2, 2), MaterialId::NONE);
    }

    #[test]
    #[should_panic(expected = "unknown material id")]
    fn test_brush_with_unknown_material_panics() {
        let materials = Materials::new();
        let mut grid = Grid::new(5, 5, 293.15);

        Tool::Brush {
            material: 999,
            temperature: 300.0,
        }
        .apply(&mut grid, &materials, 2, 2, 0);
    }

    #[test]
    fn test_eraser_clears_cells_and_spawners() {
        let materials = Materials::new();
        let mut grid = Grid::new(5, 5, 293.15);
        Tool::Brush {
            material: MaterialId::SAND,
            temperature: 500.0,
        }
        .apply(&mut grid, &materials, 2, 2, 2);
        Tool::Spawner {
            material: MaterialId::SAND,
        }
        .apply(&mut grid, &materials, 2, 2, 0);

        Tool::Eraser.apply(&mut grid, &materials, 2, 2, 1);

        let cell = grid.cell(2, 2);
        assert!(cell.is_empty());
        assert_eq!(cell.temperature, 0.0);
        assert_eq!(cell.phase, Phase::Static);
        assert_eq!(cell.spawner, None);
        assert_eq!(grid.material(0, 0), MaterialId::SAND);
    }

    #[test]
    fn test_brushing_empty_space_clears_cells() {
        let materials = Materials::new();
        let mut grid = Grid::new(5, 5, 293.15);
        Tool::Brush {
            material: MaterialId::WATER,
            temperature: 350.0,
        }
        .apply(&mut grid, &materials, 2, 2, 1);
        let idx = grid.index(2, 2);
        grid.oxidation[idx] = 0.5;

        Tool::Brush {
            material: MaterialId::NONE,
            temperature: 800.0,
        }
        .apply(&mut grid, &materials, 2, 2, 0);

        let cell = grid.cell(2, 2);
        assert!(cell.is_empty());
        assert_eq!(cell.temperature, 0.0);
        assert_eq!(cell.oxidation, 0.0);
        assert_eq!(cell.weight, 0.0);
        assert_eq!(grid.material(1, 1), MaterialId::WATER);
    }

    #[test]
    fn test_heater_is_unbounded_and_cooler_floors_at_zero() {
        let materials = Materials::new();
        let mut grid = Grid::new(3, 3, 100.0);

        Tool::Heater { delta: 1.0e6 }.apply(&mut grid, &materials, 1, 1, 0);
        assert_eq!(grid.temperature(1, 1), 1.0e6 + 100.0);

        Tool::Cooler { delta: 250.0 }.apply(&mut grid, &materials, 1, 1, 1);
        assert_eq!(grid.temperature(0, 0), 0.0);
        assert!(grid.temperature(1, 1) > 0.0);
    }

    #[test]
    fn test_heating_refreshes_phase() {
        let materials = Materials::new();
        let mut grid = Grid::new(3, 3, 293.15);
        Tool::Brush {
            material: MaterialId::WATER,
            temperature: 293.15,
        }
        .apply(&mut grid, &materials, 1, 1, 0);

        Tool::Heater { delta: 200.0 }.apply(&mut grid, &materials, 1, 1, 0);
        assert_eq!(grid.phase(1, 1), Phase::Gas);
    }

    #[test]
    fn test_spawner_marks_cells_only() {
        let materials = Materials::new();
        let mut grid = Grid::new(4, 4, 293.15);

        Tool::Spawner {
            material: MaterialId::WATER,
        }
        .apply(&mut grid, &materials, 1, 1, 0);

        assert_eq!(grid.spawner(1, 1), Some(MaterialId::WATER));
        assert_eq!(grid.material(1, 1), MaterialId::NONE);
        assert_eq!(grid.spawner(2, 2), None);
    }
}
