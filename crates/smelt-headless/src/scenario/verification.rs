//! Verification conditions and state checks for scenarios

use anyhow::Result;
use serde::{Deserialize, Serialize};
use smelt_core::World;

use super::material_id;

/// Conditions that can be verified against world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationCondition {
    // === MATERIAL CHECKS ===
    /// Assert material count in region lies within `min..=max`
    MaterialCountRange {
        material: String,
        region: Region,
        min: usize,
        max: usize,
    },

    /// Assert material at a specific cell
    MaterialAt { x: usize, y: usize, expected: String },

    /// Assert no material in region
    RegionEmpty { region: Region },

    // === HEAT CHECKS ===
    /// Assert every non-empty cell in region lies within `min..=max` Kelvin
    TemperatureRange { region: Region, min: f32, max: f32 },

    // === LOGICAL OPERATORS ===
    /// All conditions must pass
    All {
        conditions: Vec<VerificationCondition>,
    },

    /// Any condition must pass
    Any {
        conditions: Vec<VerificationCondition>,
    },

    /// Condition must NOT pass
    Not {
        condition: Box<VerificationCondition>,
    },
}

/// Cell area a check looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    /// Inclusive rectangle, clipped to the world
    Rect {
        min_x: usize,
        min_y: usize,
        max_x: usize,
        max_y: usize,
    },

    /// Every cell
    Whole,
}

impl Region {
    /// Coordinates of every covered cell inside `world`
    fn cells(self, world: &World) -> impl Iterator<Item = (usize, usize)> {
        let (w, h) = (world.width(), world.height());
        let (x1, y1, x2, y2) = match self {
            Region::Rect {
                min_x,
                min_y,
                max_x,
                max_y,
            } => (min_x, min_y, max_x.min(w - 1), max_y.min(h - 1)),
            Region::Whole => (0, 0, w - 1, h - 1),
        };
        (y1..=y2).flat_map(move |y| (x1..=x2).map(move |x| (x, y)))
    }
}

/// Result of a verification check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub passed: bool,
    pub message: String,
}

impl VerificationCondition {
    /// Evaluate condition against world state. Fails only when the condition
    /// names a material the world does not know.
    pub fn evaluate(&self, world: &World) -> Result<VerificationResult> {
        let result = match self {
            VerificationCondition::MaterialCountRange {
                material,
                region,
                min,
                max,
            } => {
                let id = material_id(world.materials(), material)?;
                let actual = region
                    .cells(world)
                    .filter(|&(x, y)| world.cell(x, y).material == id)
                    .count();

                VerificationResult {
                    passed: (*min..=*max).contains(&actual),
                    message: format!(
                        "Material {} count in {:?}: expected {}-{}, got {}",
                        material, region, min, max, actual
                    ),
                }
            }

            VerificationCondition::MaterialAt { x, y, expected } => {
                let id = material_id(world.materials(), expected)?;
                let actual = world
                    .in_bounds(*x as i32, *y as i32)
                    .then(|| world.cell(*x, *y).material);
                let actual_name = actual.map_or("<outside world>", |m| world.materials().get(m).name.as_str());

                VerificationResult {
                    passed: actual == Some(id),
                    message: format!(
                        "Material at ({}, {}): expected {}, got {}",
                        x, y, expected, actual_name
                    ),
                }
            }

            VerificationCondition::RegionEmpty { region } => {
                let filled = region
                    .cells(world)
                    .filter(|&(x, y)| !world.cell(x, y).is_empty())
                    .count();

                VerificationResult {
                    passed: filled == 0,
                    message: format!("Region {:?} empty: {} filled cells", region, filled),
                }
            }

            VerificationCondition::TemperatureRange { region, min, max } => {
                let outside = region
                    .cells(world)
                    .map(|(x, y)| world.cell(x, y))
                    .filter(|cell| !cell.is_empty())
                    .filter(|cell| cell.temperature < *min || cell.temperature > *max)
                    .count();

                VerificationResult {
                    passed: outside == 0,
                    message: format!(
                        "Temperature in {:?}: expected {}-{}K, {} cells outside",
                        region, min, max, outside
                    ),
                }
            }

            VerificationCondition::All { conditions } => {
                let results = conditions
                    .iter()
                    .map(|c| c.evaluate(world))
                    .collect::<Result<Vec<_>>>()?;
                let failed: Vec<_> = results.iter().filter(|r| !r.passed).collect();

                VerificationResult {
                    passed: failed.is_empty(),
                    message: format!(
                        "All ({}/{} passed){}",
                        results.len() - failed.len(),
                        results.len(),
                        failed
                            .iter()
                            .map(|r| format!("; {}", r.message))
                            .collect::<String>()
                    ),
                }
            }

            VerificationCondition::Any { conditions } => {
                let results = conditions
                    .iter()
                    .map(|c| c.evaluate(world))
                    .collect::<Result<Vec<_>>>()?;
                let passed = results.iter().filter(|r| r.passed).count();

                VerificationResult {
                    passed: passed > 0,
                    message: format!("Any ({}/{} passed)", passed, results.len()),
                }
            }

            VerificationCondition::Not { condition } => {
                let inner = condition.evaluate(world)?;

                VerificationResult {
                    passed: !inner.passed,
                    message: format!("Not ({})", inner.message),
                }
            }
        };

        Ok(result)
    }
}
