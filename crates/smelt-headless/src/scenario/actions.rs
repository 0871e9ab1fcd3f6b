//! Tool actions a scenario can perform

use serde::{Deserialize, Serialize};

/// One step of a scenario. Materials are named, coordinates are tool centers
/// and `radius` defaults to a single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScenarioAction {
    /// Paint a material; `temperature` defaults to the world's ambient
    Brush {
        material: String,
        #[serde(default)]
        temperature: Option<f32>,
        x: i32,
        y: i32,
        #[serde(default)]
        radius: u32,
    },

    /// Empty cells and remove spawners
    Eraser {
        x: i32,
        y: i32,
        #[serde(default)]
        radius: u32,
    },

    Heater {
        delta: f32,
        x: i32,
        y: i32,
        #[serde(default)]
        radius: u32,
    },

    Cooler {
        delta: f32,
        x: i32,
        y: i32,
        #[serde(default)]
        radius: u32,
    },

    /// Place spawners; material "none" makes drains
    Spawner {
        material: String,
        x: i32,
        y: i32,
        #[serde(default)]
        radius: u32,
    },

    /// Temperature spawners inject at from now on
    SpawnerTemperature { temperature: f32 },

    /// Run `count` full ticks
    Tick { count: u64 },

    /// Save the current frame as a PNG under the snapshot directory
    Snapshot { filename: String },
}

impl ScenarioAction {
    /// Short label for logs
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioAction::Brush { .. } => "Brush",
            ScenarioAction::Eraser { .. } => "Eraser",
            ScenarioAction::Heater { .. } => "Heater",
            ScenarioAction::Cooler { .. } => "Cooler",
            ScenarioAction::Spawner { .. } => "Spawner",
            ScenarioAction::SpawnerTemperature { .. } => "SpawnerTemperature",
            ScenarioAction::Tick { .. } => "Tick",
            ScenarioAction::Snapshot { .. } => "Snapshot",
        }
    }
}
