//! Runner configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `smelt.ron` in the working directory (if exists), or an explicit file
//! 3. Environment variables prefixed with `SMELT_`
//!
//! Command-line flags are applied on top by the binary.
//!
//! Example environment variable: `SMELT_WORLD__WIDTH=400`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Main runner configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HeadlessConfig {
    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub run: RunConfig,
}

/// World construction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    /// Temperature of every cell at construction, in Kelvin
    pub ambient_temperature: f32,
    /// Temperature spawners inject material at
    pub spawner_temperature: f32,
    /// Seed for the sandbox random source
    pub seed: u64,
    /// RGBA drawn for empty cells in snapshots
    pub background_color: [u8; 4],
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            ambient_temperature: 293.15,
            spawner_temperature: 293.15,
            seed: 0,
            background_color: [0, 0, 0, 255],
        }
    }
}

/// Tick loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Ticks to run when no scenario is given
    pub ticks: u64,
    /// Log a progress report every this many ticks (0 disables)
    pub report_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 200,
            report_every: 50,
        }
    }
}

impl HeadlessConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `path` if given, otherwise `smelt.ron` (if exists)
    /// 3. Environment variables prefixed with `SMELT_` (highest priority)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name("smelt")
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("world.width", 400_i64)?
            .set_default("world.height", 300_i64)?
            .set_default("world.ambient_temperature", 293.15)?
            .set_default("world.spawner_temperature", 293.15)?
            .set_default("world.seed", 0_i64)?
            .set_default("world.background_color", vec![0_i64, 0, 0, 255])?
            .set_default("run.ticks", 200_i64)?
            .set_default("run.report_every", 50_i64)?
            // Layer 2: Config file
            .add_source(file)
            // Layer 3: Environment variables (SMELT_WORLD__WIDTH, etc.)
            .add_source(Environment::with_prefix("SMELT").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = HeadlessConfig::default();
        assert_eq!(config.world.width, 400);
        assert_eq!(config.world.height, 300);
        assert_eq!(config.world.ambient_temperature, 293.15);
        assert_eq!(config.run.ticks, 200);
        assert_eq!(config.world.background_color, [0, 0, 0, 255]);
    }

    #[test]
    fn test_load_config_with_defaults() {
        // Should load defaults when no config file exists
        let config = HeadlessConfig::load(None).expect("Failed to load config");
        assert_eq!(config.world.seed, 0);
        assert_eq!(config.run.report_every, 50);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        writeln!(file, "(world: (width: 64, seed: 9), run: (ticks: 10))").unwrap();

        let config = HeadlessConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.world.width, 64);
        assert_eq!(config.world.seed, 9);
        assert_eq!(config.run.ticks, 10);
        // Untouched keys keep their defaults
        assert_eq!(config.world.height, 300);
        assert_eq!(config.run.report_every, 50);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(HeadlessConfig::load(Some(Path::new("/nonexistent/smelt.ron"))).is_err());
    }
}
