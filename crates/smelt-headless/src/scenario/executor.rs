//! Scenario execution engine

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use smelt_core::{Sandbox, Tool};

use super::actions::ScenarioAction;
use super::definition::ScenarioDefinition;
use super::material_id;
use super::results::ExecutionReport;

/// Configuration for scenario executor
#[derive(Debug, Clone)]
pub struct ScenarioExecutorConfig {
    /// Directory `Snapshot` actions write into
    pub snapshot_dir: PathBuf,

    /// RGBA drawn for empty cells in snapshots
    pub background_color: [u8; 4],

    /// Log a progress line every this many ticks (0 disables)
    pub report_every: u64,
}

impl Default for ScenarioExecutorConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("snapshots"),
            background_color: [0, 0, 0, 255],
            report_every: 0,
        }
    }
}

/// Executes scenario actions against a sandbox
pub struct ScenarioExecutor {
    config: ScenarioExecutorConfig,
}

impl ScenarioExecutor {
    pub fn new() -> Self {
        Self::with_config(ScenarioExecutorConfig::default())
    }

    pub fn with_config(config: ScenarioExecutorConfig) -> Self {
        Self { config }
    }

    /// Execute a complete scenario. Errors on actions that cannot run at all,
    /// such as unknown material names; failed checks only mark the report.
    pub fn execute_scenario(
        &self,
        scenario: &ScenarioDefinition,
        sandbox: &mut Sandbox,
    ) -> Result<ExecutionReport> {
        let start_time = Instant::now();
        let mut report = ExecutionReport::new(scenario.name.clone());

        log::info!("Starting scenario: {}", scenario.name);
        if !scenario.description.is_empty() {
            log::info!("Description: {}", scenario.description);
        }

        for (idx, action) in scenario.actions.iter().enumerate() {
            self.execute_action(action, sandbox, &mut report)
                .with_context(|| format!("Action {} ({}) failed", idx, action.name()))?;
            report.actions_executed += 1;
        }

        if !scenario.verify.is_empty() {
            log::info!("Running {} verifications", scenario.verify.len());
            for condition in &scenario.verify {
                let result = condition.evaluate(sandbox.world())?;
                if result.passed {
                    log::info!("  ✓ {}", result.message);
                } else {
                    log::warn!("  ✗ {}", result.message);
                    report.verification_failures.push(result);
                }
            }
        }

        report.passed = report.verification_failures.is_empty();
        report.total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        log::info!("Scenario complete: {}", report.summary());
        Ok(report)
    }

    fn execute_action(
        &self,
        action: &ScenarioAction,
        sandbox: &mut Sandbox,
        report: &mut ExecutionReport,
    ) -> Result<()> {
        log::debug!("{:?}", action);

        match action {
            ScenarioAction::Brush {
                material,
                temperature,
                x,
                y,
                radius,
            } => {
                let material = material_id(sandbox.world().materials(), material)?;
                let temperature =
                    temperature.unwrap_or_else(|| sandbox.world().ambient_temperature());
                if temperature.is_nan() || temperature < 0.0 {
                    bail!("Brush temperature {} is below absolute zero", temperature);
                }
                sandbox.apply_tool(
                    Tool::Brush {
                        material,
                        temperature,
                    },
                    *x,
                    *y,
                    *radius,
                );
            }
            ScenarioAction::Eraser { x, y, radius } => {
                sandbox.apply_tool(Tool::Eraser, *x, *y, *radius);
            }
            ScenarioAction::Heater { delta, x, y, radius } => {
                sandbox.apply_tool(Tool::Heater { delta: *delta }, *x, *y, *radius);
            }
            ScenarioAction::Cooler { delta, x, y, radius } => {
                sandbox.apply_tool(Tool::Cooler { delta: *delta }, *x, *y, *radius);
            }
            ScenarioAction::Spawner {
                material,
                x,
                y,
                radius,
            } => {
                let material = material_id(sandbox.world().materials(), material)?;
                sandbox.apply_tool(Tool::Spawner { material }, *x, *y, *radius);
            }
            ScenarioAction::SpawnerTemperature { temperature } => {
                sandbox.set_spawner_temperature(*temperature);
            }
            ScenarioAction::Tick { count } => {
                self.run_ticks(sandbox, *count, report);
            }
            ScenarioAction::Snapshot { filename } => {
                let path = self.config.snapshot_dir.join(filename);
                crate::snapshot::save_png(sandbox.world(), self.config.background_color, &path)?;
                report.snapshots.push(path.display().to_string());
            }
        }

        Ok(())
    }

    fn run_ticks(&self, sandbox: &mut Sandbox, count: u64, report: &mut ExecutionReport) {
        for _ in 0..count {
            let stats = sandbox.tick();
            report.record_ticks(1, stats);

            let every = self.config.report_every;
            if every > 0 && sandbox.ticks() % every == 0 {
                log::info!(
                    "Tick {}: {} moved, {} state changes, {} reactions so far",
                    sandbox.ticks(),
                    report.cells_moved,
                    report.state_changes,
                    report.reactions
                );
            }
        }
    }
}

impl Default for ScenarioExecutor {
    fn default() -> Self {
        Self::new()
    }
}
