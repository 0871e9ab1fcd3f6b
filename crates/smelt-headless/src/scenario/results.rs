//! Execution results and reporting

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use smelt_core::TickStats;
use std::path::Path;

use super::verification::VerificationResult;

/// Report from scenario execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub scenario_name: String,

    /// Overall pass/fail status
    pub passed: bool,

    pub ticks_executed: u64,
    pub actions_executed: usize,

    // Simulation counters summed over the run
    pub cells_moved: u64,
    pub state_changes: u64,
    pub reactions: u64,

    /// Verification failures (empty if all passed)
    pub verification_failures: Vec<VerificationResult>,

    /// Snapshot file paths
    pub snapshots: Vec<String>,

    /// Wall-clock time (milliseconds)
    pub total_duration_ms: f64,
}

impl ExecutionReport {
    pub fn new(scenario_name: String) -> Self {
        Self {
            scenario_name,
            passed: false,
            ticks_executed: 0,
            actions_executed: 0,
            cells_moved: 0,
            state_changes: 0,
            reactions: 0,
            verification_failures: Vec::new(),
            snapshots: Vec::new(),
            total_duration_ms: 0.0,
        }
    }

    pub(crate) fn record_ticks(&mut self, count: u64, stats: TickStats) {
        self.ticks_executed += count;
        self.cells_moved += stats.cells_moved;
        self.state_changes += stats.state_changes;
        self.reactions += stats.reactions;
    }

    /// One-line human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{}: {} | {} ticks, {} moved, {} state changes, {} reactions | {:.1}ms",
            self.scenario_name,
            if self.passed { "PASSED" } else { "FAILED" },
            self.ticks_executed,
            self.cells_moved,
            self.state_changes,
            self.reactions,
            self.total_duration_ms
        )
    }

    /// Save report as RON
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize report to RON")?;

        std::fs::write(path.as_ref(), ron).with_context(|| {
            format!("Failed to write report file: {}", path.as_ref().display())
        })?;

        Ok(())
    }
}
