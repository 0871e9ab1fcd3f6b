//! RON scenario files driving a sandbox without a window

mod actions;
mod definition;
mod executor;
mod results;
mod verification;

pub use actions::ScenarioAction;
pub use definition::ScenarioDefinition;
pub use executor::{ScenarioExecutor, ScenarioExecutorConfig};
pub use results::ExecutionReport;
pub use verification::{Region, VerificationCondition, VerificationResult};

use anyhow::{Result, anyhow};
use smelt_core::Materials;

/// Resolve a material named in a scenario file
pub(crate) fn material_id(materials: &Materials, name: &str) -> Result<u16> {
    materials
        .find_by_name(name)
        .ok_or_else(|| anyhow!("Unknown material '{}'", name))
}
