pub mod solution;

use std::sync::Arc;

use unfail_kernel::{settings::Settings, ModuleRegistry};

use solution::{Collaborators, SolutionService};

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let collaborators = Collaborators::from_settings(settings)?;
    registry.register(solution::create_module(Arc::new(SolutionService::new(
        collaborators,
    ))));
    Ok(())
}
