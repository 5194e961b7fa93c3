//! Unfail application library
//!
//! Application modules, the solution orchestrator, and server bootstrap.

pub mod modules;
pub mod utils;

use anyhow::Context;
use unfail_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::solution::{Collaborators, SolutionService, SolveError};

/// Build the registry with every application module registered.
pub fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings).context("failed to register modules")?;
    Ok(registry)
}

/// Initialize modules, serve HTTP until shutdown, then stop modules.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let registry = build_registry(settings)?;
    let ctx = InitCtx { settings };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = unfail_http::start_server(&registry, settings).await;
    registry.stop_all().await?;
    served
}
