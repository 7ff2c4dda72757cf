// marketplace/src/pipelines/mod.rs

//! Pipelines used by the marketplace and their registration.

use crate::errors::AppError;
use orderflow::Registry;

pub mod contexts;
pub mod placement_pipeline;

/// Registers every application pipeline. Called once at startup.
pub fn register_all_pipelines(registry: &Registry<AppError>) {
  tracing::info!("Registering pipelines...");
  placement_pipeline::register_placement_pipeline(registry);
  tracing::info!("All application pipelines registered.");
}
