// orderflow/src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` struct, its construction and structural edits.

use crate::core::handler::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::{FlowError, FlowResult};
use std::collections::HashMap;

/// An ordered list of named steps over the context data type `TData`.
///
/// `Err` is the error type returned by handlers and by [`Pipeline::run`]. It
/// must be constructible from [`FlowError`] so that engine-level failures
/// (such as a required step without handlers) surface in the caller's type.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,

  pub(crate) before_handlers: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on_handlers: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after_handlers: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(name, optional, skip_if)` triples, in execution order.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_cond_opt)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_cond_opt.clone(),
      })
      .collect();

    Self {
      steps,
      before_handlers: HashMap::new(),
      on_handlers: HashMap::new(),
      after_handlers: HashMap::new(),
    }
  }

  /// Step names in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn has_step(&self, step_name: &str) -> bool {
    self.steps.iter().any(|s| s.name == step_name)
  }

  /// Panics if the step is unknown. Registering a handler against a typo is a
  /// setup bug, not a runtime condition.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.has_step(step_name) {
      panic!("orderflow setup error: step '{}' not found in pipeline definition.", step_name);
    }
  }

  fn position_of(&self, step_name: &str) -> FlowResult<usize> {
    self
      .steps
      .iter()
      .position(|s| s.name == step_name)
      .ok_or_else(|| FlowError::StepNotFound {
        step_name: step_name.to_string(),
      })
  }

  fn check_new_name(&self, new_step_name: &str) -> FlowResult<()> {
    if self.has_step(new_step_name) {
      return Err(FlowError::ConfigurationError {
        step_name: new_step_name.to_string(),
        message: "a step with this name already exists".to_string(),
      });
    }
    Ok(())
  }

  pub fn insert_before_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) -> FlowResult<()> {
    let idx = self.position_of(existing_step_name)?;
    let name: String = new_step_name.into();
    self.check_new_name(&name)?;
    self.steps.insert(idx, StepDef { name, optional, skip_if });
    Ok(())
  }

  pub fn insert_after_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) -> FlowResult<()> {
    let idx = self.position_of(existing_step_name)?;
    let name: String = new_step_name.into();
    self.check_new_name(&name)?;
    self.steps.insert(idx + 1, StepDef { name, optional, skip_if });
    Ok(())
  }

  /// Removes a step and every handler registered for it. Unknown names are a no-op.
  pub fn remove_step(&mut self, step_name: &str) {
    if let Some(idx) = self.steps.iter().position(|s| s.name == step_name) {
      self.steps.remove(idx);
      self.before_handlers.remove(step_name);
      self.on_handlers.remove(step_name);
      self.after_handlers.remove(step_name);
    }
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) -> FlowResult<()> {
    let idx = self.position_of(step_name)?;
    self.steps[idx].optional = optional;
    Ok(())
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) -> FlowResult<()> {
    let idx = self.position_of(step_name)?;
    self.steps[idx].skip_if = skip_if;
    Ok(())
  }
}
