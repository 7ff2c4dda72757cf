// orderflow/src/pipeline/execution.rs

//! `Pipeline::run()`: executes steps and their handlers in order.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::step::StepDef;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// - A step whose `skip_if` returns `true` is skipped.
  /// - A non-optional step with no handlers fails with `FlowError::HandlerMissing`.
  /// - A handler returning `Stop` ends the run with `PipelineResult::Stopped`.
  /// - A handler error aborts the run, unless its step is optional, in which
  ///   case the error is logged and the next step runs.
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(
            context_data_type = %std::any::type_name::<TData>(),
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_cond_fn) = &step_def.skip_if {
        if skip_cond_fn(ctx_data.clone()) {
          event!(Level::INFO, step_name, "Step skipped due to 'skip_if' condition.");
          continue;
        }
      }

      if !self.has_handlers(step_name) {
        if step_def.optional {
          event!(Level::DEBUG, step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, step_name, "Non-optional step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let step_span = span!(
        Level::INFO,
        "pipeline_step_execution",
        step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      match self.run_step(step_def, ctx_data.clone()).instrument(step_span).await {
        Ok(PipelineControl::Continue) => {}
        Ok(PipelineControl::Stop) => {
          event!(Level::INFO, step_name, "Pipeline stopped by a handler.");
          return Ok(PipelineResult::Stopped);
        }
        Err(e) if step_def.optional => {
          event!(Level::WARN, step_name, error = %e, "Optional step failed; continuing.");
        }
        Err(e) => {
          event!(Level::ERROR, step_name, error = %e, "Step failed.");
          return Err(e);
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(PipelineResult::Completed)
  }

  fn has_handlers(&self, step_name: &str) -> bool {
    [&self.before_handlers, &self.on_handlers, &self.after_handlers]
      .iter()
      .any(|table| table.get(step_name).map_or(false, |v| !v.is_empty()))
  }

  /// Runs the before, on and after handlers of one step, in that order.
  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: ContextData<TData>) -> Result<PipelineControl, Err> {
    let phases = [
      ("before", &self.before_handlers),
      ("on", &self.on_handlers),
      ("after", &self.after_handlers),
    ];

    for (phase, table) in phases {
      let Some(handlers) = table.get(&step_def.name) else {
        continue;
      };
      for (handler_idx, handler_fn) in handlers.iter().enumerate() {
        event!(Level::TRACE, phase, handler_index = handler_idx, "Executing handler.");
        match handler_fn(ctx_data.clone()).await? {
          PipelineControl::Continue => {}
          PipelineControl::Stop => return Ok(PipelineControl::Stop),
        }
      }
    }
    event!(Level::DEBUG, "Step processing finished successfully.");
    Ok(PipelineControl::Continue)
  }
}
