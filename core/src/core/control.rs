// orderflow/src/core/control.rs

//! Flow-control signals returned by handlers and the outcome of a run.

/// Returned by a handler to say whether the pipeline goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt immediately. No further handlers of this step or later steps run.
  Stop,
}

/// Outcome of a full pipeline run that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran (or was skipped) to the end.
  Completed,
  /// A handler returned [`PipelineControl::Stop`].
  Stopped,
}
