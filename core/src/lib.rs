// orderflow/src/lib.rs

//! orderflow: explicit, ordered, async pipelines for business workflows.
//!
//! A pipeline is a fixed list of named steps. Each step can carry `before`,
//! `on` and `after` handlers which run in that order against a shared
//! [`ContextData`]. Handlers decide whether the pipeline continues or stops,
//! and any handler error aborts the run unless the step is marked optional.
//!
//! There are no implicit callbacks: every mutation of the context happens in
//! a handler registered against a named step, so reading the step list tells
//! you exactly what a workflow does and in which order.
//!
//!  - Named steps with before/on/after hooks.
//!  - Optional steps whose failures are logged and swallowed.
//!  - Skip conditions evaluated against the context.
//!  - Early stopping via [`PipelineControl::Stop`].
//!  - Structural edits (insert before/after, remove) for tests and composition.
//!  - A type-keyed [`Registry`] that dispatches on the context data type.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::Registry;

/*
    Typical use:
    1. Define a context struct `MyCtx` holding the inputs, collaborators and outputs of a workflow.
    2. Create a `Pipeline<MyCtx, MyError>` with its step list.
    3. Register handlers with `.on()`, `.before()`, `.after()`.
    4. Register the pipeline with a `Registry<MyError>`.
    5. Wrap a `MyCtx` in `ContextData::new` and call `registry.run(ctx.clone()).await`,
       then read the outputs back from `ctx`.
*/
