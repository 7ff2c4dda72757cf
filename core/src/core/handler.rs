// orderflow/src/core/handler.rs

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A boxed pipeline step handler.
///
/// A handler receives its own clone of the run's `ContextData<TData>` and
/// resolves to `Result<PipelineControl, Err>`. Handlers:
/// 1. copy what they need out of the context under a short-lived guard,
/// 2. drop every guard BEFORE awaiting anything,
/// 3. write their results back under a fresh guard,
/// 4. return `Continue` or `Stop`.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
