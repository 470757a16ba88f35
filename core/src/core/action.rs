// flexstep/src/core/action.rs

//! The contract every nested build step implements, plus a closure adapter.

use crate::core::context::ExecutionContext;
use crate::error::ActionError;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// What an action reports when it finished without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepVerdict {
  Passed,
  Unstable,
  Failed,
}

impl From<bool> for StepVerdict {
  /// `true` passes, `false` fails, matching build steps that only report a boolean.
  fn from(passed: bool) -> Self {
    if passed {
      StepVerdict::Passed
    } else {
      StepVerdict::Failed
    }
  }
}

/// A single unit of work inside a stage.
///
/// Implementations may read the running status through `ctx.status()` and mutate host data
/// through `ctx.write()`, but must drop lock guards before any `.await`.
/// Errors are classified by the `ActionRunner`: `ActionError::Abort` stops only the current
/// stage, every other error halts the sequence.
#[async_trait]
pub trait Action<TData: 'static + Send + Sync>: Send + Sync {
  fn name(&self) -> &str;

  async fn perform(&self, ctx: ExecutionContext<TData>) -> Result<StepVerdict, ActionError>;
}

/// Boxed async closure used by [`FnAction`].
pub type ActionHandler<TData> = Box<
  dyn Fn(ExecutionContext<TData>) -> Pin<Box<dyn Future<Output = Result<StepVerdict, ActionError>> + Send>>
    + Send
    + Sync,
>;

/// Wraps an async closure as a named `Action`.
pub struct FnAction<TData: 'static + Send + Sync> {
  name: String,
  handler: ActionHandler<TData>,
}

impl<TData: 'static + Send + Sync> FnAction<TData> {
  pub fn new<F, Fut>(name: impl Into<String>, handler_fn: F) -> Self
  where
    F: Fn(ExecutionContext<TData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StepVerdict, ActionError>> + Send + 'static,
  {
    Self {
      name: name.into(),
      handler: Box::new(move |ctx| Box::pin(handler_fn(ctx))),
    }
  }
}

#[async_trait]
impl<TData: 'static + Send + Sync> Action<TData> for FnAction<TData> {
  fn name(&self) -> &str {
    &self.name
  }

  async fn perform(&self, ctx: ExecutionContext<TData>) -> Result<StepVerdict, ActionError> {
    (self.handler)(ctx).await
  }
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for FnAction<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FnAction").field("name", &self.name).finish()
  }
}
