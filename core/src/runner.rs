// flexstep/src/runner.rs

//! Defines the `ActionRunner` trait, the boundary where action errors become `Outcome`s,
//! and the default `ClassifyingRunner`.

use crate::core::action::Action;
use crate::core::context::ExecutionContext;
use crate::core::outcome::Outcome;
use crate::error::ActionError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{event, instrument, Level};

/// Runs one action and reports exactly one `Outcome`.
///
/// Implementations must never let an error escape: every failure is mapped onto
/// `Outcome::Failure`, `Outcome::Fault(Recoverable)` or `Outcome::Fault(Unrecoverable)`.
#[async_trait]
pub trait ActionRunner<TData: 'static + Send + Sync>: Send + Sync {
  async fn run(&self, ctx: &ExecutionContext<TData>, action: &dyn Action<TData>) -> Outcome;
}

/// Default runner.
///
/// `ActionError::Abort` becomes a recoverable fault, every other error an unrecoverable one.
/// Optionally bounds each action with a timeout and observes a cancellation flag owned by the
/// host; both report unrecoverable faults so the sequence halts.
#[derive(Debug, Clone, Default)]
pub struct ClassifyingRunner {
  timeout: Option<Duration>,
  cancelled: Option<Arc<AtomicBool>>,
}

impl ClassifyingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  /// Actions are refused once `flag` is set. Already running actions are not interrupted.
  pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
    self.cancelled = Some(flag);
    self
  }

  fn is_cancelled(&self) -> bool {
    self.cancelled.as_ref().is_some_and(|flag| flag.load(Ordering::SeqCst))
  }
}

#[async_trait]
impl<TData: 'static + Send + Sync> ActionRunner<TData> for ClassifyingRunner {
  #[instrument(name = "ClassifyingRunner::run", skip_all, fields(action = %action.name()))]
  async fn run(&self, ctx: &ExecutionContext<TData>, action: &dyn Action<TData>) -> Outcome {
    if self.is_cancelled() {
      event!(Level::WARN, "Cancellation requested, refusing to start action.");
      return Outcome::from(ActionError::Cancelled);
    }

    let result = match self.timeout {
      Some(limit) => match tokio::time::timeout(limit, action.perform(ctx.clone())).await {
        Ok(result) => result,
        Err(_) => Err(ActionError::TimedOut(limit)),
      },
      None => action.perform(ctx.clone()).await,
    };

    if let Err(err) = &result {
      event!(Level::DEBUG, error = %err, recoverable = err.is_recoverable(), "Action returned an error.");
    }
    Outcome::classify(result)
  }
}
