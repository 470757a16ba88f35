// flexstep/src/condition/mod.rs

//! Stage guards.
//!
//! A `RunCondition` decides whether a stage's actions run. It may read the running status and
//! the host data through the `ExecutionContext`, but has no way to change the status.
//! The built-in conditions cover the common guards; hosts implement the trait for their own.

pub mod builtin;

use crate::core::context::ExecutionContext;
use crate::error::ConditionError;

pub use builtin::{AlwaysRun, And, FnCondition, NeverRun, Not, Or, StatusCondition};

pub trait RunCondition<TData: 'static + Send + Sync>: Send + Sync {
  /// Returns whether the guarded stage should run.
  ///
  /// An `Err` does not stop anything by itself: the stage's `RunnerStrategy` decides
  /// whether the actions still run and what status the stage contributes.
  fn evaluate(&self, ctx: &ExecutionContext<TData>) -> Result<bool, ConditionError>;

  /// Short label used in logs.
  fn describe(&self) -> String {
    std::any::type_name::<Self>().to_string()
  }
}
