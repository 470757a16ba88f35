// flexstep/src/condition/builtin.rs

use super::RunCondition;
use crate::core::context::ExecutionContext;
use crate::core::status::BuildStatus;
use crate::error::ConditionError;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRun;

impl<TData: 'static + Send + Sync> RunCondition<TData> for AlwaysRun {
  fn evaluate(&self, _ctx: &ExecutionContext<TData>) -> Result<bool, ConditionError> {
    Ok(true)
  }

  fn describe(&self) -> String {
    "always".to_string()
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverRun;

impl<TData: 'static + Send + Sync> RunCondition<TData> for NeverRun {
  fn evaluate(&self, _ctx: &ExecutionContext<TData>) -> Result<bool, ConditionError> {
    Ok(false)
  }

  fn describe(&self) -> String {
    "never".to_string()
  }
}

/// Runs when the current status lies between `best` and `worst`, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCondition {
  pub best: BuildStatus,
  pub worst: BuildStatus,
}

impl StatusCondition {
  pub fn new(best: BuildStatus, worst: BuildStatus) -> Self {
    Self { best, worst }
  }

  /// Runs only while nothing has gone wrong yet.
  pub fn succeeded_so_far() -> Self {
    Self::new(BuildStatus::Success, BuildStatus::Success)
  }

  /// Runs while the status is no worse than `worst`.
  pub fn at_most(worst: BuildStatus) -> Self {
    Self::new(BuildStatus::Success, worst)
  }

  /// Runs once the status has degraded to `Failure` or worse.
  pub fn failed() -> Self {
    Self::new(BuildStatus::Failure, BuildStatus::Aborted)
  }
}

impl<TData: 'static + Send + Sync> RunCondition<TData> for StatusCondition {
  fn evaluate(&self, ctx: &ExecutionContext<TData>) -> Result<bool, ConditionError> {
    if self.best.is_worse_than(self.worst) {
      return Err(ConditionError::new(format!(
        "best status {} is worse than worst status {}",
        self.best, self.worst
      )));
    }
    let current = ctx.status();
    Ok(current >= self.best && current <= self.worst)
  }

  fn describe(&self) -> String {
    format!("status in [{}, {}]", self.best, self.worst)
  }
}

pub struct Not<TData: 'static + Send + Sync>(Box<dyn RunCondition<TData>>);

impl<TData: 'static + Send + Sync> Not<TData> {
  pub fn new(inner: impl RunCondition<TData> + 'static) -> Self {
    Not(Box::new(inner))
  }
}

impl<TData: 'static + Send + Sync> RunCondition<TData> for Not<TData> {
  fn evaluate(&self, ctx: &ExecutionContext<TData>) -> Result<bool, ConditionError> {
    self.0.evaluate(ctx).map(|met| !met)
  }

  fn describe(&self) -> String {
    format!("not({})", self.0.describe())
  }
}

/// True when every inner condition is true. Stops at the first false or error.
pub struct And<TData: 'static + Send + Sync>(Vec<Box<dyn RunCondition<TData>>>);

impl<TData: 'static + Send + Sync> And<TData> {
  pub fn new() -> Self {
    And(Vec::new())
  }

  pub fn with(mut self, condition: impl RunCondition<TData> + 'static) -> Self {
    self.0.push(Box::new(condition));
    self
  }
}

impl<TData: 'static + Send + Sync> Default for And<TData> {
  fn default() -> Self {
    Self::new()
  }
}

impl<TData: 'static + Send + Sync> RunCondition<TData> for And<TData> {
  fn evaluate(&self, ctx: &ExecutionContext<TData>) -> Result<bool, ConditionError> {
    for condition in &self.0 {
      if !condition.evaluate(ctx)? {
        return Ok(false);
      }
    }
    Ok(true)
  }

  fn describe(&self) -> String {
    let parts: Vec<String> = self.0.iter().map(|c| c.describe()).collect();
    format!("and({})", parts.join(", "))
  }
}

/// True when any inner condition is true. Stops at the first true or error.
pub struct Or<TData: 'static + Send + Sync>(Vec<Box<dyn RunCondition<TData>>>);

impl<TData: 'static + Send + Sync> Or<TData> {
  pub fn new() -> Self {
    Or(Vec::new())
  }

  pub fn with(mut self, condition: impl RunCondition<TData> + 'static) -> Self {
    self.0.push(Box::new(condition));
    self
  }
}

impl<TData: 'static + Send + Sync> Default for Or<TData> {
  fn default() -> Self {
    Self::new()
  }
}

impl<TData: 'static + Send + Sync> RunCondition<TData> for Or<TData> {
  fn evaluate(&self, ctx: &ExecutionContext<TData>) -> Result<bool, ConditionError> {
    for condition in &self.0 {
      if condition.evaluate(ctx)? {
        return Ok(true);
      }
    }
    Ok(false)
  }

  fn describe(&self) -> String {
    let parts: Vec<String> = self.0.iter().map(|c| c.describe()).collect();
    format!("or({})", parts.join(", "))
  }
}

type ConditionFn<TData> = Arc<dyn Fn(&ExecutionContext<TData>) -> Result<bool, ConditionError> + Send + Sync + 'static>;

/// Adapts a closure into a `RunCondition`.
pub struct FnCondition<TData: 'static + Send + Sync> {
  label: String,
  condition: ConditionFn<TData>,
}

impl<TData: 'static + Send + Sync> FnCondition<TData> {
  pub fn new(
    label: impl Into<String>,
    condition_fn: impl Fn(&ExecutionContext<TData>) -> bool + Send + Sync + 'static,
  ) -> Self {
    Self {
      label: label.into(),
      condition: Arc::new(move |ctx| Ok(condition_fn(ctx))),
    }
  }

  pub fn fallible(
    label: impl Into<String>,
    condition_fn: impl Fn(&ExecutionContext<TData>) -> Result<bool, ConditionError> + Send + Sync + 'static,
  ) -> Self {
    Self {
      label: label.into(),
      condition: Arc::new(condition_fn),
    }
  }
}

impl<TData: 'static + Send + Sync> Clone for FnCondition<TData> {
  fn clone(&self) -> Self {
    Self {
      label: self.label.clone(),
      condition: Arc::clone(&self.condition),
    }
  }
}

impl<TData: 'static + Send + Sync> RunCondition<TData> for FnCondition<TData> {
  fn evaluate(&self, ctx: &ExecutionContext<TData>) -> Result<bool, ConditionError> {
    (self.condition)(ctx)
  }

  fn describe(&self) -> String {
    self.label.clone()
  }
}
