// flexstep/src/core/stage.rs

//! Defines a single guarded stage of a sequence.

use crate::condition::{AlwaysRun, FnCondition, RunCondition};
use crate::core::action::{Action, FnAction, StepVerdict};
use crate::core::context::ExecutionContext;
use crate::error::{ActionError, FlexstepError, FlexstepResult};
use crate::sequence::strategy::RunnerStrategy;
use std::future::Future;
use std::sync::Arc;

/// One guarded unit of a sequence: condition, ordered actions and failure policy.
///
/// Stages are immutable once built; `Clone` only bumps reference counts.
pub struct Stage<TData: 'static + Send + Sync> {
  pub(crate) name: String,
  pub(crate) condition: Arc<dyn RunCondition<TData>>,
  pub(crate) actions: Vec<Arc<dyn Action<TData>>>,
  pub(crate) strategy: RunnerStrategy,
  pub(crate) continue_on_failure: bool,
}

impl<TData: 'static + Send + Sync> Stage<TData> {
  pub fn builder(name: impl Into<String>) -> StageBuilder<TData> {
    StageBuilder::new(name)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn condition(&self) -> &dyn RunCondition<TData> {
    self.condition.as_ref()
  }

  pub fn actions(&self) -> &[Arc<dyn Action<TData>>] {
    &self.actions
  }

  pub fn strategy(&self) -> RunnerStrategy {
    self.strategy
  }

  /// When false, a stage ending in `Failure` or worse halts the sequence.
  /// Unrecoverable faults halt regardless of this flag.
  pub fn continue_on_failure(&self) -> bool {
    self.continue_on_failure
  }
}

impl<TData: 'static + Send + Sync> Clone for Stage<TData> {
  fn clone(&self) -> Self {
    Self {
      name: self.name.clone(),
      condition: Arc::clone(&self.condition),
      actions: self.actions.clone(),
      strategy: self.strategy,
      continue_on_failure: self.continue_on_failure,
    }
  }
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for Stage<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let action_names: Vec<&str> = self.actions.iter().map(|a| a.name()).collect();
    f.debug_struct("Stage")
      .field("name", &self.name)
      .field("condition", &self.condition.describe())
      .field("actions", &action_names)
      .field("strategy", &self.strategy)
      .field("continue_on_failure", &self.continue_on_failure)
      .finish()
  }
}

/// Builder for [`Stage`].
///
/// Defaults: `AlwaysRun` condition, `RunnerStrategy::Fail`, `continue_on_failure = true`
/// (every guarded stage gets its turn unless configured otherwise).
pub struct StageBuilder<TData: 'static + Send + Sync> {
  name: String,
  condition: Arc<dyn RunCondition<TData>>,
  actions: Vec<Arc<dyn Action<TData>>>,
  strategy: RunnerStrategy,
  continue_on_failure: bool,
}

impl<TData: 'static + Send + Sync> StageBuilder<TData> {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      condition: Arc::new(AlwaysRun),
      actions: Vec::new(),
      strategy: RunnerStrategy::default(),
      continue_on_failure: true,
    }
  }

  pub fn condition(mut self, condition: impl RunCondition<TData> + 'static) -> Self {
    self.condition = Arc::new(condition);
    self
  }

  pub fn condition_fn(
    self,
    label: impl Into<String>,
    condition_fn: impl Fn(&ExecutionContext<TData>) -> bool + Send + Sync + 'static,
  ) -> Self {
    self.condition(FnCondition::new(label, condition_fn))
  }

  /// Appends an action. Actions run in the order they are added.
  pub fn action(mut self, action: impl Action<TData> + 'static) -> Self {
    self.actions.push(Arc::new(action));
    self
  }

  /// Appends an already shared action, e.g. one reused across stages.
  pub fn shared_action(mut self, action: Arc<dyn Action<TData>>) -> Self {
    self.actions.push(action);
    self
  }

  pub fn action_fn<F, Fut>(self, name: impl Into<String>, handler_fn: F) -> Self
  where
    F: Fn(ExecutionContext<TData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StepVerdict, ActionError>> + Send + 'static,
  {
    self.action(FnAction::new(name, handler_fn))
  }

  pub fn strategy(mut self, strategy: RunnerStrategy) -> Self {
    self.strategy = strategy;
    self
  }

  pub fn continue_on_failure(mut self, continue_on_failure: bool) -> Self {
    self.continue_on_failure = continue_on_failure;
    self
  }

  pub fn build(self) -> FlexstepResult<Stage<TData>> {
    if self.name.trim().is_empty() {
      return Err(FlexstepError::EmptyStageName);
    }
    Ok(Stage {
      name: self.name,
      condition: self.condition,
      actions: self.actions,
      strategy: self.strategy,
      continue_on_failure: self.continue_on_failure,
    })
  }
}
