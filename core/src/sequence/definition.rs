// flexstep/src/sequence/definition.rs

//! Contains the `Sequence<TData>` struct and methods for its construction and structural
//! modification.

use crate::core::stage::Stage;
use crate::error::{FlexstepError, FlexstepResult};
use crate::runner::{ActionRunner, ClassifyingRunner};
use std::sync::Arc;

/// An ordered list of stages plus the runner used to dispatch their actions.
///
/// `TData` is the host data carried by the `ExecutionContext`.
/// Stage names are unique. Running a sequence borrows it immutably, so one definition can back
/// many independent runs.
pub struct Sequence<TData: 'static + Send + Sync> {
  pub(crate) stages: Vec<Stage<TData>>,
  pub(crate) runner: Arc<dyn ActionRunner<TData>>,
}

impl<TData: 'static + Send + Sync> Sequence<TData> {
  /// Creates an empty sequence using a `ClassifyingRunner` without timeout.
  pub fn new() -> Self {
    Self {
      stages: Vec::new(),
      runner: Arc::new(ClassifyingRunner::new()),
    }
  }

  pub fn from_stages(stages: impl IntoIterator<Item = Stage<TData>>) -> FlexstepResult<Self> {
    let mut sequence = Self::new();
    for stage in stages {
      sequence.push_stage(stage)?;
    }
    Ok(sequence)
  }

  pub fn with_runner(mut self, runner: impl ActionRunner<TData> + 'static) -> Self {
    self.runner = Arc::new(runner);
    self
  }

  pub fn stages(&self) -> &[Stage<TData>] {
    &self.stages
  }

  pub fn stage(&self, stage_name: &str) -> Option<&Stage<TData>> {
    self.stages.iter().find(|s| s.name == stage_name)
  }

  pub fn stage_names(&self) -> Vec<&str> {
    self.stages.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn len(&self) -> usize {
    self.stages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  fn position(&self, stage_name: &str) -> FlexstepResult<usize> {
    self
      .stages
      .iter()
      .position(|s| s.name == stage_name)
      .ok_or_else(|| FlexstepError::StageNotFound {
        stage_name: stage_name.to_string(),
      })
  }

  fn ensure_stage_not_exists(&self, stage_name: &str) -> FlexstepResult<()> {
    if self.stages.iter().any(|s| s.name == stage_name) {
      return Err(FlexstepError::DuplicateStage {
        stage_name: stage_name.to_string(),
      });
    }
    Ok(())
  }

  // --- Stage Manipulation ---

  pub fn push_stage(&mut self, stage: Stage<TData>) -> FlexstepResult<()> {
    self.ensure_stage_not_exists(&stage.name)?;
    self.stages.push(stage);
    Ok(())
  }

  pub fn insert_before_stage(&mut self, existing_stage_name: &str, stage: Stage<TData>) -> FlexstepResult<()> {
    let idx = self.position(existing_stage_name)?;
    self.ensure_stage_not_exists(&stage.name)?;
    self.stages.insert(idx, stage);
    Ok(())
  }

  pub fn insert_after_stage(&mut self, existing_stage_name: &str, stage: Stage<TData>) -> FlexstepResult<()> {
    let idx = self.position(existing_stage_name)?;
    self.ensure_stage_not_exists(&stage.name)?;
    self.stages.insert(idx + 1, stage);
    Ok(())
  }

  /// Removes and returns the named stage.
  pub fn remove_stage(&mut self, stage_name: &str) -> FlexstepResult<Stage<TData>> {
    let idx = self.position(stage_name)?;
    Ok(self.stages.remove(idx))
  }

  pub fn set_continue_on_failure(&mut self, stage_name: &str, continue_on_failure: bool) -> FlexstepResult<()> {
    let idx = self.position(stage_name)?;
    self.stages[idx].continue_on_failure = continue_on_failure;
    Ok(())
  }
}

impl<TData: 'static + Send + Sync> Default for Sequence<TData> {
  fn default() -> Self {
    Self::new()
  }
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for Sequence<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Sequence").field("stages", &self.stages).finish()
  }
}
