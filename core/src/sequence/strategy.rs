// flexstep/src/sequence/strategy.rs

//! The runner strategy: turns a stage's condition result and action outcomes into a
//! stage status and a continue/halt decision.
//!
//! All strategies share one action policy:
//!  - actions run in order and the stage stops at the first `Failure` or fault;
//!  - the stage status is the worst outcome that ran, faults counting as `Failure`;
//!  - an unrecoverable fault halts the sequence no matter how the stage is configured;
//!  - otherwise `Failure` or worse halts only when `continue_on_failure` is false.
//!
//! Strategies differ in what a condition that fails to evaluate means for the stage.

use crate::core::control::{StageControl, StageVerdict};
use crate::core::outcome::Outcome;
use crate::core::status::BuildStatus;
use crate::error::FlexstepError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunnerStrategy {
  /// Condition error: stage contributes `Failure`, actions do not run.
  #[default]
  Fail,
  /// Condition error: stage contributes `Unstable`, actions do not run.
  Unstable,
  /// Condition error: stage contributes `Unstable`, actions run anyway.
  RunUnstable,
  /// Condition error: actions run as if the condition had been met.
  Run,
  /// Condition error: the stage is skipped quietly.
  DontRun,
}

/// What happens to a stage whose condition could not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionErrorPolicy {
  pub run_actions: bool,
  pub status: BuildStatus,
}

impl RunnerStrategy {
  pub const ALL: [RunnerStrategy; 5] = [
    RunnerStrategy::Fail,
    RunnerStrategy::Unstable,
    RunnerStrategy::RunUnstable,
    RunnerStrategy::Run,
    RunnerStrategy::DontRun,
  ];

  pub fn on_condition_error(self) -> ConditionErrorPolicy {
    let (run_actions, status) = match self {
      RunnerStrategy::Fail => (false, BuildStatus::Failure),
      RunnerStrategy::Unstable => (false, BuildStatus::Unstable),
      RunnerStrategy::RunUnstable => (true, BuildStatus::Unstable),
      RunnerStrategy::Run => (true, BuildStatus::Success),
      RunnerStrategy::DontRun => (false, BuildStatus::Success),
    };
    ConditionErrorPolicy { run_actions, status }
  }

  /// Whether the stage may dispatch another action after `outcome`.
  pub fn allows_next_action(self, outcome: &Outcome) -> bool {
    !outcome.stops_stage()
  }

  /// Concludes a stage.
  ///
  /// `condition_status` is what the condition itself contributed (`Success` unless it
  /// errored). `outcomes` are the outcomes of the actions that actually ran.
  pub fn conclude(self, condition_status: BuildStatus, outcomes: &[Outcome], continue_on_failure: bool) -> StageVerdict {
    let status = outcomes
      .iter()
      .map(Outcome::status)
      .fold(condition_status, BuildStatus::combine);

    let control = if outcomes.iter().any(Outcome::is_unrecoverable) {
      StageControl::Halt
    } else if status.is_failed() && !continue_on_failure {
      StageControl::Halt
    } else {
      StageControl::Continue
    };

    StageVerdict { status, control }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      RunnerStrategy::Fail => "fail",
      RunnerStrategy::Unstable => "unstable",
      RunnerStrategy::RunUnstable => "run-unstable",
      RunnerStrategy::Run => "run",
      RunnerStrategy::DontRun => "dont-run",
    }
  }
}

impl fmt::Display for RunnerStrategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for RunnerStrategy {
  type Err = FlexstepError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
    RunnerStrategy::ALL
      .into_iter()
      .find(|strategy| strategy.as_str() == normalized)
      .ok_or_else(|| FlexstepError::InvalidStrategy(s.to_string()))
  }
}
