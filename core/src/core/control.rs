// flexstep/src/core/control.rs

//! Signals for controlling sequence flow and the records a run produces.

use crate::core::outcome::{Fault, Outcome};
use crate::core::status::BuildStatus;

/// Decision taken after a stage: move on, or stop the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageControl {
  /// Evaluate the next stage's condition.
  Continue,
  /// Stop the sequence. No later stage's condition is evaluated.
  Halt,
}

/// What a runner strategy concluded for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageVerdict {
  pub status: BuildStatus,
  pub control: StageControl,
}

impl StageVerdict {
  pub fn halts(&self) -> bool {
    self.control == StageControl::Halt
  }
}

/// How a stage's condition evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionResult {
  Met,
  NotMet,
  /// The condition failed to evaluate; the runner strategy decided what followed.
  Errored(String),
}

/// Record of one stage in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
  pub name: String,
  pub condition: ConditionResult,
  /// Outcomes of the actions that were dispatched, in order.
  pub outcomes: Vec<Outcome>,
  /// This stage's contribution before folding into the running status.
  pub status: BuildStatus,
  pub control: StageControl,
}

impl StageReport {
  pub(crate) fn skipped(name: &str) -> Self {
    Self {
      name: name.to_string(),
      condition: ConditionResult::NotMet,
      outcomes: Vec::new(),
      status: BuildStatus::Success,
      control: StageControl::Continue,
    }
  }

  /// Whether any of this stage's actions were dispatched.
  ///
  /// A stage whose condition was met but which has no actions reports `false`; check
  /// `condition` to tell it apart from a skipped stage.
  pub fn ran(&self) -> bool {
    !self.outcomes.is_empty()
  }
}

/// Why a run stopped before its last stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaltInfo {
  pub stage: String,
  /// The fault that stopped the halting stage, if it was a fault rather than a plain failure.
  ///
  /// `None` for a plain `Failure`, including a condition that failed to evaluate under
  /// `RunnerStrategy::Fail`; that diagnostic lives in the stage's `ConditionResult::Errored`.
  pub fault: Option<Fault>,
}

/// Everything the host learns from one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceReport {
  pub status: BuildStatus,
  /// One entry per stage whose condition was considered, in declaration order.
  pub stages: Vec<StageReport>,
  pub halt: Option<HaltInfo>,
}

impl SequenceReport {
  pub fn halted(&self) -> bool {
    self.halt.is_some()
  }

  pub fn stage(&self, name: &str) -> Option<&StageReport> {
    self.stages.iter().find(|s| s.name == name)
  }

  /// Names of the stages that dispatched at least one action. Stages without actions never
  /// appear here.
  pub fn ran_stages(&self) -> Vec<&str> {
    self.stages.iter().filter(|s| s.ran()).map(|s| s.name.as_str()).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn met_stage_without_actions_did_not_run() {
    let report = SequenceReport {
      status: BuildStatus::Success,
      stages: vec![
        StageReport {
          name: "empty".to_string(),
          condition: ConditionResult::Met,
          outcomes: Vec::new(),
          status: BuildStatus::Success,
          control: StageControl::Continue,
        },
        StageReport::skipped("guarded"),
      ],
      halt: None,
    };

    let empty = report.stage("empty").unwrap();
    assert_eq!(empty.condition, ConditionResult::Met);
    assert!(!empty.ran());
    assert!(report.ran_stages().is_empty());
    assert_eq!(report.stage("guarded").map(|s| &s.condition), Some(&ConditionResult::NotMet));
  }

  #[test]
  fn verdict_halts_only_on_halt() {
    let halt = StageVerdict {
      status: BuildStatus::Failure,
      control: StageControl::Halt,
    };
    let go_on = StageVerdict {
      status: BuildStatus::Failure,
      control: StageControl::Continue,
    };
    assert!(halt.halts());
    assert!(!go_on.halts());
  }
}
