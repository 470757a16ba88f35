// flexstep/src/core/outcome.rs

//! Per-action outcomes and the classification of action errors into faults.

use crate::core::action::StepVerdict;
use crate::core::status::BuildStatus;
use crate::error::ActionError;
use std::fmt;

/// How far a fault is allowed to travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
  /// Abort-style signal. Stops the action's own stage and counts as `Failure`.
  Recoverable,
  /// Anything unexpected (I/O, timeout, cancellation). Always halts the sequence.
  Unrecoverable,
}

/// An action that terminated abnormally, with the diagnostic the host may want to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
  pub kind: FaultKind,
  pub diagnostic: String,
}

impl fmt::Display for Fault {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} fault: {}", self.kind, self.diagnostic)
  }
}

/// Result of running one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  Success,
  Unstable,
  Failure,
  Fault(Fault),
}

impl Outcome {
  pub fn recoverable(diagnostic: impl Into<String>) -> Self {
    Outcome::Fault(Fault {
      kind: FaultKind::Recoverable,
      diagnostic: diagnostic.into(),
    })
  }

  pub fn unrecoverable(diagnostic: impl Into<String>) -> Self {
    Outcome::Fault(Fault {
      kind: FaultKind::Unrecoverable,
      diagnostic: diagnostic.into(),
    })
  }

  /// Maps an action's result onto the fixed outcome variants.
  pub fn classify(result: Result<StepVerdict, ActionError>) -> Self {
    match result {
      Ok(verdict) => verdict.into(),
      Err(err) => err.into(),
    }
  }

  /// Status contribution of this outcome. Faults of either kind count as `Failure`.
  pub fn status(&self) -> BuildStatus {
    match self {
      Outcome::Success => BuildStatus::Success,
      Outcome::Unstable => BuildStatus::Unstable,
      Outcome::Failure | Outcome::Fault(_) => BuildStatus::Failure,
    }
  }

  /// True when no further action of the same stage may run after this one.
  pub fn stops_stage(&self) -> bool {
    matches!(self, Outcome::Failure | Outcome::Fault(_))
  }

  pub fn is_unrecoverable(&self) -> bool {
    matches!(
      self,
      Outcome::Fault(Fault {
        kind: FaultKind::Unrecoverable,
        ..
      })
    )
  }

  pub fn fault(&self) -> Option<&Fault> {
    match self {
      Outcome::Fault(fault) => Some(fault),
      _ => None,
    }
  }
}

impl From<StepVerdict> for Outcome {
  fn from(verdict: StepVerdict) -> Self {
    match verdict {
      StepVerdict::Passed => Outcome::Success,
      StepVerdict::Unstable => Outcome::Unstable,
      StepVerdict::Failed => Outcome::Failure,
    }
  }
}

impl From<ActionError> for Outcome {
  fn from(err: ActionError) -> Self {
    if err.is_recoverable() {
      Outcome::recoverable(err.to_string())
    } else {
      Outcome::unrecoverable(err.to_string())
    }
  }
}
