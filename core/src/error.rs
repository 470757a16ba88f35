// flexstep/src/error.rs
use anyhow::Error as AnyhowError;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while building or editing a `Sequence`, or while parsing configuration tags.
///
/// These never come out of a run: execution reports statuses, not errors.
#[derive(Debug, Error)]
pub enum FlexstepError {
  #[error("Stage not found: {stage_name}")]
  StageNotFound { stage_name: String },

  #[error("Stage already exists in sequence: {stage_name}")]
  DuplicateStage { stage_name: String },

  #[error("Stage name must not be empty")]
  EmptyStageName,

  #[error("Unknown runner strategy '{0}' (expected one of: fail, unstable, run-unstable, run, dont-run)")]
  InvalidStrategy(String),

  #[error("Unknown build status '{0}' (expected one of: SUCCESS, UNSTABLE, FAILURE, ABORTED)")]
  InvalidStatus(String),

  #[error("Internal flexstep error: {0}")]
  Internal(String),
}

// Lets host configuration code mix `anyhow` and `?` when building sequences.
impl From<AnyhowError> for FlexstepError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<FlexstepError>() {
      Ok(flexstep_err) => flexstep_err,
      Err(other) => FlexstepError::Internal(format!("{other:#}")),
    }
  }
}

pub type FlexstepResult<T, E = FlexstepError> = std::result::Result<T, E>;

/// Error returned by an `Action` that did not finish normally.
///
/// `ActionError::Abort` is the only variant an `ActionRunner` treats as recoverable.
/// Everything else is an unexpected fault and halts the whole sequence.
#[derive(Debug, Error)]
pub enum ActionError {
  /// The action deliberately gave up on its own stage.
  #[error("Action aborted: {0}")]
  Abort(String),

  #[error("I/O failure: {0}")]
  Io(#[from] std::io::Error),

  #[error("Action cancelled before it could run")]
  Cancelled,

  #[error("Action timed out after {0:?}")]
  TimedOut(Duration),

  #[error(transparent)]
  Other(#[from] AnyhowError),
}

impl ActionError {
  pub fn abort(message: impl Into<String>) -> Self {
    ActionError::Abort(message.into())
  }

  pub fn is_recoverable(&self) -> bool {
    matches!(self, ActionError::Abort(_))
  }
}

/// A `RunCondition` could not decide whether its stage should run.
#[derive(Debug, Error)]
#[error("Condition evaluation failed: {message}")]
pub struct ConditionError {
  pub message: String,
  #[source]
  pub source: Option<AnyhowError>,
}

impl ConditionError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      source: None,
    }
  }

  pub fn with_source(message: impl Into<String>, source: AnyhowError) -> Self {
    Self {
      message: message.into(),
      source: Some(source),
    }
  }
}
