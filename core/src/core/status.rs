// flexstep/src/core/status.rs

//! The totally ordered build status and the aggregation rule over it.

use crate::error::FlexstepError;
use std::fmt;
use std::str::FromStr;

/// Result of a stage or of a whole run.
///
/// Variants are declared from best to worst, so the derived `Ord` is the "worse wins" order:
/// `Success < Unstable < Failure < Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BuildStatus {
  #[default]
  Success,
  Unstable,
  Failure,
  Aborted,
}

impl BuildStatus {
  pub const ALL: [BuildStatus; 4] = [
    BuildStatus::Success,
    BuildStatus::Unstable,
    BuildStatus::Failure,
    BuildStatus::Aborted,
  ];

  /// Folds a newly observed status into `self`. The worse of the two wins; ties keep `self`.
  pub fn combine(self, observed: BuildStatus) -> BuildStatus {
    if observed > self {
      observed
    } else {
      self
    }
  }

  /// Worst status in `statuses`, or `Success` when empty.
  pub fn worst_of<I: IntoIterator<Item = BuildStatus>>(statuses: I) -> BuildStatus {
    statuses.into_iter().fold(BuildStatus::Success, BuildStatus::combine)
  }

  pub fn is_worse_than(self, other: BuildStatus) -> bool {
    self > other
  }

  pub fn is_better_or_equal_to(self, other: BuildStatus) -> bool {
    self <= other
  }

  /// `Failure` or `Aborted`.
  pub fn is_failed(self) -> bool {
    self >= BuildStatus::Failure
  }

  pub fn as_str(self) -> &'static str {
    match self {
      BuildStatus::Success => "SUCCESS",
      BuildStatus::Unstable => "UNSTABLE",
      BuildStatus::Failure => "FAILURE",
      BuildStatus::Aborted => "ABORTED",
    }
  }
}

impl fmt::Display for BuildStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BuildStatus {
  type Err = FlexstepError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    BuildStatus::ALL
      .into_iter()
      .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| FlexstepError::InvalidStatus(s.to_string()))
  }
}

/// Free-function form of [`BuildStatus::combine`].
pub fn combine(current: BuildStatus, observed: BuildStatus) -> BuildStatus {
  current.combine(observed)
}
