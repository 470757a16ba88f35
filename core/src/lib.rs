// src/lib.rs

//! Flexstep: a conditional stage-sequence executor for build and CI pipelines.
//!
//! A `Sequence` is an ordered list of guarded `Stage`s. Each stage has
//!  - a `RunCondition` deciding whether its actions run at all,
//!  - ordered `Action`s (build steps) dispatched one at a time through an `ActionRunner`,
//!  - a `RunnerStrategy` and a `continue_on_failure` flag deciding what its result means
//!    for the rest of the run.
//!
//! Every run owns one `ExecutionContext` carrying the running `BuildStatus`, which only ever
//! gets worse (`Success < Unstable < Failure < Aborted`).
//!
//! Three failure channels are kept apart:
//!  - a plain `Failure` outcome stops the stage and halts the sequence only if the stage
//!    does not continue on failure;
//!  - a recoverable fault (an action aborting its own stage) is treated exactly like `Failure`;
//!  - an unrecoverable fault (I/O, timeout, cancellation) always halts the sequence.

pub mod condition;
pub mod core;
pub mod error;
pub mod runner;
pub mod sequence;

// --- Re-exports for the Public API ---

pub use crate::core::action::{Action, FnAction, StepVerdict};
pub use crate::core::context::ExecutionContext;
pub use crate::core::control::{ConditionResult, HaltInfo, SequenceReport, StageControl, StageReport, StageVerdict};
pub use crate::core::outcome::{Fault, FaultKind, Outcome};
pub use crate::core::stage::{Stage, StageBuilder};
pub use crate::core::status::{combine, BuildStatus};

pub use crate::condition::{AlwaysRun, And, FnCondition, NeverRun, Not, Or, RunCondition, StatusCondition};

pub use crate::runner::{ActionRunner, ClassifyingRunner};
pub use crate::sequence::{ConditionErrorPolicy, RunnerStrategy, Sequence};

pub use crate::error::{ActionError, ConditionError, FlexstepError, FlexstepResult};

/*
    Typical use:
    1. Define the host data `MyBuild` the actions need (workspace paths, parameters...).
    2. Build stages with `Stage::builder("name")`, giving each a condition, its actions,
       a `RunnerStrategy` and `continue_on_failure`.
    3. Collect them with `Sequence::from_stages(...)`, optionally `.with_runner(...)`.
    4. Create one `ExecutionContext::new(my_build)` per run and call
       `sequence.execute(&ctx).await` (or `execute_with_report`).
*/
