pub mod action;
pub mod context;
pub mod control;
pub mod outcome;
pub mod stage;
pub mod status;

// Re-export key types for easier access from other flexstep modules (and lib.rs)
pub use action::{Action, ActionHandler, FnAction, StepVerdict};
pub use context::ExecutionContext;
pub use control::{ConditionResult, HaltInfo, SequenceReport, StageControl, StageReport, StageVerdict};
pub use outcome::{Fault, FaultKind, Outcome};
pub use stage::{Stage, StageBuilder};
pub use status::BuildStatus;
