// flexstep/src/sequence/mod.rs

//! Defines the `Sequence<TData>` struct, its construction, the runner strategy and the
//! execution loop.

pub mod definition;
pub mod execution;
pub mod strategy;

pub use definition::Sequence;
pub use strategy::{ConditionErrorPolicy, RunnerStrategy};
