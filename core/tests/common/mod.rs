// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use flexstep::{Action, ActionError, ConditionError, ExecutionContext, RunCondition, StepVerdict};
use std::path::{Path, PathBuf};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::time::Duration;
use tempfile::TempDir;
use tracing::Level;

// --- Host data for the tests: a build with a workspace and an artifacts directory ---
#[derive(Debug, Clone, Default)]
pub struct BuildData {
  pub workspace: PathBuf,
  pub artifacts_dir: PathBuf,
  pub actions_executed: Vec<String>,
}

/// Owns the temporary directories backing a `BuildData`. Keep it alive for the whole test.
pub struct TestBuild {
  _root: TempDir,
  pub ctx: ExecutionContext<BuildData>,
}

impl TestBuild {
  pub fn new() -> Self {
    let root = tempfile::tempdir().expect("create temp dir");
    let workspace = root.path().join("workspace");
    let artifacts_dir = root.path().join("artifacts");
    std::fs::create_dir_all(&workspace).expect("create workspace");
    std::fs::create_dir_all(&artifacts_dir).expect("create artifacts dir");
    let ctx = ExecutionContext::new(BuildData {
      workspace,
      artifacts_dir,
      actions_executed: Vec::new(),
    });
    Self { _root: root, ctx }
  }

  pub fn artifact(&self, file_name: &str) -> PathBuf {
    self.ctx.read().artifacts_dir.join(file_name)
  }

  pub fn executed(&self) -> Vec<String> {
    self.ctx.read().actions_executed.clone()
  }
}

fn record(ctx: &ExecutionContext<BuildData>, name: &str) {
  ctx.map_write(|data| &mut data.actions_executed).push(name.to_string());
}

// --- Test actions ---

/// Passes or fails depending on the flag it was created with.
pub struct TrueFalseAction {
  pub name: &'static str,
  pub passes: bool,
}

#[async_trait]
impl Action<BuildData> for TrueFalseAction {
  fn name(&self) -> &str {
    self.name
  }

  async fn perform(&self, ctx: ExecutionContext<BuildData>) -> Result<StepVerdict, ActionError> {
    record(&ctx, self.name);
    Ok(StepVerdict::from(self.passes))
  }
}

/// Reports a fixed verdict.
pub struct VerdictAction {
  pub name: String,
  pub verdict: StepVerdict,
}

impl VerdictAction {
  pub fn new(name: impl Into<String>, verdict: StepVerdict) -> Self {
    Self {
      name: name.into(),
      verdict,
    }
  }
}

#[async_trait]
impl Action<BuildData> for VerdictAction {
  fn name(&self) -> &str {
    &self.name
  }

  async fn perform(&self, ctx: ExecutionContext<BuildData>) -> Result<StepVerdict, ActionError> {
    record(&ctx, &self.name);
    Ok(self.verdict)
  }
}

/// Gives up on its own stage.
pub struct AbortAction;

#[async_trait]
impl Action<BuildData> for AbortAction {
  fn name(&self) -> &str {
    "abort"
  }

  async fn perform(&self, ctx: ExecutionContext<BuildData>) -> Result<StepVerdict, ActionError> {
    record(&ctx, "abort");
    Err(ActionError::abort("publisher decided to stop"))
  }
}

/// Fails with an I/O error by reading a file that does not exist.
pub struct IoErrorAction;

#[async_trait]
impl Action<BuildData> for IoErrorAction {
  fn name(&self) -> &str {
    "io_error"
  }

  async fn perform(&self, ctx: ExecutionContext<BuildData>) -> Result<StepVerdict, ActionError> {
    record(&ctx, "io_error");
    let missing = ctx.read().workspace.join("does-not-exist.txt");
    std::fs::read_to_string(missing)?;
    Ok(StepVerdict::Passed)
  }
}

/// Writes the status seen so far into a workspace file.
pub struct ResultWriterAction {
  pub file_name: &'static str,
}

#[async_trait]
impl Action<BuildData> for ResultWriterAction {
  fn name(&self) -> &str {
    "result_writer"
  }

  async fn perform(&self, ctx: ExecutionContext<BuildData>) -> Result<StepVerdict, ActionError> {
    record(&ctx, "result_writer");
    let target = ctx.read().workspace.join(self.file_name);
    std::fs::write(target, ctx.status().to_string())?;
    Ok(StepVerdict::Passed)
  }
}

/// Copies a workspace file into the artifacts directory.
pub struct ArtifactArchiverAction {
  pub file_name: &'static str,
}

#[async_trait]
impl Action<BuildData> for ArtifactArchiverAction {
  fn name(&self) -> &str {
    "artifact_archiver"
  }

  async fn perform(&self, ctx: ExecutionContext<BuildData>) -> Result<StepVerdict, ActionError> {
    record(&ctx, "artifact_archiver");
    let source = ctx.map_read(|data| &data.workspace).join(self.file_name);
    let target = ctx.map_read(|data| &data.artifacts_dir).join(self.file_name);
    std::fs::copy(source, target)?;
    Ok(StepVerdict::Passed)
  }
}

/// Sleeps before passing.
pub struct SlowAction {
  pub delay: Duration,
}

#[async_trait]
impl Action<BuildData> for SlowAction {
  fn name(&self) -> &str {
    "slow"
  }

  async fn perform(&self, ctx: ExecutionContext<BuildData>) -> Result<StepVerdict, ActionError> {
    record(&ctx, "slow");
    tokio::time::sleep(self.delay).await;
    Ok(StepVerdict::Passed)
  }
}

// --- Test conditions ---

/// Counts its evaluations in `CONDITION_EVAL_COUNTER` and answers with a fixed value.
pub struct CountingCondition(pub bool);

impl RunCondition<BuildData> for CountingCondition {
  fn evaluate(&self, _ctx: &ExecutionContext<BuildData>) -> Result<bool, ConditionError> {
    CONDITION_EVAL_COUNTER.fetch_add(1, Ordering::SeqCst);
    Ok(self.0)
  }
}

/// Always fails to evaluate.
pub struct BrokenCondition;

impl RunCondition<BuildData> for BrokenCondition {
  fn evaluate(&self, _ctx: &ExecutionContext<BuildData>) -> Result<bool, ConditionError> {
    Err(ConditionError::new("parameter BRANCH is not defined"))
  }
}

pub fn read_to_string(path: &Path) -> String {
  std::fs::read_to_string(path).expect("read artifact")
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counters for checking evaluation counts ---
pub static CONDITION_EVAL_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  CONDITION_EVAL_COUNTER.store(0, Ordering::SeqCst);
}

pub fn condition_evaluations() -> usize {
  CONDITION_EVAL_COUNTER.load(Ordering::SeqCst)
}
