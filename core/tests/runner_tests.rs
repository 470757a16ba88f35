// tests/runner_tests.rs
mod common;

use async_trait::async_trait;
use common::*;
use flexstep::{
  Action, ActionRunner, BuildStatus, ClassifyingRunner, ExecutionContext, FaultKind, Outcome, Sequence, Stage,
  StepVerdict,
};
use serial_test::serial;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
#[serial]
async fn test_classifying_runner_maps_each_channel() {
  setup_tracing();
  let build = TestBuild::new();
  let runner = ClassifyingRunner::new();

  let passed = runner
    .run(&build.ctx, &TrueFalseAction { name: "t", passes: true })
    .await;
  assert_eq!(passed, Outcome::Success);

  let failed = runner
    .run(&build.ctx, &TrueFalseAction { name: "f", passes: false })
    .await;
  assert_eq!(failed, Outcome::Failure);

  let aborted = runner.run(&build.ctx, &AbortAction).await;
  assert_eq!(aborted.fault().map(|f| f.kind), Some(FaultKind::Recoverable));

  let io = runner.run(&build.ctx, &IoErrorAction).await;
  assert!(io.is_unrecoverable());
}

#[tokio::test]
#[serial]
async fn test_timeout_is_unrecoverable() {
  setup_tracing();
  let build = TestBuild::new();
  let sequence = Sequence::from_stages([
    Stage::builder("slow_stage")
      .action(SlowAction {
        delay: Duration::from_secs(5),
      })
      .build()
      .unwrap(),
    Stage::builder("after")
      .action(TrueFalseAction {
        name: "after_action",
        passes: true,
      })
      .build()
      .unwrap(),
  ])
  .unwrap()
  .with_runner(ClassifyingRunner::new().with_timeout(Duration::from_millis(20)));

  let report = sequence.execute_with_report(&build.ctx).await;

  assert_eq!(report.status, BuildStatus::Failure);
  let fault = report.halt.and_then(|h| h.fault).expect("timeout fault");
  assert_eq!(fault.kind, FaultKind::Unrecoverable);
  assert!(fault.diagnostic.contains("timed out"));
  assert_eq!(build.executed(), vec!["slow"]);
}

#[tokio::test]
#[serial]
async fn test_fast_action_passes_within_timeout() {
  setup_tracing();
  let build = TestBuild::new();
  let sequence = Sequence::from_stages([Stage::builder("quick")
    .action(SlowAction {
      delay: Duration::from_millis(1),
    })
    .build()
    .unwrap()])
  .unwrap()
  .with_runner(ClassifyingRunner::new().with_timeout(Duration::from_secs(5)));

  assert_eq!(sequence.execute(&build.ctx).await, BuildStatus::Success);
}

/// Sets the cancellation flag while it runs, like a user pressing "abort" mid-build.
struct CancellingAction(Arc<AtomicBool>);

#[async_trait]
impl Action<BuildData> for CancellingAction {
  fn name(&self) -> &str {
    "cancelling"
  }

  async fn perform(&self, ctx: ExecutionContext<BuildData>) -> Result<StepVerdict, flexstep::ActionError> {
    ctx.write().actions_executed.push("cancelling".to_string());
    self.0.store(true, Ordering::SeqCst);
    Ok(StepVerdict::Passed)
  }
}

#[tokio::test]
#[serial]
async fn test_cancellation_refuses_next_action_and_halts() {
  setup_tracing();
  let build = TestBuild::new();
  let cancelled = Arc::new(AtomicBool::new(false));
  let sequence = Sequence::from_stages([
    Stage::builder("lenient")
      .action(CancellingAction(cancelled.clone()))
      .action(TrueFalseAction {
        name: "refused",
        passes: true,
      })
      .continue_on_failure(true)
      .build()
      .unwrap(),
    Stage::builder("after")
      .action(TrueFalseAction {
        name: "after_action",
        passes: true,
      })
      .build()
      .unwrap(),
  ])
  .unwrap()
  .with_runner(ClassifyingRunner::new().with_cancellation(cancelled));

  let report = sequence.execute_with_report(&build.ctx).await;

  assert_eq!(report.status, BuildStatus::Failure);
  assert_eq!(build.executed(), vec!["cancelling"]);
  let outcomes = &report.stage("lenient").unwrap().outcomes;
  assert_eq!(outcomes.len(), 2);
  assert!(outcomes[1].is_unrecoverable());
  assert_eq!(report.halt.map(|h| h.stage).as_deref(), Some("lenient"));
}

/// A host runner that treats every action as unstable, to show the runner seam is pluggable.
struct AlwaysUnstableRunner;

#[async_trait]
impl ActionRunner<BuildData> for AlwaysUnstableRunner {
  async fn run(&self, _ctx: &ExecutionContext<BuildData>, _action: &dyn Action<BuildData>) -> Outcome {
    Outcome::Unstable
  }
}

#[tokio::test]
#[serial]
async fn test_custom_runner_is_used() {
  setup_tracing();
  let build = TestBuild::new();
  let sequence = Sequence::from_stages([Stage::builder("s").action(IoErrorAction).build().unwrap()])
    .unwrap()
    .with_runner(AlwaysUnstableRunner);

  assert_eq!(sequence.execute(&build.ctx).await, BuildStatus::Unstable);
  assert!(build.executed().is_empty(), "the custom runner never performs actions");
}
