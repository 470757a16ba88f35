// flexstep/examples/fault_handling.rs

use flexstep::{
  ActionError, ClassifyingRunner, ConditionError, ExecutionContext, FnCondition, FlexstepError, RunnerStrategy, Sequence, Stage, StepVerdict,
};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Clone, Debug, Default)]
struct Build {
  log: Vec<String>,
}

fn record(ctx: &ExecutionContext<Build>, line: &str) {
  ctx.write().log.push(line.to_string());
}

#[tokio::main]
async fn main() -> Result<(), FlexstepError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

  info!("--- Fault Handling Example ---");

  let sequence = Sequence::from_stages([
    // An abort only ends its own stage; the next stage still runs.
    Stage::builder("archive")
      .action_fn("archiver", |ctx: ExecutionContext<Build>| async move {
        record(&ctx, "archiver");
        Err::<StepVerdict, _>(ActionError::abort("nothing to archive"))
      })
      .action_fn("fingerprint", |ctx: ExecutionContext<Build>| async move {
        record(&ctx, "fingerprint");
        Ok::<_, ActionError>(StepVerdict::Passed)
      })
      .continue_on_failure(true)
      .build()?,
    // The condition cannot be evaluated, the strategy decides what that means.
    Stage::builder("optional_publish")
      .condition(FnCondition::fallible("branch_known", |_ctx: &ExecutionContext<Build>| {
        Err(ConditionError::new("parameter BRANCH is not defined"))
      }))
      .strategy(RunnerStrategy::DontRun)
      .action_fn("publish", |ctx: ExecutionContext<Build>| async move {
        record(&ctx, "publish");
        Ok::<_, ActionError>(StepVerdict::Passed)
      })
      .build()?,
    // A timeout is unrecoverable and stops everything.
    Stage::builder("upload")
      .action_fn("upload", |ctx: ExecutionContext<Build>| async move {
        record(&ctx, "upload");
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok::<_, ActionError>(StepVerdict::Passed)
      })
      .continue_on_failure(true)
      .build()?,
    Stage::builder("cleanup")
      .action_fn("cleanup", |ctx: ExecutionContext<Build>| async move {
        record(&ctx, "cleanup");
        Ok::<_, ActionError>(StepVerdict::Passed)
      })
      .build()?,
  ])?
  .with_runner(ClassifyingRunner::new().with_timeout(Duration::from_millis(100)));

  let ctx = ExecutionContext::new(Build::default());
  let report = sequence.execute_with_report(&ctx).await;

  for stage in &report.stages {
    info!(stage = %stage.name, condition = ?stage.condition, status = %stage.status, outcomes = ?stage.outcomes, "Stage report.");
  }
  if let Some(halt) = &report.halt {
    warn!(stage = %halt.stage, fault = ?halt.fault, "Sequence halted.");
  }
  info!(status = %report.status, log = ?ctx.read().log, "Final status.");

  Ok(())
}
