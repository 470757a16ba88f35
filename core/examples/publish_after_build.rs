// flexstep/examples/publish_after_build.rs

use flexstep::{
  ActionError, BuildStatus, ExecutionContext, FlexstepError, Sequence, Stage, StatusCondition, StepVerdict,
};
use tracing::info;

// 1. The data the build steps work on.
#[derive(Clone, Debug, Default)]
struct Build {
  tests_failed: u32,
  published: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), FlexstepError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Publish After Build Example ---");

  // 2. Stages run in order. Each one decides on its own whether it runs.
  let sequence = Sequence::from_stages([
    Stage::builder("test_report")
      .action_fn("junit", |ctx: ExecutionContext<Build>| async move {
        let failed = ctx.read().tests_failed;
        info!(failed, "Collected test results.");
        Ok::<_, ActionError>(if failed > 0 {
          StepVerdict::Unstable
        } else {
          StepVerdict::Passed
        })
      })
      .build()?,
    Stage::builder("deploy")
      .condition(StatusCondition::succeeded_so_far())
      .action_fn("deploy", |ctx: ExecutionContext<Build>| async move {
        ctx.write().published.push("deploy".to_string());
        Ok::<_, ActionError>(StepVerdict::Passed)
      })
      .build()?,
    Stage::builder("notify")
      .condition(StatusCondition::at_most(BuildStatus::Unstable))
      .action_fn("mail", |ctx: ExecutionContext<Build>| async move {
        let status = ctx.status();
        ctx.write().published.push(format!("mail:{status}"));
        Ok::<_, ActionError>(StepVerdict::Passed)
      })
      .build()?,
  ])?;

  // 3. One context per run.
  for tests_failed in [0, 3] {
    let ctx = ExecutionContext::new(Build {
      tests_failed,
      ..Default::default()
    });
    let report = sequence.execute_with_report(&ctx).await;
    info!(
      tests_failed,
      status = %report.status,
      ran = ?report.ran_stages(),
      published = ?ctx.read().published,
      "Run finished."
    );
  }

  Ok(())
}
