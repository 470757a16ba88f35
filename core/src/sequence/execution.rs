// flexstep/src/sequence/execution.rs

//! Contains `Sequence::execute()` and `Sequence::execute_with_report()`, which walk the stages
//! in order, fold each stage's status into the context and stop when a stage says to halt.

use crate::core::context::ExecutionContext;
use crate::core::control::{ConditionResult, HaltInfo, StageControl, StageReport, SequenceReport};
use crate::core::stage::Stage;
use crate::core::status::BuildStatus;
use crate::sequence::definition::Sequence;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData: 'static + Send + Sync> Sequence<TData> {
  /// Runs the sequence against `ctx` and returns the aggregated status.
  ///
  /// This never fails: action errors have already been classified by the runner and folded
  /// into the status. Use [`Sequence::execute_with_report`] to learn which stages ran and why
  /// the run halted.
  pub async fn execute(&self, ctx: &ExecutionContext<TData>) -> BuildStatus {
    self.execute_with_report(ctx).await.status
  }

  #[instrument(
    name = "Sequence::execute",
    skip_all,
    fields(
      context_data_type = %std::any::type_name::<TData>(),
      num_stages = self.stages.len(),
      initial_status = %ctx.status(),
    )
  )]
  pub async fn execute_with_report(&self, ctx: &ExecutionContext<TData>) -> SequenceReport {
    event!(Level::DEBUG, "Sequence execution starting.");
    let mut reports = Vec::with_capacity(self.stages.len());

    for (stage_idx, stage) in self.stages.iter().enumerate() {
      let stage_span = span!(
        Level::INFO,
        "stage_execution",
        stage_name = stage.name.as_str(),
        stage_index = stage_idx,
        strategy = %stage.strategy,
        continue_on_failure = stage.continue_on_failure
      );
      let report = self.run_stage(stage, ctx).instrument(stage_span).await;
      let status = ctx.record_status(report.status);

      if report.control == StageControl::Halt {
        let fault = report.outcomes.last().and_then(|o| o.fault()).cloned();
        event!(
          Level::WARN,
          stage_name = stage.name.as_str(),
          status = %status,
          remaining_stages = self.stages.len() - stage_idx - 1,
          "Sequence halted."
        );
        reports.push(report);
        return SequenceReport {
          status,
          stages: reports,
          halt: Some(HaltInfo {
            stage: stage.name.clone(),
            fault,
          }),
        };
      }
      reports.push(report);
    }

    let status = ctx.status();
    event!(Level::DEBUG, status = %status, "Sequence execution completed.");
    SequenceReport {
      status,
      stages: reports,
      halt: None,
    }
  }

  async fn run_stage(&self, stage: &Stage<TData>, ctx: &ExecutionContext<TData>) -> StageReport {
    let (condition, condition_status, run_actions) = match stage.condition.evaluate(ctx) {
      Ok(true) => (ConditionResult::Met, BuildStatus::Success, true),
      Ok(false) => {
        event!(Level::INFO, condition = %stage.condition.describe(), "Stage skipped, condition not met.");
        return StageReport::skipped(&stage.name);
      }
      Err(err) => {
        let policy = stage.strategy.on_condition_error();
        event!(
          Level::WARN,
          error = %err,
          run_actions = policy.run_actions,
          status = %policy.status,
          "Stage condition failed to evaluate."
        );
        (ConditionResult::Errored(err.to_string()), policy.status, policy.run_actions)
      }
    };

    let mut outcomes = Vec::new();
    if run_actions {
      for (action_idx, action) in stage.actions.iter().enumerate() {
        let outcome = self.runner.run(ctx, action.as_ref()).await;
        event!(Level::DEBUG, action = action.name(), action_index = action_idx, outcome = ?outcome, "Action finished.");
        let allows_next = stage.strategy.allows_next_action(&outcome);
        outcomes.push(outcome);
        if !allows_next {
          event!(
            Level::INFO,
            action = action.name(),
            skipped_actions = stage.actions.len() - action_idx - 1,
            "Stopping remaining actions of stage."
          );
          break;
        }
      }
    }

    let verdict = stage
      .strategy
      .conclude(condition_status, &outcomes, stage.continue_on_failure);
    event!(Level::DEBUG, status = %verdict.status, control = ?verdict.control, "Stage concluded.");

    StageReport {
      name: stage.name.clone(),
      condition,
      outcomes,
      status: verdict.status,
      control: verdict.control,
    }
  }
}
