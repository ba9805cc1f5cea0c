// core/src/flow/execution.rs

//! `Flow::run()`: executes steps in order against one `ContextData`.

use crate::error::CoreError;
use crate::flow::context_data::ContextData;
use crate::flow::control::{FlowControl, FlowOutcome};
use crate::flow::definition::{Flow, Phase};
use tracing::{event, info_span, instrument, Instrument, Level};

/// What happened to a single step.
enum StepResult<Err> {
  Done,
  Stopped,
  Failed(Err),
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<CoreError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// A required step's error is returned as-is. A best-effort step's error is
  /// logged and the run moves to the next step. A required step with no
  /// handlers in any phase yields `CoreError::HandlerMissing`, and a flow
  /// wired against an undefined step name yields `CoreError::StepNotFound`
  /// before any step runs.
  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(flow = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, Err> {
    if let Some(step_name) = self.unknown_steps.first() {
      return Err(Err::from(CoreError::StepNotFound {
        step_name: step_name.clone(),
      }));
    }
    event!(Level::DEBUG, "Flow execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx_data.clone()) {
          event!(Level::DEBUG, step = step_name, "Step skipped by its skip condition.");
          continue;
        }
      }

      let has_handlers = [Phase::Before, Phase::On, Phase::After]
        .iter()
        .any(|phase| !self.handlers(*phase, step_name).is_empty());
      if !has_handlers {
        if step_def.is_best_effort() {
          event!(Level::DEBUG, step = step_name, "Best-effort step has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, step = step_name, "Required step has no handlers.");
        return Err(Err::from(CoreError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let step_span = info_span!("flow_step", step = step_name, step_index = step_idx, mode = ?step_def.mode);
      match self.run_step(step_name, &ctx_data).instrument(step_span).await {
        StepResult::Done => {}
        StepResult::Stopped => {
          event!(Level::INFO, step = step_name, "Flow stopped by a handler.");
          return Ok(FlowOutcome::Stopped);
        }
        StepResult::Failed(err) if step_def.is_best_effort() => {
          event!(Level::WARN, step = step_name, error = %err, "Best-effort step failed; continuing.");
        }
        StepResult::Failed(err) => {
          event!(Level::ERROR, step = step_name, error = %err, "Required step failed.");
          return Err(err);
        }
      }
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowOutcome::Completed)
  }

  async fn run_step(&self, step_name: &str, ctx_data: &ContextData<TData>) -> StepResult<Err> {
    for phase in [Phase::Before, Phase::On, Phase::After] {
      for (handler_idx, handler_fn) in self.handlers(phase, step_name).iter().enumerate() {
        event!(Level::TRACE, phase = phase.as_str(), handler_index = handler_idx, "Running handler.");
        match handler_fn(ctx_data.clone()).await {
          Ok(FlowControl::Continue) => {}
          Ok(FlowControl::Stop) => return StepResult::Stopped,
          Err(e) => return StepResult::Failed(e),
        }
      }
    }
    StepResult::Done
  }
}
