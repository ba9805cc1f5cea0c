// core/src/flow/step.rs

use super::ContextData;
use std::sync::Arc;

/// Predicate evaluated before a step runs; `true` skips the step.
pub type SkipCondition<TData> = Arc<dyn Fn(ContextData<TData>) -> bool + Send + Sync + 'static>;

/// How a step's failures affect the rest of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
  /// A failure aborts the flow and is returned to the caller.
  Required,
  /// A failure is logged at WARN and the flow moves on to the next step.
  /// A best-effort step with no handlers is silently skipped.
  BestEffort,
}

#[derive(Clone)]
pub struct StepDef<T: 'static + Send + Sync> {
  pub name: String,
  pub mode: StepMode,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync> StepDef<T> {
  pub fn is_best_effort(&self) -> bool {
    self.mode == StepMode::BestEffort
  }
}

impl<T: 'static + Send + Sync> std::fmt::Debug for StepDef<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("mode", &self.mode)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
