// core/src/flow/definition.rs

//! The `Flow<TData, Err>` definition: step list plus handler registration.

use crate::error::CoreError;
use crate::flow::context_data::ContextData;
use crate::flow::control::FlowControl;
use crate::flow::step::{SkipCondition, StepDef, StepMode};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{event, Level};

/// A boxed async step handler.
///
/// Handlers receive a clone of the run's `ContextData<TData>`. They must drop
/// any lock guard before awaiting.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<FlowControl, Err>> + Send>> + Send + Sync,
>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  pub(crate) fn as_str(self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

/// An ordered, named-step flow over `TData` whose handlers fail with `Err`.
///
/// `Err` must be constructible from [`CoreError`] so configuration problems
/// (such as a required step with no handlers) surface in the caller's error type.
pub struct Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<CoreError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
  /// Step names used while wiring that the step list does not contain.
  pub(crate) unknown_steps: Vec<String>,
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<CoreError> + Send + Sync + 'static,
{
  /// Creates a flow named `name` with the given `(step_name, mode)` list.
  pub fn new(name: impl Into<String>, step_defs: &[(&str, StepMode)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(step_name, mode)| StepDef {
        name: (*step_name).to_string(),
        mode: *mode,
        skip_if: None,
      })
      .collect();

    Self {
      name: name.into(),
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
      unknown_steps: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// An unknown name is remembered and reported as `CoreError::StepNotFound`
  /// by every later `run`.
  fn step_mut(&mut self, step_name: &str) -> Option<&mut StepDef<TData>> {
    let found = self.steps.iter().position(|s| s.name == step_name);
    if found.is_none() && !self.unknown_steps.iter().any(|s| s == step_name) {
      event!(Level::ERROR, flow = %self.name, step = step_name, "Wiring refers to a step the flow does not define.");
      self.unknown_steps.push(step_name.to_string());
    }
    found.map(|idx| &mut self.steps[idx])
  }

  pub fn set_mode(&mut self, step_name: &str, mode: StepMode) {
    if let Some(step) = self.step_mut(step_name) {
      step.mode = mode;
    }
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    if let Some(step) = self.step_mut(step_name) {
      step.skip_if = skip_if;
    }
  }

  pub fn before_step<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<FlowControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::Before, step_name, handler_fn);
  }

  pub fn on_step<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<FlowControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::On, step_name, handler_fn);
  }

  pub fn after_step<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<FlowControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::After, step_name, handler_fn);
  }

  fn register<F, UserErr>(
    &mut self,
    phase: Phase,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<FlowControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    if self.step_mut(step_name).is_none() {
      return;
    }
    let handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let user_fut = handler_fn(ctx_data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    let table = match phase {
      Phase::Before => &mut self.before,
      Phase::On => &mut self.on,
      Phase::After => &mut self.after,
    };
    table.entry(step_name.to_string()).or_default().push(handler);
  }

  pub(crate) fn handlers(&self, phase: Phase, step_name: &str) -> &[Handler<TData, Err>] {
    let table = match phase {
      Phase::Before => &self.before,
      Phase::On => &self.on,
      Phase::After => &self.after,
    };
    table.get(step_name).map(Vec::as_slice).unwrap_or(&[])
  }
}
