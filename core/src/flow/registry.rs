// core/src/flow/registry.rs

//! `FlowRegistry<E>`: flows keyed by the `TData` they run over.
//!
//! Handlers look a flow up by context type and run it, so the HTTP layer only
//! needs the registry and never a concrete flow value.

use crate::error::CoreError;
use crate::flow::context_data::ContextData;
use crate::flow::control::FlowOutcome;
use crate::flow::definition::Flow;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait ErasedFlow<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<FlowOutcome, AppErr>;
}

struct FlowRunner<TData, FlowErr>
where
  TData: 'static + Send + Sync,
  FlowErr: std::error::Error + From<CoreError> + Send + Sync + 'static,
{
  flow: Arc<Flow<TData, FlowErr>>,
}

#[async_trait]
impl<TData, FlowErr, AppErr> ErasedFlow<AppErr> for FlowRunner<TData, FlowErr>
where
  TData: 'static + Send + Sync,
  FlowErr: std::error::Error + From<CoreError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<FlowErr> + From<CoreError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<FlowOutcome, AppErr> {
    let ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>().to_string();
        event!(Level::ERROR, %expected_type, "Context type mismatch in flow dispatch.");
        return Err(AppErr::from(CoreError::TypeMismatch { expected_type }));
      }
    };
    self.flow.run(ctx_data).await.map_err(AppErr::from)
  }
}

/// Type-keyed flow registry returning `AppErr` from every run.
pub struct FlowRegistry<AppErr = CoreError>
where
  AppErr: std::error::Error + From<CoreError> + Send + Sync + 'static,
{
  flows: RwLock<HashMap<TypeId, Arc<dyn ErasedFlow<AppErr>>>>,
  _phantom: PhantomData<AppErr>,
}

impl<AppErr> FlowRegistry<AppErr>
where
  AppErr: std::error::Error + From<CoreError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      flows: RwLock::new(HashMap::new()),
      _phantom: PhantomData,
    }
  }

  /// Registers `flow` for its context type, replacing any earlier registration.
  pub fn register<TData, FlowErr>(&self, flow: Flow<TData, FlowErr>)
  where
    TData: 'static + Send + Sync,
    FlowErr: std::error::Error + From<CoreError> + Send + Sync + 'static,
    AppErr: From<FlowErr>,
  {
    event!(Level::DEBUG, flow = flow.name(), tdata_type = %std::any::type_name::<TData>(), "Registering flow.");
    let runner = FlowRunner { flow: Arc::new(flow) };
    self.flows.write().insert(TypeId::of::<TData>(), Arc::new(runner));
  }

  pub fn is_registered<TData: 'static + Send + Sync>(&self) -> bool {
    self.flows.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the flow registered for `TData`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.flows.read().get(&TypeId::of::<TData>()).cloned();
    let runner = runner.ok_or_else(|| {
      let type_name = std::any::type_name::<TData>().to_string();
      event!(Level::ERROR, %type_name, "No flow registered for context type.");
      AppErr::from(CoreError::FlowNotRegistered { type_name })
    })?;
    runner.run_erased(Box::new(ctx_data)).await
  }
}

impl<AppErr> Default for FlowRegistry<AppErr>
where
  AppErr: std::error::Error + From<CoreError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
