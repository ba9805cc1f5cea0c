// tests/flow_execution_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::sync::Arc;
use storefront_core::{ContextData, CoreError, Flow, FlowControl, FlowOutcome, FlowRegistry, StepMode};

fn three_step_flow(middle_mode: StepMode) -> Flow<TestContext, TestError> {
  Flow::new(
    "three_steps",
    &[("step1", StepMode::Required), ("step2", middle_mode), ("step3", StepMode::Required)],
  )
}

#[tokio::test]
#[serial]
async fn test_flow_runs_steps_in_order() {
  setup_tracing();
  let mut flow = three_step_flow(StepMode::Required);
  flow.on_step("step1", create_simple_handler("step1", " S1"));
  flow.on_step("step2", create_simple_handler("step2", " S2"));
  flow.on_step("step3", create_simple_handler("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  let outcome = flow.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " S1 S2 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_stop_halts_remaining_steps() {
  setup_tracing();
  let mut flow = three_step_flow(StepMode::Required);
  flow.on_step("step1", create_simple_handler("step1", "A"));
  flow.on_step("step2", create_simple_handler("step2", "B"));
  flow.on_step("step3", create_simple_handler("step3", "C"));

  let ctx = ContextData::new(TestContext {
    should_stop_at: Some("step2".to_string()),
    ..Default::default()
  });
  let outcome = flow.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Stopped);
  assert_eq!(ctx.read().steps_executed, vec!["step1", "step2"]);
}

#[tokio::test]
#[serial]
async fn test_required_step_failure_aborts_flow() {
  setup_tracing();
  let mut flow = three_step_flow(StepMode::Required);
  flow.on_step("step1", create_simple_handler("step1", "Good"));
  flow.on_step("step2", create_failing_handler("step2", "store unavailable"));
  flow.on_step("step3", create_simple_handler("step3", "NeverRun"));

  let ctx = ContextData::new(TestContext::default());
  let err = flow.run(ctx.clone()).await.unwrap_err();

  assert_eq!(err, TestError::Handler("store unavailable".to_string()));
  let guard = ctx.read();
  assert_eq!(guard.message, "Good");
  assert_eq!(guard.steps_executed, vec!["step1", "step2"]);
}

#[tokio::test]
#[serial]
async fn test_best_effort_failure_does_not_abort() {
  setup_tracing();
  let mut flow = three_step_flow(StepMode::BestEffort);
  flow.on_step("step1", create_simple_handler("step1", " S1"));
  flow.on_step("step2", create_failing_handler("step2", "bot offline"));
  flow.on_step("step3", create_simple_handler("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  let outcome = flow.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.message, " S1 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_skip_condition_skips_step() {
  setup_tracing();
  let mut flow = three_step_flow(StepMode::Required);
  flow.set_skip_condition("step2", Some(Arc::new(|ctx: ContextData<TestContext>| ctx.read().counter > 0)));
  flow.on_step("step1", create_simple_handler("step1", " S1"));
  flow.on_step("step2", create_simple_handler("step2", " SKIPPED"));
  flow.on_step("step3", create_simple_handler("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(flow.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(ctx.read().message, " S1 S3");
}

#[tokio::test]
#[serial]
async fn test_missing_handlers_required_vs_best_effort() {
  setup_tracing();
  let mut flow = three_step_flow(StepMode::BestEffort);
  flow.on_step("step1", create_simple_handler("step1", " S1"));
  flow.on_step("step3", create_simple_handler("step3", " S3"));
  let ctx = ContextData::new(TestContext::default());
  assert_eq!(flow.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);

  flow.set_mode("step2", StepMode::Required);
  let err = flow.run(ContextData::new(TestContext::default())).await.unwrap_err();
  assert!(matches!(err, TestError::Core(msg) if msg.contains("HandlerMissing")));
}

#[tokio::test]
#[serial]
async fn test_wiring_an_undefined_step_fails_every_run() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new("typo", &[("only", StepMode::Required)]);
  flow.on_step("only", create_simple_handler("only", "ran"));
  flow.on_step("olny", create_simple_handler("olny", "never"));

  let ctx = ContextData::new(TestContext::default());
  let err = flow.run(ctx.clone()).await.unwrap_err();
  assert!(matches!(err, TestError::Core(ref msg) if msg.contains("StepNotFound") && msg.contains("olny")));
  // Nothing ran, not even the correctly wired step.
  assert_eq!(ctx.read().counter, 0);
}

#[tokio::test]
#[serial]
async fn test_before_on_after_phases_run_in_order() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new("phases", &[("only", StepMode::Required)]);
  flow.after_step("only", create_simple_handler("after", "]"));
  flow.on_step("only", create_simple_handler("on", "x"));
  flow.before_step("only", create_simple_handler("before", "["));

  let ctx = ContextData::new(TestContext::default());
  flow.run(ctx.clone()).await.unwrap();
  let state = ctx.snapshot();
  assert_eq!(state.message, "[x]");
  assert_eq!(state.steps_executed, vec!["before", "on", "after"]);
}

#[tokio::test]
#[serial]
async fn test_handler_error_converts_into_flow_error() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new("convert", &[("only", StepMode::Required)]);
  flow.on_step("only", |_ctx: ContextData<TestContext>| async move {
    Err::<FlowControl, CoreError>(CoreError::InvalidStatus("Lost".to_string()))
  });

  let err = flow.run(ContextData::new(TestContext::default())).await.unwrap_err();
  assert!(matches!(err, TestError::Core(msg) if msg.contains("InvalidStatus")));
}

#[tokio::test]
#[serial]
async fn test_registry_dispatches_by_context_type() {
  setup_tracing();
  let registry = FlowRegistry::<TestError>::new();
  assert!(!registry.is_registered::<TestContext>());

  let mut flow = Flow::<TestContext, TestError>::new("registered", &[("only", StepMode::Required)]);
  flow.on_step("only", create_simple_handler("only", "ran"));
  registry.register(flow);
  assert!(registry.is_registered::<TestContext>());

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(registry.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(ctx.read().message, "ran");

  #[derive(Default)]
  struct Unregistered;
  let err = registry.run(ContextData::new(Unregistered)).await.unwrap_err();
  assert!(matches!(err, TestError::Core(msg) if msg.contains("FlowNotRegistered")));
}
