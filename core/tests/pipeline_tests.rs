// tests/pipeline_tests.rs
mod common;

use common::setup_tracing;
use serial_test::serial;
use std::future::Future;
use std::pin::Pin;
use storefront::{ContextData, Pipeline, PipelineControl, PipelineError, PipelineResult};

#[derive(Debug, Default, Clone)]
struct Trace {
  steps: Vec<&'static str>,
}

#[derive(Debug, thiserror::Error)]
enum TestError {
  #[error("pipeline: {0}")]
  Pipeline(#[from] PipelineError),
  #[error("handler failed: {0}")]
  Handler(&'static str),
}

type StepFuture = Pin<Box<dyn Future<Output = Result<PipelineControl, TestError>> + Send>>;

fn record(step: &'static str) -> impl Fn(ContextData<Trace>) -> StepFuture + Send + Sync + 'static {
  move |ctx: ContextData<Trace>| -> StepFuture {
    Box::pin(async move {
      ctx.write().steps.push(step);
      Ok(PipelineControl::Continue)
    })
  }
}

#[tokio::test]
#[serial]
async fn runs_steps_in_declaration_order() {
  setup_tracing();
  let mut p = Pipeline::<Trace, TestError>::new("ordered", &["first", "second", "third"]);
  // Registered out of order on purpose.
  p.on_root("third", record("third"));
  p.on_root("first", record("first"));
  p.on_root("second", record("second"));

  let ctx = ContextData::new(Trace::default());
  let result = p.run(ctx.clone()).await.unwrap();

  assert_eq!(result, PipelineResult::Completed);
  assert_eq!(ctx.read().steps, vec!["first", "second", "third"]);
}

#[tokio::test]
#[serial]
async fn multiple_handlers_on_one_step_run_in_registration_order() {
  setup_tracing();
  let mut p = Pipeline::<Trace, TestError>::new("stacked", &["only"]);
  p.on_root("only", record("a"));
  p.on_root("only", record("b"));

  let ctx = ContextData::new(Trace::default());
  p.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().steps, vec!["a", "b"]);
}

#[tokio::test]
#[serial]
async fn stop_halts_remaining_steps() {
  setup_tracing();
  let mut p = Pipeline::<Trace, TestError>::new("halting", &["first", "gate", "never"]);
  p.on_root("first", record("first"));
  p.on_root("gate", |ctx: ContextData<Trace>| {
    Box::pin(async move {
      ctx.write().steps.push("gate");
      Ok::<_, TestError>(PipelineControl::Stop)
    })
  });
  p.on_root("never", record("never"));

  let ctx = ContextData::new(Trace::default());
  let result = p.run(ctx.clone()).await.unwrap();

  assert_eq!(result, PipelineResult::Stopped);
  assert_eq!(ctx.read().steps, vec!["first", "gate"]);
}

#[tokio::test]
#[serial]
async fn handler_error_aborts_run_and_is_returned_unchanged() {
  setup_tracing();
  let mut p = Pipeline::<Trace, TestError>::new("failing", &["ok", "boom", "after"]);
  p.on_root("ok", record("ok"));
  p.on_root("boom", |_ctx: ContextData<Trace>| {
    Box::pin(async move { Err::<PipelineControl, _>(TestError::Handler("boom")) })
  });
  p.on_root("after", record("after"));

  let ctx = ContextData::new(Trace::default());
  let err = p.run(ctx.clone()).await.unwrap_err();

  assert!(matches!(err, TestError::Handler("boom")));
  assert_eq!(ctx.read().steps, vec!["ok"]);
}

#[tokio::test]
#[serial]
async fn step_without_handler_is_reported() {
  setup_tracing();
  let mut p = Pipeline::<Trace, TestError>::new("incomplete", &["wired", "unwired"]);
  p.on_root("wired", record("wired"));

  let err = p.run(ContextData::new(Trace::default())).await.unwrap_err();

  match err {
    TestError::Pipeline(PipelineError::HandlerMissing { pipeline, step_name }) => {
      assert_eq!(pipeline, "incomplete");
      assert_eq!(step_name, "unwired");
    }
    other => panic!("expected HandlerMissing, got {:?}", other),
  }
}

#[test]
#[should_panic(expected = "not declared")]
fn registering_on_undeclared_step_panics() {
  let mut p = Pipeline::<Trace, TestError>::new("typo", &["real"]);
  p.on_root("reel", record("reel"));
}

#[test]
fn exposes_declared_steps() {
  let p = Pipeline::<Trace, TestError>::new("listing", &["a", "b"]);
  assert_eq!(p.name(), "listing");
  assert_eq!(p.step_names().collect::<Vec<_>>(), vec!["a", "b"]);
}
