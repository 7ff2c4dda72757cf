// tests/context_management_tests.rs
mod common;

use common::*;
use orderflow::{ContextData, FlowError, Pipeline, PipelineControl};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_context_data_is_shared_and_modified() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("step1_modify", false, None), ("step2_read_modify", false, None)]);

  pipeline.on("step1_modify", |ctx: ContextData<TestContext>| async move {
    let mut guard = ctx.write();
    guard.counter = 10;
    guard.message = "SetByStep1".to_string();
    Ok::<_, FlowError>(PipelineControl::Continue)
  });

  pipeline.on("step2_read_modify", |ctx: ContextData<TestContext>| async move {
    let mut guard = ctx.write();
    assert_eq!(guard.counter, 10);
    assert_eq!(guard.message, "SetByStep1");
    guard.counter += 5;
    guard.message.push_str("_ThenStep2");
    Ok::<_, FlowError>(PipelineControl::Continue)
  });

  let initial_ctx = ContextData::new(TestContext::default());
  pipeline.run(initial_ctx.clone()).await.unwrap();

  let final_guard = initial_ctx.read();
  assert_eq!(final_guard.counter, 15);
  assert_eq!(final_guard.message, "SetByStep1_ThenStep2");
}

#[tokio::test]
#[serial]
async fn test_context_data_clone_shares_data() {
  setup_tracing();
  let original_ctx = ContextData::new(TestContext {
    counter: 1,
    ..Default::default()
  });
  let cloned_ctx = original_ctx.clone();
  assert_eq!(original_ctx.handle_count(), 2);

  original_ctx.write().counter = 5;
  assert_eq!(cloned_ctx.read().counter, 5);

  cloned_ctx.write().counter = 10;
  assert_eq!(original_ctx.read().counter, 10);
  assert_eq!(*original_ctx.map_read(|c| &c.counter), 10);
}

#[tokio::test]
#[serial]
async fn test_try_write_fails_while_read_guard_is_held() {
  let ctx = ContextData::new(TestContext::default());
  let guard = ctx.read();
  assert!(ctx.try_write().is_none());
  assert!(ctx.try_read().is_some());
  drop(guard);
  assert!(ctx.try_write().is_some());
}

#[tokio::test]
#[serial]
async fn test_context_data_locks_with_await() {
  setup_tracing();
  let ctx = ContextData::new(TestContext::default());

  let handler_logic = async {
    let initial_count = ctx.read().counter;

    tokio::time::sleep(std::time::Duration::from_millis(1)).await;

    ctx.write().counter = initial_count + 1;
  };

  handler_logic.await;
  assert_eq!(ctx.read().counter, 1);
}

#[tokio::test]
#[serial]
async fn test_extract_and_update_release_their_guards() {
  setup_tracing();
  let ctx = ContextData::new(TestContext::default());

  let previous = ctx.update(|c| {
    c.counter = 7;
    std::mem::replace(&mut c.message, "updated".to_string())
  });
  assert!(previous.is_empty());

  let (counter, message) = ctx.extract(|c| (c.counter, c.message.clone()));
  assert_eq!((counter, message.as_str()), (7, "updated"));
  assert!(ctx.try_write().is_some());
}
