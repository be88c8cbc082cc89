// crawlflow/examples/error_handling.rs

use crawlflow::nodes::{xrange_node, Sink};
use crawlflow::{func_node, run_pipeline, FlowError, Pipeline, Record};
use serde_json::json;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
enum FetchError {
  #[error("server answered {status} for page {page}")]
  BadStatus { page: u64, status: u16 },
}

fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Error Handling Example ---");

  // 1. Configuration errors surface before anything runs.
  let sink = Sink::new();
  let misconfigured = Pipeline::new()
    .node(xrange_node(3, "page"))
    .node(sink.clone())
    .nest(Pipeline::new().element(json!({"output": "outputs", "retries": 3})));
  match run_pipeline(&misconfigured, None) {
    Err(e) if e.is_configuration() => info!("Rejected at compile time: {}", e),
    other => error!("Expected a configuration error, got {:?}", other),
  }
  assert!(sink.is_empty());

  // 2. Node errors end the run and keep their original cause.
  let fetch = func_node("fetch", |record: &Record| {
    let page = record.get("page").and_then(|v| v.as_u64()).unwrap_or_default();
    if page == 2 {
      return Err(FetchError::BadStatus { page, status: 503 }.into());
    }
    Ok(Some(record.with("status", 200)))
  });
  let pipeline = Pipeline::new().node(xrange_node(5, "page")).node(fetch).node(sink.clone());

  match run_pipeline(&pipeline, None) {
    Err(FlowError::Node { node, source }) => {
      let cause = source.downcast_ref::<FetchError>();
      info!("Node '{}' failed: {} (typed cause: {:?})", node, source, cause);
      assert!(cause.is_some());
    }
    other => error!("Expected a node error, got {:?}", other),
  }

  // Pages 0 and 1 made it through before the failure.
  assert_eq!(sink.len(), 2);
}
