// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use crawlflow::{stream, FlowError, FlowResult, Node, NodeStream, PipelineControl, Record, RunContext};
use serde_json::Value;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Record helpers ---

/// Builds a record from a `json!({...})` object literal.
pub fn rec(value: Value) -> Record {
  Record::from_json(value).expect("test record must be a JSON object")
}

/// Builds a list of records from a `json!([{...}, ...])` array literal.
pub fn recs(value: Value) -> Vec<Record> {
  match value {
    Value::Array(items) => items.into_iter().map(rec).collect(),
    other => panic!("expected a JSON array, got {}", other),
  }
}

pub fn all_pairs() -> Vec<Record> {
  recs(serde_json::json!([
    {"out1": 0, "out2": 0}, {"out1": 0, "out2": 1}, {"out1": 0, "out2": 2},
    {"out1": 1, "out2": 0}, {"out1": 1, "out2": 1}, {"out1": 1, "out2": 2},
  ]))
}

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Test node failed: {0}")]
  Node(String),
}

// --- Common Node Creators ---

/// Increments `x` while it is below `limit`; otherwise produces nothing.
pub struct IncrementBelow {
  pub limit: i64,
}

impl Node for IncrementBelow {
  fn name(&self) -> &str {
    "increment_below"
  }

  fn run(&self, input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    let x = input.get("x").and_then(Value::as_i64).unwrap_or_default();
    if x < self.limit {
      Ok(stream::once(input.with("x", x + 1)))
    } else {
      Ok(stream::empty())
    }
  }
}

/// Fails on the first pull with `TestError::Node(message)`.
pub struct FailingNode {
  pub message: &'static str,
}

impl Node for FailingNode {
  fn name(&self) -> &str {
    "failing"
  }

  fn run(&self, _input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    let message = self.message;
    Ok(stream::from_fn(move || {
      tracing::warn!(target: "test_nodes", "failing with: '{}'", message);
      Err(FlowError::Handler {
        source: TestError::Node(message.to_string()).into(),
      })
    }))
  }
}

/// An infinite source counting pulls into a shared counter.
pub struct CountingSource {
  pub field: &'static str,
  pub pulls: Arc<AtomicUsize>,
}

impl Node for CountingSource {
  fn name(&self) -> &str {
    "counting_source"
  }

  fn run(&self, input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    let field = self.field;
    let pulls = Arc::clone(&self.pulls);
    let mut next = 0u64;
    Ok(stream::from_fn(move || {
      pulls.fetch_add(1, Ordering::SeqCst);
      let record = input.with(field, next);
      next += 1;
      Ok(PipelineControl::Continue(record))
    }))
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counters for checking execution counts ---
pub static FACTORY_BUILD_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  FACTORY_BUILD_COUNTER.store(0, Ordering::SeqCst);
}
