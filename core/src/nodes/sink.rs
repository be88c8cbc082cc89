// crawlflow/src/nodes/sink.rs

//! A collecting node: stores every record reaching it and forwards it unchanged.

use crate::core::context::RunContext;
use crate::core::node::{Node, NodeStream};
use crate::core::record::Record;
use crate::core::stream;
use crate::error::FlowResult;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Clones share one buffer, so a sink can be placed in a pipeline and
/// inspected afterwards through another handle.
#[derive(Debug, Clone, Default)]
pub struct Sink {
  keys: Option<Arc<[String]>>,
  data: Arc<Mutex<Vec<Record>>>,
}

impl Sink {
  pub fn new() -> Self {
    Self::default()
  }

  /// Only the listed fields of each record are stored (the full record is
  /// still forwarded).
  pub fn with_keys<I, K>(keys: I) -> Self
  where
    I: IntoIterator<Item = K>,
    K: Into<String>,
  {
    Self {
      keys: Some(keys.into_iter().map(Into::into).collect()),
      data: Arc::default(),
    }
  }

  /// A snapshot of everything collected so far.
  pub fn data(&self) -> Vec<Record> {
    self.data.lock().clone()
  }

  pub fn len(&self) -> usize {
    self.data.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.lock().is_empty()
  }

  /// For every stored record, the values of `fields` in order. A field the
  /// record lacks yields `Value::Null`.
  pub fn get_values(&self, fields: &[&str]) -> Vec<Vec<Value>> {
    self
      .data
      .lock()
      .iter()
      .map(|record| {
        fields
          .iter()
          .map(|field| record.get(field).cloned().unwrap_or(Value::Null))
          .collect()
      })
      .collect()
  }

  pub fn clean(&self) {
    self.data.lock().clear();
  }
}

impl Node for Sink {
  fn name(&self) -> &str {
    "sink"
  }

  fn run(&self, input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    let stored = match &self.keys {
      Some(keys) => Record::from_pairs(
        keys
          .iter()
          .filter_map(|k| input.get(k).map(|v| (k.clone(), v.clone()))),
      ),
      None => input.clone(),
    };
    self.data.lock().push(stored);
    Ok(stream::once(input))
  }

  fn reset(&self) {
    self.clean();
  }
}
