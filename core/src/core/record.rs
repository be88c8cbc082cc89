// crawlflow/src/core/record.rs

//! The `Record` flowing between nodes: an ordered mapping of field names to
//! JSON values.
//!
//! A `Record` is cheap to clone (the map is behind an `Arc`) and is never
//! mutated once it has been handed downstream. Every editing operation returns
//! a *new* `Record`, so sibling branches of a tree pipeline each observe their
//! own independent copy.

use crate::error::{FlowError, FlowResult};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Default, PartialEq)]
pub struct Record(Arc<Map<String, Value>>);

impl Record {
  /// An empty record, the default input of a pipeline run.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_pairs<I, K, V>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
  {
    let map = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    Record(Arc::new(map))
  }

  /// Builds a record from a JSON object. Any other JSON value is rejected.
  pub fn from_json(value: Value) -> FlowResult<Self> {
    match value {
      Value::Object(map) => Ok(Record(Arc::new(map))),
      other => Err(FlowError::configuration(
        "record",
        format!("expected a JSON object, got {}", other),
      )),
    }
  }

  pub fn get(&self, field: &str) -> Option<&Value> {
    self.0.get(field)
  }

  pub fn contains_key(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn as_map(&self) -> &Map<String, Value> {
    &self.0
  }

  pub fn to_json(&self) -> Value {
    Value::Object((*self.0).clone())
  }

  /// Returns a copy of this record with `f` applied to the copy's map.
  /// `self` is left untouched.
  pub fn edit(&self, f: impl FnOnce(&mut Map<String, Value>)) -> Record {
    let mut next = self.clone();
    f(Arc::make_mut(&mut next.0));
    next
  }

  /// Returns a copy of this record extended (or overridden) by `pairs`.
  pub fn updated<I, K, V>(&self, pairs: I) -> Record
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
  {
    self.edit(|map| {
      for (k, v) in pairs {
        map.insert(k.into(), v.into());
      }
    })
  }

  /// Returns a copy of this record with a single field set.
  pub fn with(&self, field: impl Into<String>, value: impl Into<Value>) -> Record {
    self.updated([(field.into(), value.into())])
  }

  /// Returns a copy of this record without `field`.
  pub fn without(&self, field: &str) -> Record {
    if !self.contains_key(field) {
      return self.clone();
    }
    self.edit(|map| {
      map.shift_remove(field);
    })
  }

  /// Renders a field as text: strings verbatim, other values as JSON.
  pub fn text(&self, field: &str) -> Option<String> {
    self.get(field).map(value_text)
  }
}

pub(crate) fn value_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

impl fmt::Debug for Record {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.0.iter()).finish()
  }
}

impl fmt::Display for Record {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", Value::Object((*self.0).clone()))
  }
}

impl From<Map<String, Value>> for Record {
  fn from(map: Map<String, Value>) -> Self {
    Record(Arc::new(map))
  }
}

impl TryFrom<Value> for Record {
  type Error = FlowError;

  fn try_from(value: Value) -> FlowResult<Self> {
    Record::from_json(value)
  }
}
