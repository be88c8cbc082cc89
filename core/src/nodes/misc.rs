// crawlflow/src/nodes/misc.rs

//! Small general-purpose nodes: sources, field editing and flow control.

use crate::core::context::RunContext;
use crate::core::node::{Node, NodeStream};
use crate::core::record::Record;
use crate::core::stream;
use crate::error::{FlowError, FlowResult};
use crate::nodes::matching::FieldMatcher;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{event, Level};

fn placeholder_regex() -> &'static Regex {
  static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
  PLACEHOLDER.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid"))
}

/// Source node: extends its input with `field = 0, 1, .., count - 1`.
#[derive(Debug, Clone)]
pub struct XRange {
  count: u64,
  field: String,
}

impl XRange {
  pub fn new(count: u64, field: impl Into<String>) -> Self {
    Self {
      count,
      field: field.into(),
    }
  }
}

impl Node for XRange {
  fn name(&self) -> &str {
    "xrange"
  }

  fn run(&self, input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    let field = self.field.clone();
    Ok(stream::from_iter((0..self.count).map(move |i| input.with(field.clone(), i))))
  }
}

pub fn xrange_node(count: u64, field: impl Into<String>) -> XRange {
  XRange::new(count, field)
}

/// Raises the stop signal on the first matching record; forwards the rest.
#[derive(Debug, Clone)]
pub struct InterruptIf {
  matcher: FieldMatcher,
}

impl InterruptIf {
  pub fn new(matcher: impl Into<FieldMatcher>) -> Self {
    Self { matcher: matcher.into() }
  }
}

impl Node for InterruptIf {
  fn name(&self) -> &str {
    "interrupt_if"
  }

  fn run(&self, input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    if self.matcher.matches(&input) {
      event!(Level::DEBUG, record = %input, "Record matched, finishing pipeline.");
      Ok(stream::stop())
    } else {
      Ok(stream::once(input))
    }
  }
}

pub fn interrupt_if(matcher: impl Into<FieldMatcher>) -> InterruptIf {
  InterruptIf::new(matcher)
}

/// Forwards only records that match.
#[derive(Debug, Clone)]
pub struct ContinueIf {
  matcher: FieldMatcher,
}

impl ContinueIf {
  pub fn new(matcher: impl Into<FieldMatcher>) -> Self {
    Self { matcher: matcher.into() }
  }
}

impl Node for ContinueIf {
  fn name(&self) -> &str {
    "continue_if"
  }

  fn run(&self, input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    if self.matcher.matches(&input) {
      Ok(stream::once(input))
    } else {
      Ok(stream::empty())
    }
  }
}

pub fn continue_if(matcher: impl Into<FieldMatcher>) -> ContinueIf {
  ContinueIf::new(matcher)
}

/// Extends every record with fixed fields.
///
/// With interpolation on, `{name}` inside string values is replaced by the
/// incoming record's `name` field.
#[derive(Debug, Clone)]
pub struct Assign {
  fields: Vec<(String, Value)>,
  interpolate: bool,
}

impl Assign {
  pub fn new<I, K, V>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
  {
    Self {
      fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
      interpolate: false,
    }
  }

  pub fn interpolate(mut self, interpolate: bool) -> Self {
    self.interpolate = interpolate;
    self
  }

  fn render(&self, template: &str, record: &Record) -> FlowResult<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;
    for caps in placeholder_regex().captures_iter(template) {
      let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
        continue;
      };
      let value = record.text(name.as_str()).ok_or_else(|| FlowError::MissingField {
        node: self.name().to_string(),
        field: name.as_str().to_string(),
      })?;
      rendered.push_str(&template[last..whole.start()]);
      rendered.push_str(&value);
      last = whole.end();
    }
    rendered.push_str(&template[last..]);
    Ok(rendered)
  }
}

impl Node for Assign {
  fn name(&self) -> &str {
    "assign"
  }

  fn run(&self, input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    let mut values = Vec::with_capacity(self.fields.len());
    for (field, value) in &self.fields {
      let value = match value {
        Value::String(template) if self.interpolate => Value::String(self.render(template, &input)?),
        other => other.clone(),
      };
      values.push((field.clone(), value));
    }
    Ok(stream::once(input.updated(values)))
  }
}

pub fn assign<I, K, V>(pairs: I) -> Assign
where
  I: IntoIterator<Item = (K, V)>,
  K: Into<String>,
  V: Into<Value>,
{
  Assign::new(pairs)
}

/// Moves field values to new names. Fields the record lacks are skipped.
#[derive(Debug, Clone)]
pub struct Rename {
  mapping: Vec<(String, String)>,
}

impl Rename {
  pub fn new<I, K, V>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    Self {
      mapping: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}

impl Node for Rename {
  fn name(&self) -> &str {
    "rename"
  }

  fn run(&self, input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    let renamed = input.edit(|map| {
      for (from, to) in &self.mapping {
        if let Some(value) = map.shift_remove(from) {
          map.insert(to.clone(), value);
        }
      }
    });
    Ok(stream::once(renamed))
  }
}

pub fn rename<I, K, V>(pairs: I) -> Rename
where
  I: IntoIterator<Item = (K, V)>,
  K: Into<String>,
  V: Into<String>,
{
  Rename::new(pairs)
}

/// Pass-through that logs each record at DEBUG level.
#[derive(Debug, Clone)]
pub struct LogRecords {
  label: String,
}

impl LogRecords {
  pub fn new(label: impl Into<String>) -> Self {
    Self { label: label.into() }
  }
}

impl Node for LogRecords {
  fn name(&self) -> &str {
    &self.label
  }

  fn run(&self, input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    event!(Level::DEBUG, label = %self.label, record = %input, "Record passing.");
    Ok(stream::once(input))
  }
}
