// crawlflow/src/nodes/substitute.rs

//! Regex substitutions applied to string fields.

use crate::core::context::RunContext;
use crate::core::node::{Node, NodeStream};
use crate::core::record::Record;
use crate::core::stream;
use crate::error::{FlowError, FlowResult};
use regex::Regex;
use serde_json::Value;

#[derive(Debug, Clone)]
struct Rule {
  field: String,
  pattern: Regex,
  replacement: String,
}

/// Rewrites string fields with `regex::Regex::replace_all`, rules applied in
/// the order they were added. Missing or non-string fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct Substitute {
  rules: Vec<Rule>,
}

impl Substitute {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a rule. `replacement` may refer to capture groups (`$1`, `${name}`).
  pub fn rule(mut self, field: impl Into<String>, pattern: &str, replacement: impl Into<String>) -> FlowResult<Self> {
    let field = field.into();
    let pattern = Regex::new(pattern).map_err(|e| {
      FlowError::configuration(
        format!("substitute[{}]", field),
        format!("invalid regex '{}': {}", pattern, e),
      )
    })?;
    self.rules.push(Rule {
      field,
      pattern,
      replacement: replacement.into(),
    });
    Ok(self)
  }
}

impl Node for Substitute {
  fn name(&self) -> &str {
    "substitute"
  }

  fn run(&self, input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    let output = input.edit(|map| {
      for rule in &self.rules {
        if let Some(Value::String(text)) = map.get_mut(&rule.field) {
          let replaced = rule.pattern.replace_all(text.as_str(), rule.replacement.as_str()).into_owned();
          *text = replaced;
        }
      }
    });
    Ok(stream::once(output))
  }
}
