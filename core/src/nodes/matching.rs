// crawlflow/src/nodes/matching.rs

//! Field matching shared by the conditional nodes and the switch.

use crate::core::record::{value_text, Record};
use crate::error::{FlowError, FlowResult};
use regex::Regex;
use serde_json::Value;

/// How a single field value is tested.
#[derive(Debug, Clone)]
pub enum Pattern {
  Exact(Value),
  /// Matched against the start of the value's text rendition.
  Regex(Regex),
}

impl Pattern {
  /// Compiles `pattern` so that it must match at the start of the text.
  pub fn regex(pattern: &str) -> FlowResult<Self> {
    Regex::new(&format!("^(?:{})", pattern))
      .map(Pattern::Regex)
      .map_err(|e| FlowError::configuration("pattern", format!("invalid regex '{}': {}", pattern, e)))
  }

  pub fn matches(&self, value: &Value) -> bool {
    match self {
      Pattern::Exact(expected) => expected == value,
      Pattern::Regex(re) => re.is_match(&value_text(value)),
    }
  }
}

/// Matches a record when *every* listed field is present and matches.
/// A negated matcher inverts the final verdict.
#[derive(Debug, Clone, Default)]
pub struct FieldMatcher {
  fields: Vec<(String, Pattern)>,
  negate: bool,
}

impl FieldMatcher {
  pub fn exact<I, K, V>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
  {
    Self {
      fields: pairs
        .into_iter()
        .map(|(k, v)| (k.into(), Pattern::Exact(v.into())))
        .collect(),
      negate: false,
    }
  }

  pub fn regex<I, K, P>(pairs: I) -> FlowResult<Self>
  where
    I: IntoIterator<Item = (K, P)>,
    K: Into<String>,
    P: AsRef<str>,
  {
    let fields = pairs
      .into_iter()
      .map(|(k, p)| Ok((k.into(), Pattern::regex(p.as_ref())?)))
      .collect::<FlowResult<Vec<_>>>()?;
    Ok(Self { fields, negate: false })
  }

  pub fn negate(mut self) -> Self {
    self.negate = !self.negate;
    self
  }

  pub fn matches(&self, record: &Record) -> bool {
    let all = self
      .fields
      .iter()
      .all(|(field, pattern)| record.get(field).is_some_and(|value| pattern.matches(value)));
    all != self.negate
  }
}

impl From<Record> for FieldMatcher {
  fn from(record: Record) -> Self {
    FieldMatcher::exact(record.iter().map(|(k, v)| (k.to_string(), v.clone())))
  }
}
