// crawlflow/src/conditional/switch.rs

//! Implements the `Switch` node and its fluent builder (`SwitchBuilder`,
//! `SwitchCaseConfigurator`): each record is routed into one of several
//! sub-pipelines, chosen by the value of one of its fields.

use crate::core::context::RunContext;
use crate::core::node::{Node, NodeStream};
use crate::core::record::{value_text, Record};
use crate::core::stream;
use crate::error::{FlowError, FlowResult};
use crate::nodes::matching::Pattern;
use crate::pipeline::compile::Compiler;
use crate::pipeline::definition::Pipeline;
use crate::pipeline::execution::Scope;
use serde_json::Value;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// What the switch does with a record it cannot route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchFallback {
  /// Fail the run with `MissingField` / `NoCaseMatched`.
  #[default]
  Fail,
  /// Drop the record.
  Skip,
  /// Raise the stop signal.
  Stop,
}

type CasePredicate = Arc<dyn Fn(&Value, &Record) -> bool + Send + Sync + 'static>;

enum CaseCondition {
  Pattern(Pattern),
  Predicate(CasePredicate),
}

struct SwitchCase {
  condition: CaseCondition,
  scope: Scope,
}

impl SwitchCase {
  fn matches(&self, value: &Value, record: &Record) -> bool {
    match &self.condition {
      CaseCondition::Pattern(pattern) => pattern.matches(value),
      CaseCondition::Predicate(predicate) => predicate(value, record),
    }
  }
}

/// Routes each record to the first case whose condition holds for the
/// record's `field`, falling back to the default case if there is one.
///
/// Case pipelines are ordinary scopes: without scope options they run for
/// their side effects and forward the routed record unchanged.
pub struct Switch {
  name: String,
  field: String,
  cases: Vec<SwitchCase>,
  default: Option<Scope>,
  on_missing: SwitchFallback,
  on_no_match: SwitchFallback,
}

impl Switch {
  pub fn on_field(field: impl Into<String>) -> SwitchBuilder {
    SwitchBuilder::new(field)
  }

  fn fall_back(&self, behavior: SwitchFallback, error: impl FnOnce() -> FlowError) -> FlowResult<NodeStream> {
    match behavior {
      SwitchFallback::Fail => Err(error()),
      SwitchFallback::Skip => Ok(stream::empty()),
      SwitchFallback::Stop => Ok(stream::stop()),
    }
  }
}

impl Node for Switch {
  fn name(&self) -> &str {
    &self.name
  }

  fn run(&self, input: Record, ctx: &RunContext) -> FlowResult<NodeStream> {
    let Some(value) = input.get(&self.field) else {
      event!(Level::DEBUG, switch = %self.name, "Record lacks the switch field.");
      return self.fall_back(self.on_missing, || FlowError::MissingField {
        node: self.name.clone(),
        field: self.field.clone(),
      });
    };

    if let Some((idx, case)) = self.cases.iter().enumerate().find(|(_, c)| c.matches(value, &input)) {
      event!(Level::TRACE, switch = %self.name, case_index = idx, "Case matched.");
      return case.scope.run(input, ctx);
    }
    if let Some(default) = &self.default {
      event!(Level::TRACE, switch = %self.name, "Routing to default case.");
      return default.run(input, ctx);
    }

    let rendered = value_text(value);
    self.fall_back(self.on_no_match, || FlowError::NoCaseMatched {
      node: self.name.clone(),
      value: rendered,
    })
  }

  fn reset(&self) {
    for case in &self.cases {
      case.scope.reset();
    }
    if let Some(default) = &self.default {
      default.reset();
    }
  }
}

/// Builder for a `Switch`. Cases are added with [`add_case`](Self::add_case)
/// and completed with one of the `when_*` methods of the returned configurator.
pub struct SwitchBuilder {
  field: String,
  cases: Vec<(CaseCondition, Pipeline)>,
  default: Option<Pipeline>,
  on_missing: SwitchFallback,
  on_no_match: SwitchFallback,
}

impl SwitchBuilder {
  pub fn new(field: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      cases: Vec::new(),
      default: None,
      on_missing: SwitchFallback::Fail,
      on_no_match: SwitchFallback::Fail,
    }
  }

  pub fn add_case(self, pipeline: Pipeline) -> SwitchCaseConfigurator {
    SwitchCaseConfigurator { builder: self, pipeline }
  }

  /// Pipeline for records no case matched.
  pub fn otherwise(mut self, pipeline: Pipeline) -> Self {
    self.default = Some(pipeline);
    self
  }

  pub fn if_field_missing(mut self, behavior: SwitchFallback) -> Self {
    self.on_missing = behavior;
    self
  }

  /// Only consulted when there is no default case.
  pub fn if_no_case_matches(mut self, behavior: SwitchFallback) -> Self {
    self.on_no_match = behavior;
    self
  }

  /// Compiles every case pipeline up front, so a bad case definition is a
  /// configuration error before anything runs.
  #[instrument(name = "SwitchBuilder::build", skip_all, fields(field = %self.field, num_cases = self.cases.len()), err(Display))]
  pub fn build(self) -> FlowResult<Switch> {
    let compiler = Compiler::new();
    let name = format!("switch({})", self.field);
    let cases = self
      .cases
      .into_iter()
      .enumerate()
      .map(|(idx, (condition, pipeline))| {
        let scope = compiler.compile_at(&pipeline, format!("{}[case {}]", name, idx))?;
        Ok(SwitchCase { condition, scope })
      })
      .collect::<FlowResult<Vec<_>>>()?;
    let default = self
      .default
      .map(|pipeline| compiler.compile_at(&pipeline, format!("{}[default]", name)))
      .transpose()?;

    event!(Level::DEBUG, switch = %name, "Switch built.");
    Ok(Switch {
      name,
      field: self.field,
      cases,
      default,
      on_missing: self.on_missing,
      on_no_match: self.on_no_match,
    })
  }
}

/// Intermediate builder holding a case pipeline until its condition is set.
pub struct SwitchCaseConfigurator {
  builder: SwitchBuilder,
  pipeline: Pipeline,
}

impl SwitchCaseConfigurator {
  fn finish(mut self, condition: CaseCondition) -> SwitchBuilder {
    self.builder.cases.push((condition, self.pipeline));
    self.builder
  }

  pub fn when_equals(self, value: impl Into<Value>) -> SwitchBuilder {
    self.finish(CaseCondition::Pattern(Pattern::Exact(value.into())))
  }

  /// Case applies when the field's text starts with a match of `pattern`.
  pub fn when_matches(self, pattern: &str) -> FlowResult<SwitchBuilder> {
    let pattern = Pattern::regex(pattern)?;
    Ok(self.finish(CaseCondition::Pattern(pattern)))
  }

  /// Case applies when `predicate(field_value, record)` holds.
  pub fn on_condition(self, predicate: impl Fn(&Value, &Record) -> bool + Send + Sync + 'static) -> SwitchBuilder {
    self.finish(CaseCondition::Predicate(Arc::new(predicate)))
  }
}
