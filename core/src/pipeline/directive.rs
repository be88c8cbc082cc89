// crawlflow/src/pipeline/directive.rs

//! Scope options: the compile-time configuration attached to a (sub-)pipeline.
//!
//! In a definition the options appear as the leading element of a pipeline,
//! either typed (`ScopeOptions`) or as a raw JSON mapping such as
//! `{"loop": true, "output": "outputs"}`. The compiler validates the raw form
//! eagerly and erases it; at runtime only the wrapper it configures remains.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which records escape a scope to its enclosing scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
  /// Drive the scope fully but forward only the upstream record, once.
  #[default]
  None,
  /// Forward every record produced inside the scope, in order.
  /// A scope without nodes produces its input once, so that is forwarded.
  Outputs,
  /// Forward only the last record produced inside the scope, if any.
  LastOutput,
  /// Forward the upstream record first, then every record produced inside.
  #[serde(rename = "input+outputs")]
  InputAndOutputs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeOptions {
  /// Feed every output of a pass back in as the input of another pass,
  /// until a pass produces nothing.
  #[serde(default, rename = "loop")]
  pub looping: bool,
  #[serde(default)]
  pub output: OutputMode,
}

impl ScopeOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn outputs() -> Self {
    Self::new().with_output(OutputMode::Outputs)
  }

  pub fn last_output() -> Self {
    Self::new().with_output(OutputMode::LastOutput)
  }

  pub fn with_output(mut self, output: OutputMode) -> Self {
    self.output = output;
    self
  }

  pub fn with_loop(mut self, looping: bool) -> Self {
    self.looping = looping;
    self
  }

  /// Parses the raw mapping form. Unknown keys and ill-typed values are rejected.
  pub fn from_mapping(mapping: &Value) -> Result<Self, serde_json::Error> {
    ScopeOptions::deserialize(mapping)
  }
}
