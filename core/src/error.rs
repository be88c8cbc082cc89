// crawlflow/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
  /// The pipeline definition is invalid. Always raised while compiling,
  /// before any node has run.
  #[error("Configuration error at {location}: {message}")]
  Configuration { location: String, message: String },

  #[error("Node '{node}' failed. Source: {source}")]
  Node {
    node: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Error in user-provided node logic. Source: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },

  #[error("Node '{node}' requires field '{field}' which the record does not carry")]
  MissingField { node: String, field: String },

  #[error("No case of switch '{node}' matched value {value}")]
  NoCaseMatched { node: String, value: String },

  #[error("Looping scope {location} exceeded {limit} passes for a single input record")]
  LoopLimitExceeded { location: String, limit: usize },

  #[error("No pipeline registered under name '{name}'")]
  PipelineNotFound { name: String },
}

impl FlowError {
  pub(crate) fn configuration(location: impl Into<String>, message: impl Into<String>) -> Self {
    FlowError::Configuration {
      location: location.into(),
      message: message.into(),
    }
  }

  /// True when the error describes an invalid pipeline definition rather
  /// than a failure while nodes were running.
  pub fn is_configuration(&self) -> bool {
    matches!(self, FlowError::Configuration { .. })
  }
}

impl From<AnyhowError> for FlowError {
  fn from(err: AnyhowError) -> Self {
    // A FlowError that travelled through user code as anyhow is unwrapped
    // back into itself instead of being nested under Handler.
    match err.downcast::<FlowError>() {
      Ok(flow_err) => flow_err,
      Err(source) => FlowError::Handler { source },
    }
  }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
