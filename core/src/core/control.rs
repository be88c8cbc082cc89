// crawlflow/src/core/control.rs

//! Defines the signal returned by every pull on a node stream and the outcome of a pipeline run.

use crate::core::record::Record;

/// Result of asking a stream for its next record.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineControl {
  /// The stream produced a record.
  Continue(Record),
  /// The stream has no more records. Only the local stream is finished.
  Exhausted,
  /// A node requested that the *entire* run finish now.
  /// Every enclosing scope re-propagates this without consuming it; only the
  /// runner turns it into a normal return.
  Stop,
}

impl PipelineControl {
  pub fn is_stop(&self) -> bool {
    matches!(self, PipelineControl::Stop)
  }
}

/// Outcome of a full pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every stream in the compiled pipeline was driven to exhaustion.
  Completed,
  /// A node raised the stop signal.
  Stopped,
}
