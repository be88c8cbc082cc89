// crawlflow/src/core/context.rs

//! Defines `RunContext`, the per-run settings every node receives alongside
//! its input record.
//!
//! Compiled scopes are shared between runs (a `Switch` compiles its cases
//! once, at build time), so anything that depends on how a run was started
//! travels with the run rather than with the compiled tree.

/// Settings of the run a node is executing in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunContext {
  max_loop_passes: Option<usize>,
}

impl RunContext {
  pub fn new() -> Self {
    Self::default()
  }

  /// Caps the passes any looping scope may make per upstream record.
  pub fn with_max_loop_passes(mut self, limit: Option<usize>) -> Self {
    self.max_loop_passes = limit;
    self
  }

  pub fn max_loop_passes(&self) -> Option<usize> {
    self.max_loop_passes
  }
}
