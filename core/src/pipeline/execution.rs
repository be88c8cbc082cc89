// crawlflow/src/pipeline/execution.rs

//! The runtime half of a compiled pipeline: the depth-first sequence drive,
//! the loop drive, and the output-scoping wrapper.
//!
//! Everything here is pull-based. A stream only does work when its consumer
//! asks for the next record, and the stop signal is returned as a value from
//! every pull so each level re-propagates it explicitly.

use crate::core::context::RunContext;
use crate::core::control::PipelineControl;
use crate::core::node::{Node, NodeRef, NodeStream, RecordStream};
use crate::core::record::Record;
use crate::error::{FlowError, FlowResult};
use crate::pipeline::directive::{OutputMode, ScopeOptions};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{event, Level};

/// An ordered run of nodes, shared between every stream driving it.
#[derive(Clone)]
pub(crate) struct Sequence {
  nodes: Arc<[NodeRef]>,
}

impl Sequence {
  pub(crate) fn new(nodes: Vec<NodeRef>) -> Self {
    Self { nodes: nodes.into() }
  }

  pub(crate) fn nodes(&self) -> &[NodeRef] {
    &self.nodes
  }

  fn stream(&self, input: Record, ctx: RunContext) -> SequenceStream {
    SequenceStream {
      nodes: Arc::clone(&self.nodes),
      ctx,
      input: Some(input),
      stack: Vec::with_capacity(self.nodes.len()),
      finished: false,
    }
  }
}

/// Cartesian expansion of a node sequence for one input record.
///
/// `stack[i]` is the active stream of node `i`. A record coming out of the
/// top stream is either fed into the next node (pushing its stream) or, at
/// full depth, returned to the consumer. The last node therefore varies
/// fastest, exactly like nested loops.
struct SequenceStream {
  nodes: Arc<[NodeRef]>,
  ctx: RunContext,
  input: Option<Record>,
  stack: Vec<NodeStream>,
  finished: bool,
}

impl RecordStream for SequenceStream {
  fn next_record(&mut self) -> FlowResult<PipelineControl> {
    if self.finished {
      return Ok(PipelineControl::Exhausted);
    }

    if let Some(input) = self.input.take() {
      let Some(first) = self.nodes.first() else {
        // Empty product: the input passes through once.
        self.finished = true;
        return Ok(PipelineControl::Continue(input));
      };
      self.stack.push(first.run(input, &self.ctx)?);
    }

    loop {
      let depth = self.stack.len();
      let Some(top) = self.stack.last_mut() else {
        self.finished = true;
        return Ok(PipelineControl::Exhausted);
      };

      match top.next_record()? {
        PipelineControl::Continue(record) => {
          if depth == self.nodes.len() {
            return Ok(PipelineControl::Continue(record));
          }
          let next_node = &self.nodes[depth];
          event!(Level::TRACE, node = next_node.name(), depth, "Feeding record downstream.");
          let next_stream = next_node.run(record, &self.ctx)?;
          self.stack.push(next_stream);
        }
        PipelineControl::Exhausted => {
          self.stack.pop();
        }
        PipelineControl::Stop => {
          self.finished = true;
          self.stack.clear();
          return Ok(PipelineControl::Stop);
        }
      }
    }
  }
}

/// Drives a sequence once, or, for a looping scope, re-feeds every produced
/// record as the input of a further pass until passes stop producing.
///
/// Pending inputs are processed first-in first-out.
pub(crate) struct DriveStream {
  body: Sequence,
  looping: bool,
  pending: VecDeque<Record>,
  current: Option<SequenceStream>,
  passes: usize,
  max_passes: Option<usize>,
  ctx: RunContext,
  location: Arc<str>,
}

impl RecordStream for DriveStream {
  fn next_record(&mut self) -> FlowResult<PipelineControl> {
    loop {
      if let Some(current) = self.current.as_mut() {
        match current.next_record()? {
          PipelineControl::Continue(record) => {
            if self.looping {
              self.pending.push_back(record.clone());
            }
            return Ok(PipelineControl::Continue(record));
          }
          PipelineControl::Stop => {
            self.current = None;
            self.pending.clear();
            return Ok(PipelineControl::Stop);
          }
          PipelineControl::Exhausted => self.current = None,
        }
      }

      let Some(input) = self.pending.pop_front() else {
        return Ok(PipelineControl::Exhausted);
      };
      if let Some(limit) = self.max_passes {
        if self.passes >= limit {
          return Err(FlowError::LoopLimitExceeded {
            location: self.location.to_string(),
            limit,
          });
        }
      }
      self.passes += 1;
      if self.looping {
        event!(Level::TRACE, location = %self.location, pass = self.passes, "Starting loop pass.");
      }
      self.current = Some(self.body.stream(input, self.ctx));
    }
  }
}

/// Applies a scope's output mode to its drive.
struct ScopeStream {
  drive: DriveStream,
  mode: OutputMode,
  input: Option<Record>,
  finished: bool,
}

impl ScopeStream {
  fn finish(&mut self, control: PipelineControl) -> FlowResult<PipelineControl> {
    self.finished = true;
    Ok(control)
  }
}

impl RecordStream for ScopeStream {
  fn next_record(&mut self) -> FlowResult<PipelineControl> {
    if self.finished {
      return Ok(PipelineControl::Exhausted);
    }

    match self.mode {
      OutputMode::Outputs | OutputMode::InputAndOutputs => {
        if let Some(input) = self.input.take() {
          return Ok(PipelineControl::Continue(input));
        }
        match self.drive.next_record()? {
          PipelineControl::Continue(record) => Ok(PipelineControl::Continue(record)),
          other => self.finish(other),
        }
      }
      OutputMode::None => loop {
        match self.drive.next_record()? {
          PipelineControl::Continue(_) => {}
          PipelineControl::Exhausted => {
            let control = self.input.take().map_or(PipelineControl::Exhausted, PipelineControl::Continue);
            return self.finish(control);
          }
          PipelineControl::Stop => return self.finish(PipelineControl::Stop),
        }
      },
      OutputMode::LastOutput => {
        let mut last = None;
        loop {
          match self.drive.next_record()? {
            PipelineControl::Continue(record) => last = Some(record),
            PipelineControl::Exhausted => {
              let control = last.map_or(PipelineControl::Exhausted, PipelineControl::Continue);
              return self.finish(control);
            }
            PipelineControl::Stop => return self.finish(PipelineControl::Stop),
          }
        }
      }
    }
  }
}

/// A compiled (sub-)pipeline. Usable anywhere a node is.
pub struct Scope {
  location: Arc<str>,
  options: ScopeOptions,
  body: Sequence,
}

impl Scope {
  pub(crate) fn new(location: String, options: ScopeOptions, body: Sequence) -> Self {
    Self {
      location: location.into(),
      options,
      body,
    }
  }

  pub fn options(&self) -> ScopeOptions {
    self.options
  }

  pub fn location(&self) -> &str {
    &self.location
  }

  /// Number of nodes directly in this scope (nested scopes count as one).
  pub fn len(&self) -> usize {
    self.body.nodes().len()
  }

  pub fn is_empty(&self) -> bool {
    self.body.nodes().is_empty()
  }

  /// The raw internal record stream, before output scoping is applied.
  /// The loop cap is taken from `ctx`, so it holds however the scope was compiled.
  pub(crate) fn drive(&self, input: Record, ctx: &RunContext) -> DriveStream {
    DriveStream {
      body: self.body.clone(),
      looping: self.options.looping,
      pending: VecDeque::from([input]),
      current: None,
      passes: 0,
      max_passes: if self.options.looping { ctx.max_loop_passes() } else { None },
      ctx: *ctx,
      location: Arc::clone(&self.location),
    }
  }
}

impl Node for Scope {
  fn name(&self) -> &str {
    &self.location
  }

  fn run(&self, input: Record, ctx: &RunContext) -> FlowResult<NodeStream> {
    let mode = self.options.output;
    let forwarded_input = match mode {
      OutputMode::None | OutputMode::InputAndOutputs => Some(input.clone()),
      OutputMode::Outputs | OutputMode::LastOutput => None,
    };
    Ok(Box::new(ScopeStream {
      drive: self.drive(input, ctx),
      mode,
      input: forwarded_input,
      finished: false,
    }))
  }

  fn reset(&self) {
    for node in self.body.nodes() {
      node.reset();
    }
  }
}
