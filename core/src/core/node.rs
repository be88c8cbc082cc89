// crawlflow/src/core/node.rs

//! Defines the `Node` capability and the lazy `RecordStream` every node returns.
//!
//! A node is invoked once per upstream record and hands back a stream. The
//! stream does no work until it is pulled; pulling is the only point where a
//! node's computation advances.

use crate::core::context::RunContext;
use crate::core::control::PipelineControl;
use crate::core::record::Record;
use crate::core::stream;
use crate::error::{FlowError, FlowResult};
use std::fmt;
use std::sync::Arc;

/// A lazy, non-restartable sequence of records.
pub trait RecordStream {
  /// Produces the next record, reports exhaustion, or forwards a stop signal.
  /// Errors are node execution errors and end the run.
  fn next_record(&mut self) -> FlowResult<PipelineControl>;
}

pub type NodeStream = Box<dyn RecordStream>;

/// The atomic unit of computation in a pipeline.
///
/// Implementations must not mutate the input record in place; a node that
/// wants to add or override fields produces a new record through
/// [`Record::updated`] and friends.
pub trait Node: Send + Sync {
  /// Name used in logs and error attribution.
  fn name(&self) -> &str;

  /// Starts processing `input`, returning the stream of produced records.
  ///
  /// Nodes that run other nodes (scopes, switches) pass `ctx` on unchanged.
  fn run(&self, input: Record, ctx: &RunContext) -> FlowResult<NodeStream>;

  /// Clears any state accumulated across runs. Most nodes are stateless.
  fn reset(&self) {}
}

pub type NodeRef = Arc<dyn Node>;

impl<N: Node + ?Sized> Node for Arc<N> {
  fn name(&self) -> &str {
    (**self).name()
  }

  fn run(&self, input: Record, ctx: &RunContext) -> FlowResult<NodeStream> {
    (**self).run(input, ctx)
  }

  fn reset(&self) {
    (**self).reset()
  }
}

type NodeFn<I> = dyn Fn(&Record) -> anyhow::Result<I> + Send + Sync;

/// A node built from a closure that maps one record to any iterable of records.
///
/// The returned iterator is consumed lazily. Failures returned by the closure
/// are attributed to the node's name.
pub struct FnNode<I> {
  name: String,
  func: Box<NodeFn<I>>,
}

impl<I> FnNode<I>
where
  I: IntoIterator<Item = Record>,
  I::IntoIter: 'static,
{
  pub fn new(
    name: impl Into<String>,
    func: impl Fn(&Record) -> anyhow::Result<I> + Send + Sync + 'static,
  ) -> Self {
    Self {
      name: name.into(),
      func: Box::new(func),
    }
  }
}

impl<I> Node for FnNode<I>
where
  I: IntoIterator<Item = Record> + 'static,
  I::IntoIter: 'static,
{
  fn name(&self) -> &str {
    &self.name
  }

  fn run(&self, input: Record, _ctx: &RunContext) -> FlowResult<NodeStream> {
    match (self.func)(&input) {
      Ok(records) => Ok(stream::from_iter(records)),
      // A FlowError passed up through the closure keeps its variant.
      Err(source) => match source.downcast::<FlowError>() {
        Ok(flow_err) => Err(flow_err),
        Err(source) => Err(FlowError::Node {
          node: self.name.clone(),
          source,
        }),
      },
    }
  }
}

impl<I> fmt::Debug for FnNode<I> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FnNode").field("name", &self.name).finish()
  }
}

/// Shorthand for [`FnNode::new`].
pub fn func_node<I>(
  name: impl Into<String>,
  func: impl Fn(&Record) -> anyhow::Result<I> + Send + Sync + 'static,
) -> FnNode<I>
where
  I: IntoIterator<Item = Record>,
  I::IntoIter: 'static,
{
  FnNode::new(name, func)
}
