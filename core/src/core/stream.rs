// crawlflow/src/core/stream.rs

//! Adapters that turn iterators and closures into `NodeStream`s.

use crate::core::control::PipelineControl;
use crate::core::node::{NodeStream, RecordStream};
use crate::core::record::Record;
use crate::error::{FlowError, FlowResult};

struct IterStream<It> {
  iter: It,
}

impl<It> RecordStream for IterStream<It>
where
  It: Iterator<Item = FlowResult<Record>>,
{
  fn next_record(&mut self) -> FlowResult<PipelineControl> {
    match self.iter.next() {
      Some(Ok(record)) => Ok(PipelineControl::Continue(record)),
      Some(Err(e)) => Err(e),
      None => Ok(PipelineControl::Exhausted),
    }
  }
}

struct FnStream<F> {
  func: F,
  done: bool,
}

impl<F> RecordStream for FnStream<F>
where
  F: FnMut() -> FlowResult<PipelineControl>,
{
  fn next_record(&mut self) -> FlowResult<PipelineControl> {
    if self.done {
      return Ok(PipelineControl::Exhausted);
    }
    let control = (self.func)()?;
    if !matches!(control, PipelineControl::Continue(_)) {
      self.done = true;
    }
    Ok(control)
  }
}

/// A lazy stream over any iterable of records.
pub fn from_iter<I>(records: I) -> NodeStream
where
  I: IntoIterator<Item = Record>,
  I::IntoIter: 'static,
{
  Box::new(IterStream {
    iter: records.into_iter().map(Ok::<Record, FlowError>),
  })
}

/// A lazy stream over an iterable whose items may fail.
pub fn try_from_iter<I>(records: I) -> NodeStream
where
  I: IntoIterator<Item = FlowResult<Record>>,
  I::IntoIter: 'static,
{
  Box::new(IterStream {
    iter: records.into_iter(),
  })
}

/// A stream driven by a closure, called once per pull.
///
/// After the closure returns anything other than `Continue` it is not called
/// again and the stream reports `Exhausted`.
pub fn from_fn<F>(func: F) -> NodeStream
where
  F: FnMut() -> FlowResult<PipelineControl> + 'static,
{
  Box::new(FnStream { func, done: false })
}

pub fn once(record: Record) -> NodeStream {
  from_iter(std::iter::once(record))
}

pub fn empty() -> NodeStream {
  from_iter(std::iter::empty())
}

/// A stream whose first pull raises the stop signal.
pub fn stop() -> NodeStream {
  from_fn(|| Ok(PipelineControl::Stop))
}
