// crawlflow/src/pipeline/runner.rs

//! Contains the `Runner`, which compiles a pipeline, drives it to exhaustion
//! and collects what escapes the top-level scope.

use crate::core::context::RunContext;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::node::{Node, RecordStream};
use crate::core::record::Record;
use crate::error::FlowResult;
use crate::pipeline::compile::Compiler;
use crate::pipeline::definition::Pipeline;
use crate::pipeline::directive::OutputMode;
use serde::{Deserialize, Serialize};
use tracing::{event, instrument, Level};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
  /// Call `Node::reset` on every node of the compiled tree before driving it.
  pub reset_nodes: bool,
  /// Upper bound on passes a looping scope may make for one upstream record.
  /// `None` leaves loops unbounded.
  pub max_loop_passes: Option<usize>,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
  pub result: PipelineResult,
  /// `None` when the top-level scope forwards nothing (`output: none`).
  pub output: Option<Vec<Record>>,
}

#[derive(Debug, Clone, Default)]
pub struct Runner {
  config: RunnerConfig,
}

impl Runner {
  pub fn new(config: RunnerConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &RunnerConfig {
    &self.config
  }

  /// The context every node of a run receives.
  pub fn context(&self) -> RunContext {
    RunContext::new().with_max_loop_passes(self.config.max_loop_passes)
  }

  /// Compiles and runs `pipeline` starting from `initial` (an empty record if `None`).
  ///
  /// Configuration errors are returned before any node runs. Node errors are
  /// returned as produced. A stop signal ends the run normally, keeping the
  /// output collected so far.
  #[instrument(
        name = "Runner::run",
        skip_all,
        fields(num_elements = pipeline.len(), reset_nodes = self.config.reset_nodes),
        err(Display)
    )]
  pub fn run(&self, pipeline: &Pipeline, initial: Option<Record>) -> FlowResult<RunOutcome> {
    let root = Compiler::new().compile(pipeline)?;
    let ctx = self.context();
    if self.config.reset_nodes {
      event!(Level::DEBUG, "Resetting nodes before run.");
      root.reset();
    }

    let mode = root.options().output;
    let initial = initial.unwrap_or_default();
    let mut collected = Vec::new();
    if mode == OutputMode::InputAndOutputs {
      collected.push(initial.clone());
    }

    event!(Level::DEBUG, ?mode, "Pipeline execution starting.");
    let mut drive = root.drive(initial, &ctx);
    let result = loop {
      match drive.next_record()? {
        PipelineControl::Continue(record) => match mode {
          OutputMode::None => {}
          OutputMode::Outputs | OutputMode::InputAndOutputs => collected.push(record),
          OutputMode::LastOutput => {
            collected.clear();
            collected.push(record);
          }
        },
        PipelineControl::Exhausted => break PipelineResult::Completed,
        PipelineControl::Stop => {
          event!(Level::INFO, "Pipeline stopped by a node.");
          break PipelineResult::Stopped;
        }
      }
    };

    event!(Level::DEBUG, ?result, collected = collected.len(), "Pipeline execution finished.");
    let output = match mode {
      OutputMode::None => None,
      _ => Some(collected),
    };
    Ok(RunOutcome { result, output })
  }
}

/// Runs `pipeline` with the default configuration and returns only its output.
///
/// `None` means the top-level scope forwards nothing; otherwise the list holds
/// every forwarded record (`outputs`) or at most the last one (`last-output`).
pub fn run_pipeline(pipeline: &Pipeline, initial: Option<Record>) -> FlowResult<Option<Vec<Record>>> {
  Runner::default().run(pipeline, initial).map(|outcome| outcome.output)
}
