// crawlflow/src/lib.rs

//! Crawlflow: a lazy, composable record-pipeline engine.
//!
//! A pipeline is an ordered list of nodes and nested sub-pipelines that
//! threads dictionary-like `Record`s through them:
//!  - Each node is a lazy producer/transformer/sink returning a stream per input record.
//!  - Consecutive nodes expand depth-first, like nested loops (the last node varies fastest).
//!  - Nested pipelines are scopes; leading scope options pick what escapes
//!    (`none`, `outputs`, `last-output`, `input+outputs`) and whether the scope loops.
//!  - Any node may raise the stop signal, which ends the whole run normally.
//!  - Definitions are validated when compiled, before any node runs.

pub mod conditional;
pub mod core;
pub mod error;
pub mod nodes;
pub mod pipeline;
pub mod registry;

// --- Re-exports for the Public API ---

pub use crate::core::context::RunContext;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::node::{func_node, FnNode, Node, NodeRef, NodeStream, RecordStream};
pub use crate::core::record::Record;
pub use crate::core::stream;

pub use crate::pipeline::{
  run_pipeline, Compiler, Element, OutputMode, Pipeline, RunOutcome, Runner, RunnerConfig, Scope, ScopeOptions,
};

pub use crate::conditional::{Switch, SwitchBuilder, SwitchFallback};

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::{PipelineParams, PipelineRegistry};

/*
    Core Workflow:
    1. Build a `Pipeline` from nodes (`xrange_node`, `assign`, `Sink`, your own `Node` impls,
       or closures via `func_node`) and nested `Pipeline`s.
    2. Optionally lead any (sub-)pipeline with `ScopeOptions` (or a raw JSON mapping such as
       `{"loop": true, "output": "outputs"}`) to control looping and output scoping.
    3. Call `run_pipeline(&pipeline, None)` or `Runner::new(config).run(..)`.
    4. Inspect sinks, or the returned records when the top-level scope forwards output.
*/
