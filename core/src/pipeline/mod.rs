// crawlflow/src/pipeline/mod.rs

//! Pipeline definitions, their compilation into scope trees, and the runner.

pub mod compile;
pub mod definition;
pub mod directive;
pub mod execution;
pub mod runner;

pub use compile::Compiler;
pub use definition::{Element, Pipeline};
pub use directive::{OutputMode, ScopeOptions};
pub use execution::Scope;
pub use runner::{run_pipeline, RunOutcome, Runner, RunnerConfig};
