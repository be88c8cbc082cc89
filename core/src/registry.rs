// crawlflow/src/registry.rs

//! Defines `PipelineRegistry`, a name-keyed store of pipeline templates.
//!
//! A template is a factory that builds a fresh `Pipeline` from a set of
//! parameters, so one registered name can serve many runs (for example one
//! crawl per dataset) without the runs sharing any state the factory does not
//! deliberately share.

use crate::core::record::Record;
use crate::error::{FlowError, FlowResult};
use crate::pipeline::definition::Pipeline;
use crate::pipeline::runner::{RunOutcome, Runner};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{event, instrument, Level};

pub type PipelineParams = Map<String, Value>;

type PipelineFactory = Arc<dyn Fn(&PipelineParams) -> FlowResult<Pipeline> + Send + Sync + 'static>;

#[derive(Default)]
pub struct PipelineRegistry {
  factories: Mutex<BTreeMap<String, PipelineFactory>>,
  runner: Runner,
}

impl PipelineRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry whose `run` uses `runner` instead of the default one.
  pub fn with_runner(runner: Runner) -> Self {
    Self {
      factories: Mutex::default(),
      runner,
    }
  }

  /// Registers `factory` under `name`, replacing any previous template.
  pub fn register(
    &self,
    name: impl Into<String>,
    factory: impl Fn(&PipelineParams) -> FlowResult<Pipeline> + Send + Sync + 'static,
  ) {
    let name = name.into();
    event!(Level::DEBUG, %name, "Registering pipeline template.");
    if self.factories.lock().insert(name.clone(), Arc::new(factory)).is_some() {
      event!(Level::WARN, %name, "Replaced an existing pipeline template.");
    }
  }

  pub fn contains(&self, name: &str) -> bool {
    self.factories.lock().contains_key(name)
  }

  /// Registered names, sorted.
  pub fn names(&self) -> Vec<String> {
    self.factories.lock().keys().cloned().collect()
  }

  /// Builds the pipeline registered under `name`.
  pub fn build(&self, name: &str, params: &PipelineParams) -> FlowResult<Pipeline> {
    // Clone the factory out so user code never runs under the registry lock.
    let factory = self
      .factories
      .lock()
      .get(name)
      .cloned()
      .ok_or_else(|| {
        event!(Level::ERROR, %name, "No pipeline registered under this name.");
        FlowError::PipelineNotFound { name: name.to_string() }
      })?;
    factory(params)
  }

  /// Builds and runs the pipeline registered under `name`.
  #[instrument(name = "PipelineRegistry::run", skip(self, params, initial), err(Display))]
  pub fn run(&self, name: &str, params: &PipelineParams, initial: Option<Record>) -> FlowResult<RunOutcome> {
    let pipeline = self.build(name, params)?;
    self.runner.run(&pipeline, initial)
  }
}
