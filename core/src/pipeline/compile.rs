// crawlflow/src/pipeline/compile.rs

//! Compiles a `Pipeline` definition into a tree of `Scope` nodes.
//!
//! Compilation is pure: it validates the definition and builds fresh scope
//! wrappers, sharing only the user's nodes. Compiling one definition twice
//! gives two independent but equivalent trees.

use crate::core::node::NodeRef;
use crate::error::{FlowError, FlowResult};
use crate::pipeline::definition::{Element, Pipeline};
use crate::pipeline::directive::ScopeOptions;
use crate::pipeline::execution::{Scope, Sequence};
use std::sync::Arc;
use tracing::{event, instrument, Level};

pub(crate) const ROOT_LOCATION: &str = "pipeline";

/// Validates definitions and builds scope trees. Run-time settings such as
/// the loop cap are not part of a compiled tree; see `RunContext`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler;

impl Compiler {
  pub fn new() -> Self {
    Self
  }

  #[instrument(name = "Compiler::compile", skip_all, fields(num_elements = pipeline.len()), err(Display))]
  pub fn compile(&self, pipeline: &Pipeline) -> FlowResult<Scope> {
    let scope = self.compile_at(pipeline, ROOT_LOCATION.to_string())?;
    event!(Level::DEBUG, options = ?scope.options(), "Pipeline compiled.");
    Ok(scope)
  }

  /// Compiles `pipeline` as a scope labelled `location` in logs and errors.
  pub fn compile_at(&self, pipeline: &Pipeline, location: String) -> FlowResult<Scope> {
    let mut options = ScopeOptions::default();
    let mut nodes: Vec<NodeRef> = Vec::with_capacity(pipeline.len());

    for (idx, element) in pipeline.elements().iter().enumerate() {
      let element_location = format!("{}[{}]", location, idx);
      match element {
        Element::Node(node) => nodes.push(Arc::clone(node)),
        Element::Pipeline(sub) => {
          let scope = self.compile_at(sub, element_location)?;
          nodes.push(Arc::new(scope));
        }
        Element::Options(opts) if idx == 0 => options = *opts,
        Element::Mapping(mapping) if idx == 0 => {
          options = ScopeOptions::from_mapping(mapping).map_err(|e| {
            FlowError::configuration(&element_location, format!("invalid scope options {}: {}", mapping, e))
          })?;
        }
        Element::Options(_) | Element::Mapping(_) => {
          return Err(FlowError::configuration(
            &element_location,
            "scope options are only recognized as the first element of a pipeline",
          ));
        }
      }
    }

    if options.looping && nodes.is_empty() {
      return Err(FlowError::configuration(
        &location,
        "a looping scope needs at least one node",
      ));
    }

    Ok(Scope::new(location, options, Sequence::new(nodes)))
  }
}
