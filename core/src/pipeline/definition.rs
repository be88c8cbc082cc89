// crawlflow/src/pipeline/definition.rs

//! Contains the declarative `Pipeline` definition and methods for its
//! construction and structural modification.
//!
//! A definition is an ordered list of elements: nodes, nested pipelines, and
//! at most one leading set of scope options. Nothing is validated here; the
//! compiler checks the whole tree before anything runs.

use crate::core::node::{Node, NodeRef};
use crate::pipeline::directive::ScopeOptions;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// One element of a pipeline definition.
#[derive(Clone)]
pub enum Element {
  Node(NodeRef),
  Pipeline(Pipeline),
  /// Typed scope options. Only valid as the first element.
  Options(ScopeOptions),
  /// Raw mapping, parsed into `ScopeOptions` at compile time. Only valid as
  /// the first element, and only with recognized keys.
  Mapping(Value),
}

impl Element {
  pub fn node<N: Node + 'static>(node: N) -> Self {
    Element::Node(Arc::new(node))
  }

  pub fn is_directive(&self) -> bool {
    matches!(self, Element::Options(_) | Element::Mapping(_))
  }
}

impl From<Pipeline> for Element {
  fn from(pipeline: Pipeline) -> Self {
    Element::Pipeline(pipeline)
  }
}

impl From<ScopeOptions> for Element {
  fn from(options: ScopeOptions) -> Self {
    Element::Options(options)
  }
}

impl From<Value> for Element {
  fn from(mapping: Value) -> Self {
    Element::Mapping(mapping)
  }
}

impl From<NodeRef> for Element {
  fn from(node: NodeRef) -> Self {
    Element::Node(node)
  }
}

impl fmt::Debug for Element {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Element::Node(node) => f.debug_tuple("Node").field(&node.name()).finish(),
      Element::Pipeline(p) => f.debug_tuple("Pipeline").field(p).finish(),
      Element::Options(o) => f.debug_tuple("Options").field(o).finish(),
      Element::Mapping(v) => f.debug_tuple("Mapping").field(v).finish(),
    }
  }
}

/// A declarative pipeline definition.
///
/// Cloning is cheap: nodes are shared, so a sink appearing in a clone is the
/// same sink.
#[derive(Clone, Default, Debug)]
pub struct Pipeline {
  pub(crate) elements: Vec<Element>,
}

impl Pipeline {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
    Self {
      elements: elements.into_iter().collect(),
    }
  }

  // --- Builder methods ---

  /// Appends a node.
  pub fn node<N: Node + 'static>(mut self, node: N) -> Self {
    self.elements.push(Element::node(node));
    self
  }

  /// Appends an already shared node.
  pub fn node_ref(mut self, node: NodeRef) -> Self {
    self.elements.push(Element::Node(node));
    self
  }

  /// Appends a nested sub-pipeline.
  pub fn nest(mut self, sub: Pipeline) -> Self {
    self.elements.push(Element::Pipeline(sub));
    self
  }

  /// Sets the leading scope options, replacing existing leading options.
  pub fn options(mut self, options: ScopeOptions) -> Self {
    self.set_options(options);
    self
  }

  /// Appends an arbitrary element.
  pub fn element(mut self, element: impl Into<Element>) -> Self {
    self.elements.push(element.into());
    self
  }

  // --- Structural modification ---

  pub fn push(&mut self, element: impl Into<Element>) {
    self.elements.push(element.into());
  }

  /// Inserts at `index`. Panics if `index > len`, like `Vec::insert`.
  pub fn insert(&mut self, index: usize, element: impl Into<Element>) {
    self.elements.insert(index, element.into());
  }

  /// Replaces the element at `index`, returning the previous one.
  pub fn replace(&mut self, index: usize, element: impl Into<Element>) -> Option<Element> {
    let slot = self.elements.get_mut(index)?;
    Some(std::mem::replace(slot, element.into()))
  }

  pub fn remove(&mut self, index: usize) -> Option<Element> {
    if index < self.elements.len() {
      Some(self.elements.remove(index))
    } else {
      None
    }
  }

  /// Sets the leading options: replaces a leading directive if there is one,
  /// otherwise inserts at the front.
  pub fn set_options(&mut self, options: ScopeOptions) {
    match self.elements.first() {
      Some(first) if first.is_directive() => self.elements[0] = Element::Options(options),
      _ => self.elements.insert(0, Element::Options(options)),
    }
  }

  /// Drops a leading directive, if any.
  pub fn clear_options(&mut self) -> Option<Element> {
    match self.elements.first() {
      Some(first) if first.is_directive() => Some(self.elements.remove(0)),
      _ => None,
    }
  }

  /// Mutable access to a nested sub-pipeline at `index`.
  pub fn sub_pipeline_mut(&mut self, index: usize) -> Option<&mut Pipeline> {
    match self.elements.get_mut(index) {
      Some(Element::Pipeline(p)) => Some(p),
      _ => None,
    }
  }

  /// A copy of this pipeline with `elements` appended.
  pub fn extended(&self, elements: impl IntoIterator<Item = Element>) -> Pipeline {
    let mut next = self.clone();
    next.elements.extend(elements);
    next
  }

  pub fn elements(&self) -> &[Element] {
    &self.elements
  }

  pub fn len(&self) -> usize {
    self.elements.len()
  }

  pub fn is_empty(&self) -> bool {
    self.elements.is_empty()
  }
}
