// crawlflow/examples/registry_basic.rs

use crawlflow::nodes::{assign, rename, xrange_node, Substitute};
use crawlflow::{FlowError, Pipeline, PipelineParams, PipelineRegistry, PipelineResult, ScopeOptions};
use serde_json::json;
use tracing::{error, info};

fn dataset_listing(params: &PipelineParams) -> Result<Pipeline, FlowError> {
  let dataset = params
    .get("dataset")
    .and_then(|v| v.as_str())
    .ok_or_else(|| FlowError::Configuration {
      location: "dataset_listing".to_string(),
      message: "parameter 'dataset' is required".to_string(),
    })?;
  let files = params.get("files").and_then(|v| v.as_u64()).unwrap_or(2);

  Ok(
    Pipeline::new()
      .options(ScopeOptions::outputs())
      .node(assign([("dataset", dataset)]))
      .node(xrange_node(files, "index"))
      .node(assign([("href", "http://example.org/{dataset}/file_{index}.tar.gz")]).interpolate(true))
      .node(Substitute::new().rule("href", "^http://", "https://")?)
      .node(rename([("href", "url")])),
  )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Crawlflow Registry Basic Example ---");

  // 1. Register templates by name.
  let registry = PipelineRegistry::new();
  registry.register("dataset_listing", dataset_listing);
  registry.register("noop", |_: &PipelineParams| Ok(Pipeline::new()));
  info!("Registered templates: {:?}", registry.names());

  // 2. One template, many runs.
  for dataset in ["ds000001", "ds000002"] {
    let params = json!({"dataset": dataset, "files": 2});
    let params = params.as_object().cloned().unwrap_or_default();
    let outcome = registry.run("dataset_listing", &params, None)?;
    assert_eq!(outcome.result, PipelineResult::Completed);
    for record in outcome.output.iter().flatten() {
      info!("{} -> {}", dataset, record.text("url").unwrap_or_default());
    }
  }

  // 3. Failures are reported, not panicked on.
  match registry.run("dataset_listing", &PipelineParams::new(), None) {
    Err(e) => info!("Missing parameter reported as expected: {}", e),
    Ok(_) => error!("Run without a dataset should have failed!"),
  }
  match registry.run("unknown", &PipelineParams::new(), None) {
    Err(FlowError::PipelineNotFound { name }) => info!("No template named '{}', as expected.", name),
    other => error!("Unexpected result: {:?}", other.map(|o| o.result)),
  }

  Ok(())
}
