// crawlflow/examples/switch_routing.rs

use crawlflow::nodes::{assign, Sink};
use crawlflow::{run_pipeline, FlowError, Pipeline, Record, ScopeOptions, Switch, SwitchFallback};
use serde_json::json;
use tracing::info;

fn main() -> Result<(), FlowError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Switch Routing Example ---");

  let archives = Sink::new();
  let documents = Sink::new();

  // Each case is a sub-pipeline with its own scope options.
  let router = Switch::on_field("filename")
    .add_case(Pipeline::new().node(archives.clone()))
    .when_matches(r".*\.(tar\.gz|zip)$")?
    .add_case(
      Pipeline::new()
        .options(ScopeOptions::outputs())
        .node(assign([("kind", "document")]))
        .node(documents.clone()),
    )
    .on_condition(|value, _record| value.as_str().is_some_and(|s| s.ends_with(".txt") || s.ends_with(".pdf")))
    .if_no_case_matches(SwitchFallback::Skip)
    .if_field_missing(SwitchFallback::Skip)
    .build()?;

  let pipeline = Pipeline::new().options(ScopeOptions::outputs()).node(router);

  for filename in ["ds000001.tar.gz", "README.txt", "image.png", "paper.pdf"] {
    let output = run_pipeline(&pipeline, Some(Record::new().with("filename", filename)))?;
    info!("{} -> {:?}", filename, output.unwrap_or_default());
  }
  run_pipeline(&pipeline, Some(Record::new()))?;

  assert_eq!(archives.get_values(&["filename"]), vec![vec![json!("ds000001.tar.gz")]]);
  assert_eq!(documents.len(), 2);

  Ok(())
}
