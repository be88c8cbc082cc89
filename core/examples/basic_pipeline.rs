// crawlflow/examples/basic_pipeline.rs

use crawlflow::nodes::{assign, xrange_node, Sink};
use crawlflow::{func_node, FlowError, Pipeline, PipelineResult, Record, Runner, ScopeOptions};
use tracing::info;

fn main() -> Result<(), FlowError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 1. A closure node: one record in, any number of records out.
  let describe = func_node("describe", |record: &Record| {
    let page = record.get("page").and_then(|v| v.as_u64()).unwrap_or_default();
    let item = record.get("item").and_then(|v| v.as_u64()).unwrap_or_default();
    Ok(Some(record.with("label", format!("page {} / item {}", page, item))))
  });

  // 2. A sink keeps everything that reaches it.
  let sink = Sink::new();

  // 3. Consecutive nodes expand like nested loops: 2 pages x 3 items.
  let pipeline = Pipeline::new()
    .options(ScopeOptions::outputs())
    .node(assign([("site", "https://example.com")]))
    .node(xrange_node(2, "page"))
    .node(xrange_node(3, "item"))
    .node(describe)
    .node(sink.clone());

  // 4. Run it.
  info!("Starting pipeline execution...");
  let outcome = Runner::default().run(&pipeline, None)?;

  // 5. Inspect the results
  match outcome.result {
    PipelineResult::Completed => info!("Pipeline completed successfully!"),
    PipelineResult::Stopped => info!("Pipeline was stopped early."),
  }
  for record in outcome.output.iter().flatten() {
    info!("- {}", record);
  }

  // The last node varies fastest.
  let labels = sink.get_values(&["label"]);
  assert_eq!(labels.len(), 6);
  assert_eq!(labels[1][0], "page 0 / item 1");
  assert_eq!(labels[3][0], "page 1 / item 0");

  Ok(())
}
