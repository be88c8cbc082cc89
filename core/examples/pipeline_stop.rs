// crawlflow/examples/pipeline_stop.rs

use crawlflow::nodes::{interrupt_if, xrange_node, FieldMatcher, Sink};
use crawlflow::{FlowError, Pipeline, PipelineResult, Runner, ScopeOptions};
use serde_json::json;
use tracing::{error, info};

fn main() -> Result<(), FlowError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Pipeline Stop Example ---");

  let seen = Sink::new();
  let after_stop = Sink::new();

  // The stop signal raised deep inside a nested scope ends the whole run,
  // including the outer loop over `round`.
  let pipeline = Pipeline::new()
    .options(ScopeOptions::outputs())
    .node(xrange_node(3, "round"))
    .nest(
      Pipeline::new()
        .node(xrange_node(10, "i"))
        .node(seen.clone())
        .node(interrupt_if(FieldMatcher::exact([("round", json!(1)), ("i", json!(2))]))),
    )
    .node(after_stop.clone());

  info!("Starting pipeline execution (expecting stop)...");
  let outcome = Runner::default().run(&pipeline, None)?;

  match outcome.result {
    PipelineResult::Completed => error!("Pipeline completed, but was expected to stop!"),
    PipelineResult::Stopped => info!("Pipeline stopped as expected."),
  }

  // Round 0 ran fully (10 records), round 1 stopped on its third record.
  assert_eq!(seen.len(), 13, "Incorrect number of records reached the sink.");
  assert_eq!(after_stop.len(), 1, "Only round 0 should have left the nested scope.");
  info!("Collected before the stop: {:?}", outcome.output.map(|o| o.len()));

  Ok(())
}
