// crawlflow/examples/nested_scopes.rs

use crawlflow::nodes::{assign, xrange_node, LogRecords};
use crawlflow::{func_node, run_pipeline, FlowError, Pipeline, Record, ScopeOptions};
use tracing::info;

fn main() -> Result<(), FlowError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();
  info!("--- Nested Scopes Example ---");

  // Follows `next` links until there are none: a looping scope re-feeds every
  // record it produces until a pass produces nothing.
  let follow_next = func_node("follow_next", |record: &Record| {
    let page = record.get("page").and_then(|v| v.as_u64()).unwrap_or_default();
    Ok((page < 3).then(|| record.with("page", page + 1)))
  });

  let pipeline = Pipeline::new()
    .options(ScopeOptions::outputs())
    .node(xrange_node(2, "section"))
    // Side work: its records never escape, the section record passes on untouched.
    .nest(Pipeline::new().node(assign([("scratch", true)])).node(LogRecords::new("scratch")))
    // Pagination: every page escapes.
    .nest(
      Pipeline::new()
        .options(ScopeOptions::outputs().with_loop(true))
        .node(follow_next),
    )
    // Summary: only the last record escapes.
    .nest(
      Pipeline::new()
        .options(ScopeOptions::last_output())
        .node(xrange_node(4, "item")),
    );

  let output = run_pipeline(&pipeline, Some(Record::new().with("page", 0)))?.unwrap_or_default();
  for record in &output {
    info!("- {}", record);
  }

  // 2 sections x 3 pages, each reduced to its last item.
  assert_eq!(output.len(), 6);
  assert!(output.iter().all(|r| r.get("item") == Some(&serde_json::json!(3))));
  assert!(output.iter().all(|r| !r.contains_key("scratch")));

  Ok(())
}
