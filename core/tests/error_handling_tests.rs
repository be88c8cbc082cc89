// tests/error_handling_tests.rs
mod common;

use common::*;
use crawlflow::nodes::{xrange_node, Sink};
use crawlflow::{func_node, run_pipeline, FlowError, Pipeline, Record, Runner, RunnerConfig, ScopeOptions};
use serde_json::json;

#[test]
fn test_unknown_directive_key_is_a_configuration_error() {
  setup_tracing();
  let pipeline = Pipeline::new().element(json!({"xxx": 1}));

  let err = run_pipeline(&pipeline, None).unwrap_err();

  assert!(err.is_configuration(), "expected a configuration error, got {:?}", err);
  match err {
    FlowError::Configuration { location, message } => {
      assert_eq!(location, "pipeline[0]");
      assert!(message.contains("xxx"), "message should name the key: {}", message);
    }
    other => panic!("Expected FlowError::Configuration, got {:?}", other),
  }
}

#[test]
fn test_configuration_error_is_raised_before_any_node_runs() {
  setup_tracing();
  let sink = Sink::new();
  let pipeline = Pipeline::new()
    .node(xrange_node(3, "i"))
    .node(sink.clone())
    .nest(Pipeline::new().element(json!({"output": "everything"})));

  let err = run_pipeline(&pipeline, None).unwrap_err();

  assert!(err.is_configuration());
  assert!(sink.is_empty(), "no node may run when the definition is invalid");
}

#[test]
fn test_mapping_after_first_element_is_rejected() {
  setup_tracing();
  let pipeline = Pipeline::new().node(xrange_node(1, "i")).element(json!({"output": "outputs"}));

  match run_pipeline(&pipeline, None) {
    Err(FlowError::Configuration { location, .. }) => assert_eq!(location, "pipeline[1]"),
    other => panic!("Expected FlowError::Configuration, got {:?}", other),
  }
}

#[test]
fn test_ill_typed_loop_value_is_rejected() {
  setup_tracing();
  let pipeline = Pipeline::new().nest(
    Pipeline::new()
      .element(json!({"loop": "yes"}))
      .node(xrange_node(1, "i")),
  );

  match run_pipeline(&pipeline, None) {
    Err(FlowError::Configuration { location, .. }) => assert_eq!(location, "pipeline[0][0]"),
    other => panic!("Expected FlowError::Configuration, got {:?}", other),
  }
}

#[test]
fn test_looping_scope_without_nodes_is_rejected() {
  setup_tracing();
  let pipeline = Pipeline::new().options(ScopeOptions::outputs().with_loop(true));

  let err = run_pipeline(&pipeline, None).unwrap_err();

  assert!(err.is_configuration());
}

#[test]
fn test_node_error_propagates_unmodified() {
  setup_tracing();
  let sink = Sink::new();
  let pipeline = Pipeline::new()
    .node(xrange_node(3, "i"))
    .node(sink.clone())
    .nest(Pipeline::new().node(FailingNode { message: "I am a bad node!" }));

  let err = run_pipeline(&pipeline, None).unwrap_err();

  assert!(!err.is_configuration());
  match err {
    FlowError::Handler { source } => {
      let test_err = source.downcast_ref::<TestError>().expect("source should be the node's own error");
      assert_eq!(test_err, &TestError::Node("I am a bad node!".to_string()));
    }
    other => panic!("Expected FlowError::Handler, got {:?}", other),
  }
  // The failure happened on the first record; nothing after it ran.
  assert_eq!(sink.len(), 1);
}

#[test]
fn test_closure_node_error_is_attributed_to_node() {
  setup_tracing();
  let pipeline = Pipeline::new().node(func_node("parse_listing", |_: &Record| {
    Err::<Vec<Record>, _>(anyhow::anyhow!("listing was empty"))
  }));

  match run_pipeline(&pipeline, None) {
    Err(FlowError::Node { node, source }) => {
      assert_eq!(node, "parse_listing");
      assert_eq!(source.to_string(), "listing was empty");
    }
    other => panic!("Expected FlowError::Node, got {:?}", other),
  }
}

#[test]
fn test_closure_node_passing_up_a_flow_error_keeps_its_variant() {
  setup_tracing();
  let pipeline = Pipeline::new().node(func_node("needs_url", |r: &Record| {
    let url = r.text("url").ok_or_else(|| FlowError::MissingField {
      node: "needs_url".to_string(),
      field: "url".to_string(),
    })?;
    Ok(Some(r.with("host", url)))
  }));

  match run_pipeline(&pipeline, None) {
    Err(FlowError::MissingField { node, field }) => {
      assert_eq!(node, "needs_url");
      assert_eq!(field, "url");
    }
    other => panic!("Expected FlowError::MissingField, got {:?}", other),
  }
}

#[test]
fn test_flow_error_round_trips_through_anyhow() {
  let original = FlowError::PipelineNotFound { name: "openfmri".to_string() };
  let converted = FlowError::from(anyhow::Error::new(original));

  assert!(matches!(converted, FlowError::PipelineNotFound { ref name } if name == "openfmri"));
}

#[test]
fn test_loop_limit_stops_runaway_loops() {
  setup_tracing();
  let pipeline = Pipeline::new()
    .options(ScopeOptions::outputs().with_loop(true))
    .node(IncrementBelow { limit: i64::MAX });
  let runner = Runner::new(RunnerConfig {
    max_loop_passes: Some(10),
    ..Default::default()
  });

  match runner.run(&pipeline, Some(Record::new().with("x", 0))) {
    Err(FlowError::LoopLimitExceeded { location, limit }) => {
      assert_eq!(location, "pipeline");
      assert_eq!(limit, 10);
    }
    other => panic!("Expected FlowError::LoopLimitExceeded, got {:?}", other),
  }
}

#[test]
fn test_loop_limit_does_not_affect_terminating_loops() {
  setup_tracing();
  let pipeline = Pipeline::new()
    .options(ScopeOptions::outputs().with_loop(true))
    .node(IncrementBelow { limit: 3 });
  let runner = Runner::new(RunnerConfig {
    max_loop_passes: Some(4),
    ..Default::default()
  });

  let outcome = runner.run(&pipeline, Some(Record::new().with("x", 0))).unwrap();

  assert_eq!(outcome.output.map(|o| o.len()), Some(3));
}

#[test]
fn test_runner_config_deserializes_with_defaults() {
  let config: RunnerConfig = serde_json::from_value(json!({"max_loop_passes": 50})).unwrap();

  assert_eq!(
    config,
    RunnerConfig {
      reset_nodes: false,
      max_loop_passes: Some(50),
    }
  );
}
