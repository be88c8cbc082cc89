// tests/conditional_switch_tests.rs
mod common;

use common::*;
use crawlflow::nodes::{assign, xrange_node, Sink};
use crawlflow::{run_pipeline, FlowError, Pipeline, PipelineResult, Runner, ScopeOptions, Switch, SwitchFallback};
use serde_json::json;

#[test]
fn test_switch_routes_by_exact_value() {
  setup_tracing();
  let even = Sink::new();
  let odd = Sink::new();
  let switch = Switch::on_field("parity")
    .add_case(Pipeline::new().node(even.clone()))
    .when_equals("even")
    .add_case(Pipeline::new().node(odd.clone()))
    .when_equals("odd")
    .build()
    .unwrap();
  let pipeline = Pipeline::new()
    .node(xrange_node(4, "i"))
    .node(crawlflow::func_node("parity", |r: &crawlflow::Record| {
      let i = r.get("i").and_then(|v| v.as_u64()).unwrap_or_default();
      Ok(Some(r.with("parity", if i % 2 == 0 { "even" } else { "odd" })))
    }))
    .node(switch);

  run_pipeline(&pipeline, None).unwrap();

  assert_eq!(even.get_values(&["i"]), vec![vec![json!(0)], vec![json!(2)]]);
  assert_eq!(odd.get_values(&["i"]), vec![vec![json!(1)], vec![json!(3)]]);
}

#[test]
fn test_switch_case_output_follows_scope_options() {
  setup_tracing();
  let after = Sink::new();
  let switch = Switch::on_field("kind")
    .add_case(
      Pipeline::new()
        .options(ScopeOptions::outputs())
        .node(assign([("license", "CC0")])),
    )
    .when_equals("license")
    .otherwise(Pipeline::new().node(assign([("ignored", true)])))
    .build()
    .unwrap();
  let pipeline = Pipeline::new().node(switch).node(after.clone());

  run_pipeline(&pipeline, Some(rec(json!({"kind": "license"})))).unwrap();
  run_pipeline(&pipeline, Some(rec(json!({"kind": "other"})))).unwrap();

  assert_eq!(
    after.data(),
    recs(json!([{"kind": "license", "license": "CC0"}, {"kind": "other"}]))
  );
}

#[test]
fn test_switch_regex_and_predicate_cases_first_match_wins() {
  setup_tracing();
  let hits = Sink::new();
  let switch = Switch::on_field("url")
    .add_case(Pipeline::new().options(ScopeOptions::outputs()).node(assign([("via", "regex")])))
    .when_matches(r"https://openfmri\.org/dataset/")
    .unwrap()
    .add_case(Pipeline::new().options(ScopeOptions::outputs()).node(assign([("via", "predicate")])))
    .on_condition(|value, _record| value.as_str().is_some_and(|s| s.ends_with(".tar.gz")))
    .build()
    .unwrap();
  let pipeline = Pipeline::new().node(switch).node(hits.clone());

  for url in [
    "https://openfmri.org/dataset/ds000001",
    "https://openfmri.org/dataset/ds000002.tar.gz",
    "https://s3.amazonaws.com/ds000003.tar.gz",
  ] {
    run_pipeline(&pipeline, Some(rec(json!({ "url": url })))).unwrap();
  }

  assert_eq!(
    hits.get_values(&["via"]),
    vec![vec![json!("regex")], vec![json!("regex")], vec![json!("predicate")]]
  );
}

#[test]
fn test_switch_missing_field_behaviors() {
  setup_tracing();
  let build = |behavior| {
    Switch::on_field("kind")
      .add_case(Pipeline::new())
      .when_equals("a")
      .if_field_missing(behavior)
      .build()
      .unwrap()
  };

  let failing = Pipeline::new().node(build(SwitchFallback::Fail));
  match run_pipeline(&failing, None) {
    Err(FlowError::MissingField { node, field }) => {
      assert_eq!(node, "switch(kind)");
      assert_eq!(field, "kind");
    }
    other => panic!("Expected FlowError::MissingField, got {:?}", other),
  }

  let sink = Sink::new();
  let skipping = Pipeline::new().node(build(SwitchFallback::Skip)).node(sink.clone());
  run_pipeline(&skipping, None).unwrap();
  assert!(sink.is_empty());

  let stopping = Pipeline::new().node(build(SwitchFallback::Stop));
  let outcome = Runner::default().run(&stopping, None).unwrap();
  assert_eq!(outcome.result, PipelineResult::Stopped);
}

#[test]
fn test_switch_without_matching_case_or_default_fails() {
  setup_tracing();
  let switch = Switch::on_field("kind")
    .add_case(Pipeline::new())
    .when_equals("a")
    .build()
    .unwrap();

  match run_pipeline(&Pipeline::new().node(switch), Some(rec(json!({"kind": "b"})))) {
    Err(FlowError::NoCaseMatched { node, value }) => {
      assert_eq!(node, "switch(kind)");
      assert_eq!(value, "b");
    }
    other => panic!("Expected FlowError::NoCaseMatched, got {:?}", other),
  }
}

#[test]
fn test_switch_with_invalid_case_fails_at_build() {
  setup_tracing();
  let err = Switch::on_field("kind")
    .add_case(Pipeline::new().element(json!({"unknown": 1})))
    .when_equals("a")
    .build()
    .err()
    .expect("build should fail");

  match err {
    FlowError::Configuration { location, .. } => assert_eq!(location, "switch(kind)[case 0][0]"),
    other => panic!("Expected FlowError::Configuration, got {:?}", other),
  }
}

#[test]
fn test_reset_reaches_sinks_inside_switch_cases() {
  setup_tracing();
  let sink = Sink::new();
  let switch = Switch::on_field("kind")
    .add_case(Pipeline::new().node(sink.clone()))
    .when_equals("a")
    .build()
    .unwrap();
  let pipeline = Pipeline::new().node(switch);
  let runner = Runner::new(crawlflow::RunnerConfig {
    reset_nodes: true,
    ..Default::default()
  });

  runner.run(&pipeline, Some(rec(json!({"kind": "a"})))).unwrap();
  runner.run(&pipeline, Some(rec(json!({"kind": "a"})))).unwrap();

  assert_eq!(sink.len(), 1);
}

#[test]
fn test_loop_limit_applies_inside_switch_cases() {
  setup_tracing();
  let switch = Switch::on_field("kind")
    .add_case(
      Pipeline::new()
        .element(json!({"loop": true, "output": "outputs"}))
        .node(IncrementBelow { limit: 1000 }),
    )
    .when_equals("a")
    .build()
    .unwrap();
  let pipeline = Pipeline::new().options(ScopeOptions::outputs()).node(switch);
  let capped = Runner::new(crawlflow::RunnerConfig {
    max_loop_passes: Some(10),
    ..Default::default()
  });

  match capped.run(&pipeline, Some(rec(json!({"kind": "a", "x": 0})))) {
    Err(FlowError::LoopLimitExceeded { location, limit }) => {
      assert_eq!(location, "switch(kind)[case 0]");
      assert_eq!(limit, 10);
    }
    other => panic!("Expected FlowError::LoopLimitExceeded, got {:?}", other),
  }

  // The same switch is unbounded under an uncapped runner.
  let output = run_pipeline(&pipeline, Some(rec(json!({"kind": "a", "x": 0})))).unwrap().unwrap();
  assert_eq!(output.len(), 1000);
}
