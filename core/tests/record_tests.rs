// tests/record_tests.rs
mod common;

use common::*;
use crawlflow::{FlowError, Record};
use serde_json::json;

#[test]
fn test_updated_leaves_original_untouched() {
  setup_tracing();
  let original = rec(json!({"url": "https://example.com", "depth": 1}));

  let branched = original.updated([("depth", json!(2)), ("filename", json!("index.html"))]);

  assert_eq!(original, rec(json!({"url": "https://example.com", "depth": 1})));
  assert_eq!(
    branched,
    rec(json!({"url": "https://example.com", "depth": 2, "filename": "index.html"}))
  );
}

#[test]
fn test_clones_share_until_edited() {
  let original = Record::from_pairs([("a", 1)]);
  let clone = original.clone();

  let edited = clone.with("b", 2);

  assert_eq!(original, clone);
  assert_eq!(edited.len(), 2);
  assert_eq!(original.len(), 1);
}

#[test]
fn test_field_order_is_preserved() {
  let record = Record::new().with("zeta", 1).with("alpha", 2).with("mid", 3);

  assert_eq!(record.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);

  let trimmed = record.without("alpha");
  assert_eq!(trimmed.keys().collect::<Vec<_>>(), vec!["zeta", "mid"]);
}

#[test]
fn test_without_missing_field_is_a_cheap_copy() {
  let record = Record::from_pairs([("a", 1)]);

  assert_eq!(record.without("nope"), record);
}

#[test]
fn test_from_json_rejects_non_objects() {
  let err = Record::from_json(json!([1, 2, 3])).unwrap_err();

  assert!(matches!(err, FlowError::Configuration { .. }));
}

#[test]
fn test_text_renders_strings_verbatim_and_others_as_json() {
  let record = rec(json!({"name": "ds000001", "index": 1, "tags": ["a"]}));

  assert_eq!(record.text("name").as_deref(), Some("ds000001"));
  assert_eq!(record.text("index").as_deref(), Some("1"));
  assert_eq!(record.text("tags").as_deref(), Some("[\"a\"]"));
  assert_eq!(record.text("missing"), None);
}

#[test]
fn test_display_is_json() {
  let record = Record::new().with("x", 1);

  assert_eq!(record.to_string(), r#"{"x":1}"#);
  assert_eq!(record.to_json(), json!({"x": 1}));
}
