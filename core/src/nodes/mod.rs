// crawlflow/src/nodes/mod.rs

//! The node library: general-purpose nodes that pipelines are assembled from.

pub mod matching;
pub mod misc;
pub mod sink;
pub mod substitute;

pub use matching::{FieldMatcher, Pattern};
pub use misc::{
  assign, continue_if, interrupt_if, rename, xrange_node, Assign, ContinueIf, InterruptIf, LogRecords, Rename, XRange,
};
pub use sink::Sink;
pub use substitute::Substitute;
