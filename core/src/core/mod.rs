pub mod context;
pub mod control;
pub mod node;
pub mod record;
pub mod stream;

// Re-export key types for easier access from other crawlflow modules (and lib.rs)
pub use context::RunContext;
pub use control::{PipelineControl, PipelineResult};
pub use node::{func_node, FnNode, Node, NodeRef, NodeStream, RecordStream};
pub use record::Record;
