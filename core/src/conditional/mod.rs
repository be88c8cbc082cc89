// crawlflow/src/conditional/mod.rs

//! Conditional routing of records into alternative sub-pipelines.
//!
//! The `Switch` node picks one case pipeline per record based on a field's
//! value. Case pipelines are compiled like any nested pipeline, so output
//! scoping, looping and the stop signal behave the same inside them.

pub mod switch;

pub use switch::{Switch, SwitchBuilder, SwitchCaseConfigurator, SwitchFallback};
