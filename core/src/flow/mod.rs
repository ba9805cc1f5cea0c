//! A small async step-flow engine.
//!
//! A [`Flow`] is an ordered list of named steps over a shared
//! [`ContextData`]. Each step has `before`/`on`/`after` handler phases.
//! Steps are either required (a failure aborts the run) or best-effort (a
//! failure is logged and the run continues), which is how the order flows
//! keep notifications and cache invalidation from failing a write.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod registry;
pub mod step;

pub use context_data::ContextData;
pub use control::{FlowControl, FlowOutcome};
pub use definition::{Flow, Handler};
pub use registry::FlowRegistry;
pub use step::{SkipCondition, StepDef, StepMode};
