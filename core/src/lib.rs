// core/src/lib.rs

//! Core logic for the storefront service.
//!
//!  - [`access`]: session resolution from cookies and the per-path gate decision.
//!  - [`order`]: the order record, its lifecycle/payment/source enums, and the
//!    transition policy applied to status updates.
//!  - [`flow`]: an async named-step engine. Order operations run as flows so
//!    that side effects (bot notification, email, cache invalidation) can be
//!    declared best-effort next to the required persistence step.

pub mod access;
pub mod error;
pub mod flow;
pub mod order;

pub use crate::access::{CookieValues, GateDecision, GatePolicy, Role, Session, SessionKind, TokenValidator};
pub use crate::error::{CoreError, CoreResult};
pub use crate::flow::{ContextData, Flow, FlowControl, FlowOutcome, FlowRegistry, StepMode};
pub use crate::order::{
  ActionResult, LifecycleStatus, NewOrder, Order, OrderSource, PaymentStatus, StatusChange, TransitionPolicy,
};
