//! Session credentials and the access gate decision.
//!
//! Nothing here touches HTTP types: the web layer hands over the request path
//! and the raw cookie values, and gets back a [`GateDecision`].

pub mod gate;
pub mod role;
pub mod session;

pub use gate::{normalize_path, DenyReason, GateDecision, GatePolicy, RouteClass};
pub use role::Role;
pub use session::{
  CookieValues, Session, SessionKind, TokenValidator, ADMIN_ROLE_COOKIE, ADMIN_SESSION_COOKIE, USER_SESSION_COOKIE,
};
