// core/src/access/session.rs

//! The one authenticated-session abstraction for a request.

use super::role::Role;
use serde::Serialize;

pub const ADMIN_SESSION_COOKIE: &str = "admin-session";
pub const ADMIN_ROLE_COOKIE: &str = "admin-role";
pub const USER_SESSION_COOKIE: &str = "user-session";

/// Raw cookie values as they arrived on the request. Empty strings are
/// treated the same as missing cookies.
#[derive(Debug, Clone, Default)]
pub struct CookieValues {
  pub admin_session: Option<String>,
  pub admin_role: Option<String>,
  pub user_session: Option<String>,
}

impl CookieValues {
  /// Builds the value set from a cookie lookup function.
  pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<String>) -> Self {
    let mut get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    Self {
      admin_session: get(ADMIN_SESSION_COOKIE),
      admin_role: get(ADMIN_ROLE_COOKIE),
      user_session: get(USER_SESSION_COOKIE),
    }
  }
}

/// Structural check applied to session tokens before any role is trusted.
///
/// Tokens are issued by an external identity provider; the gate only checks
/// their shape: long enough, and either a three-part JWT or a `user_` id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenValidator {
  pub min_len: usize,
}

impl Default for TokenValidator {
  fn default() -> Self {
    Self { min_len: 20 }
  }
}

impl TokenValidator {
  pub fn is_valid(&self, token: &str) -> bool {
    if token.len() < self.min_len {
      return false;
    }
    if token.starts_with("user_") {
      return true;
    }
    let segments: Vec<&str> = token.split('.').collect();
    segments.len() == 3 && segments.iter().all(|s| !s.is_empty())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
  /// Staff session from `admin-session`, role from `admin-role`.
  Staff,
  /// Shopper session from `user-session`.
  Customer,
}

/// A validated session. Role is the single source of truth for authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub kind: SessionKind,
  pub token: String,
  pub role: Option<Role>,
}

impl Session {
  /// Resolves the request's session. A valid staff token wins over a valid
  /// shopper token; invalid tokens are ignored entirely.
  pub fn resolve(cookies: &CookieValues, validator: &TokenValidator) -> Option<Self> {
    if let Some(token) = cookies.admin_session.as_deref().filter(|t| validator.is_valid(t)) {
      return Some(Session {
        kind: SessionKind::Staff,
        token: token.to_string(),
        role: cookies.admin_role.as_deref().and_then(Role::parse),
      });
    }
    cookies
      .user_session
      .as_deref()
      .filter(|t| validator.is_valid(t))
      .map(|token| Session {
        kind: SessionKind::Customer,
        token: token.to_string(),
        role: Some(Role::Customer),
      })
  }

  pub fn is_staff(&self) -> bool {
    self.kind == SessionKind::Staff
  }

  pub fn has_admin_role(&self) -> bool {
    self.is_staff() && self.role.is_some_and(Role::is_admin_equivalent)
  }

  pub fn has_role(&self, role: Role) -> bool {
    self.is_staff() && self.role == Some(role)
  }

  /// Label for log fields; never includes the token.
  pub fn role_label(&self) -> &'static str {
    self.role.map(Role::as_str).unwrap_or("none")
  }
}
