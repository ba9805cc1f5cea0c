// core/src/access/gate.rs

//! Per-request authorization decision for the storefront routes.

use super::role::Role;
use super::session::{CookieValues, Session, SessionKind, TokenValidator};
use std::fmt;

/// Which gate rule a path falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
  /// Admin console: admin-equivalent staff roles only.
  Admin,
  /// Delivery console: the `delivery` role only.
  Delivery,
  /// Shopper area: any authenticated session.
  Protected,
  /// Everything else passes through untouched.
  Public,
}

/// Why a request was turned away. Only used for logging; every reason
/// produces the same redirect for a given route class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
  MissingToken,
  InvalidToken,
  MissingRole,
  UnknownRole,
  RoleNotPermitted,
  Unauthenticated,
  MalformedPath,
}

impl fmt::Display for DenyReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      DenyReason::MissingToken => "missing session token",
      DenyReason::InvalidToken => "invalid session token",
      DenyReason::MissingRole => "missing role",
      DenyReason::UnknownRole => "unrecognized role",
      DenyReason::RoleNotPermitted => "role not permitted",
      DenyReason::Unauthenticated => "no authenticated session",
      DenyReason::MalformedPath => "path does not decode to UTF-8",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
  /// Let the request through, with the resolved session if there is one.
  Allow(Option<Session>),
  /// Send the caller to `location`.
  Redirect { location: String, reason: DenyReason },
}

impl GateDecision {
  pub fn is_allowed(&self) -> bool {
    matches!(self, GateDecision::Allow(_))
  }
}

/// Route prefixes and token rules for the gate.
#[derive(Debug, Clone)]
pub struct GatePolicy {
  pub login_path: String,
  pub admin_prefix: String,
  pub delivery_prefix: String,
  pub protected_prefixes: Vec<String>,
  pub validator: TokenValidator,
}

impl Default for GatePolicy {
  fn default() -> Self {
    Self {
      login_path: "/login".to_string(),
      admin_prefix: "/admin".to_string(),
      delivery_prefix: "/delivery".to_string(),
      protected_prefixes: vec!["/account".to_string(), "/billing".to_string(), "/tracking".to_string()],
      validator: TokenValidator::default(),
    }
  }
}

/// `/admin` and `/admin/...` are under `/admin`; `/administrator` is not.
fn is_under(path: &str, prefix: &str) -> bool {
  match path.strip_prefix(prefix) {
    Some(rest) => rest.is_empty() || rest.starts_with('/'),
    None => false,
  }
}

/// Percent-decodes `raw` and collapses runs of `/`, giving the path the
/// router will match against. `None` when the decoded bytes are not UTF-8.
pub fn normalize_path(raw: &str) -> Option<String> {
  let decoded = urlencoding::decode(raw).ok()?;
  let mut path = String::with_capacity(decoded.len());
  for ch in decoded.chars() {
    if ch == '/' && path.ends_with('/') {
      continue;
    }
    path.push(ch);
  }
  Some(path)
}

impl GatePolicy {
  pub fn classify(&self, path: &str) -> RouteClass {
    if is_under(path, &self.admin_prefix) {
      RouteClass::Admin
    } else if is_under(path, &self.delivery_prefix) {
      RouteClass::Delivery
    } else if self.protected_prefixes.iter().any(|p| is_under(path, p)) {
      RouteClass::Protected
    } else {
      RouteClass::Public
    }
  }

  /// Decides whether a request for the raw (possibly percent-encoded) `path`
  /// carrying `cookies` may proceed. Classification runs on the normalized
  /// path; a path that cannot be decoded is denied.
  pub fn decide(&self, raw_path: &str, cookies: &CookieValues) -> GateDecision {
    let Some(path) = normalize_path(raw_path) else {
      return GateDecision::Redirect {
        location: format!("{}?reason=unauthorized", self.login_path),
        reason: DenyReason::MalformedPath,
      };
    };
    let path = path.as_str();
    match self.classify(path) {
      RouteClass::Public => GateDecision::Allow(Session::resolve(cookies, &self.validator)),
      RouteClass::Protected => match Session::resolve(cookies, &self.validator) {
        Some(session) => GateDecision::Allow(Some(session)),
        None => GateDecision::Redirect {
          location: format!("{}?redirect={}", self.login_path, urlencoding::encode(path)),
          reason: DenyReason::Unauthenticated,
        },
      },
      class @ (RouteClass::Admin | RouteClass::Delivery) => match self.staff_session(class, cookies) {
        Ok(session) => GateDecision::Allow(Some(session)),
        Err(reason) => GateDecision::Redirect {
          location: format!("{}?reason=unauthorized", self.login_path),
          reason,
        },
      },
    }
  }

  fn staff_session(&self, class: RouteClass, cookies: &CookieValues) -> Result<Session, DenyReason> {
    let token = cookies.admin_session.as_deref().ok_or(DenyReason::MissingToken)?;
    if !self.validator.is_valid(token) {
      return Err(DenyReason::InvalidToken);
    }
    let label = cookies.admin_role.as_deref().ok_or(DenyReason::MissingRole)?;
    let role = Role::parse(label).ok_or(DenyReason::UnknownRole)?;

    let permitted = match class {
      RouteClass::Admin => role.is_admin_equivalent(),
      RouteClass::Delivery => role == Role::Delivery,
      RouteClass::Protected | RouteClass::Public => true,
    };
    if !permitted {
      return Err(DenyReason::RoleNotPermitted);
    }

    Ok(Session {
      kind: SessionKind::Staff,
      token: token.to_string(),
      role: Some(role),
    })
  }
}
