// core/src/access/role.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role label carried by the `admin-role` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  Admin,
  SuperAdmin,
  Manager,
  Delivery,
  Customer,
}

impl Role {
  /// Parses a cookie label. Matching is case-insensitive and accepts the
  /// legacy `super admin` spelling. Unknown labels yield `None`.
  pub fn parse(label: &str) -> Option<Self> {
    match label.trim().to_ascii_lowercase().as_str() {
      "admin" => Some(Role::Admin),
      "super_admin" | "super admin" => Some(Role::SuperAdmin),
      "manager" => Some(Role::Manager),
      "delivery" => Some(Role::Delivery),
      "customer" => Some(Role::Customer),
      _ => None,
    }
  }

  /// Roles allowed into the admin console.
  pub fn is_admin_equivalent(self) -> bool {
    matches!(self, Role::Admin | Role::SuperAdmin | Role::Manager)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Role::Admin => "admin",
      Role::SuperAdmin => "super_admin",
      Role::Manager => "manager",
      Role::Delivery => "delivery",
      Role::Customer => "customer",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
