// core/src/order/status.rs

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an order is in fulfillment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleStatus {
  Pending,
  Confirmed,
  Shipped,
  Delivered,
  Cancelled,
}

impl LifecycleStatus {
  pub const ALL: [LifecycleStatus; 5] = [
    LifecycleStatus::Pending,
    LifecycleStatus::Confirmed,
    LifecycleStatus::Shipped,
    LifecycleStatus::Delivered,
    LifecycleStatus::Cancelled,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      LifecycleStatus::Pending => "Pending",
      LifecycleStatus::Confirmed => "Confirmed",
      LifecycleStatus::Shipped => "Shipped",
      LifecycleStatus::Delivered => "Delivered",
      LifecycleStatus::Cancelled => "Cancelled",
    }
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, LifecycleStatus::Delivered | LifecycleStatus::Cancelled)
  }

  /// Position on the main fulfillment path. `Cancelled` is off the path.
  fn rank(self) -> Option<u8> {
    match self {
      LifecycleStatus::Pending => Some(0),
      LifecycleStatus::Confirmed => Some(1),
      LifecycleStatus::Shipped => Some(2),
      LifecycleStatus::Delivered => Some(3),
      LifecycleStatus::Cancelled => None,
    }
  }
}

impl fmt::Display for LifecycleStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for LifecycleStatus {
  type Err = CoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    Self::ALL
      .into_iter()
      .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
      .or_else(|| wanted.eq_ignore_ascii_case("canceled").then_some(LifecycleStatus::Cancelled))
      .ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
  }
}

/// Money-received state. Varies independently of [`LifecycleStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
  Paid,
  Pending,
  #[serde(rename = "Partially Paid")]
  PartiallyPaid,
  Failed,
  #[default]
  Unpaid,
}

/// The channel an order came in through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSource {
  /// Entered by staff in the admin console.
  Manual,
  /// Placed by a shopper through checkout.
  Checkout,
  /// Recovered from the failover store after a primary outage.
  Failover,
}

impl OrderSource {
  pub fn as_str(self) -> &'static str {
    match self {
      OrderSource::Manual => "manual",
      OrderSource::Checkout => "checkout",
      OrderSource::Failover => "failover",
    }
  }
}

impl fmt::Display for OrderSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderSource {
  type Err = CoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "manual" => Ok(OrderSource::Manual),
      "checkout" => Ok(OrderSource::Checkout),
      "failover" => Ok(OrderSource::Failover),
      _ => Err(CoreError::InvalidSource(s.to_string())),
    }
  }
}

/// Which status changes the tracker accepts.
///
/// The check runs against the status read just before the write, not inside
/// it. Two concurrent updates can each pass against the same stale status,
/// and the later write wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
  /// Forward moves along Pending → Confirmed → Shipped → Delivered (skipping
  /// allowed), `Cancelled` from any non-terminal state, and same-status
  /// rewrites. Nothing leaves `Delivered` or `Cancelled`.
  #[default]
  Forward,
  /// Every change is accepted.
  Permissive,
}

impl TransitionPolicy {
  pub fn check(self, from: LifecycleStatus, to: LifecycleStatus) -> CoreResult<()> {
    if self == TransitionPolicy::Permissive || from == to {
      return Ok(());
    }
    let allowed = if from.is_terminal() {
      false
    } else if to == LifecycleStatus::Cancelled {
      true
    } else {
      matches!((from.rank(), to.rank()), (Some(f), Some(t)) if t > f)
    };
    if allowed {
      Ok(())
    } else {
      Err(CoreError::IllegalTransition { from, to })
    }
  }
}

impl FromStr for TransitionPolicy {
  type Err = CoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "forward" | "strict" => Ok(TransitionPolicy::Forward),
      "permissive" | "any" => Ok(TransitionPolicy::Permissive),
      other => Err(CoreError::Internal(format!("unknown transition policy '{}'", other))),
    }
  }
}
