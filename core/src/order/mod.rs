//! Order records, status enums, and the lifecycle transition rules.

pub mod model;
pub mod result;
pub mod status;

pub use model::{
  generate_order_id, Customer, LineItem, NewOrder, Order, OrderDocument, Payment, StatusChange, Totals,
};
pub use result::ActionResult;
pub use status::{LifecycleStatus, OrderSource, PaymentStatus, TransitionPolicy};
