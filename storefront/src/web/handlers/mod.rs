// storefront/src/web/handlers/mod.rs

pub mod delivery_handlers;
pub mod order_handlers;

use actix_web::web;
use storefront_core::Session;

/// Role label of the gate-resolved session, for log fields.
pub(crate) fn actor(session: &Option<web::ReqData<Session>>) -> &'static str {
  session.as_ref().map(|s| s.role_label()).unwrap_or("anonymous")
}
