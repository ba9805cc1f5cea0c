// tests/order_action_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::ResponseError;
use common::*;
use serial_test::serial;
use storefront::config::AppConfig;
use storefront::errors::AppError;
use storefront::orders;
use storefront::services::mail::{MailPreference, OrderEmail, ProviderKind};
use storefront::store::OrderStore;
use storefront_core::{LifecycleStatus, NewOrder, OrderSource, TransitionPolicy};

#[tokio::test]
#[serial]
async fn create_without_status_defaults_to_pending() {
  setup_tracing();
  let harness = Harness::new();

  let result = orders::create_order_action(&harness.state, NewOrder::default(), OrderSource::Manual).await;
  assert!(result.success);
  let id = result.id.expect("created id");

  let order = harness.store.inner.get(&id).await.unwrap().unwrap();
  let doc = serde_json::to_value(&order).unwrap();
  assert_eq!(doc["status"], "Pending");
  assert_eq!(doc["orderStatus"], "Pending");
  assert_eq!(doc["source"], "manual");
  assert_eq!(harness.notifier.notified.lock().unwrap().as_slice(), [id.clone()]);
  assert_eq!(harness.invalidated(), vec!["/admin/orders".to_string()]);
}

#[tokio::test]
#[serial]
async fn notification_failure_does_not_fail_creation() {
  setup_tracing();
  let harness = HarnessBuilder {
    notifier: RecordingNotifier {
      failing: true,
      ..Default::default()
    },
    ..Default::default()
  }
  .build();

  let result =
    orders::create_order_action(&harness.state, new_order_with_email(None), OrderSource::Checkout).await;

  assert!(result.success);
  assert!(result.error.is_none());
  assert_eq!(harness.notifier.notified.lock().unwrap().len(), 1);
  assert_eq!(harness.store.inner.len().await, 1);
  // Later best-effort steps still ran.
  assert_eq!(harness.invalidated(), vec!["/admin/orders".to_string()]);
}

#[tokio::test]
#[serial]
async fn persistence_failure_returns_error_result_without_id() {
  setup_tracing();
  let harness = HarnessBuilder {
    store: CountingStore::failing(),
    ..Default::default()
  }
  .build();

  let result = orders::create_order_action(&harness.state, new_order_with_email(Some("a@b.io")), OrderSource::Manual).await;

  assert!(!result.success);
  assert!(result.id.is_none());
  assert_eq!(result.error.as_deref(), Some("database unavailable"));
  assert!(harness.notifier.notified.lock().unwrap().is_empty());
  assert_eq!(harness.resend.attempt_count(), 0);
  assert!(harness.invalidated().is_empty());
}

#[tokio::test]
#[serial]
async fn confirmation_email_falls_back_to_next_provider() {
  setup_tracing();
  let harness = HarnessBuilder {
    resend_failing: true,
    ..Default::default()
  }
  .build();

  let result =
    orders::create_order_action(&harness.state, new_order_with_email(Some("karim@example.com")), OrderSource::Checkout)
      .await;

  assert!(result.success);
  assert_eq!(harness.resend.attempt_count(), 1);
  assert_eq!(harness.emailjs.attempt_count(), 1);
  assert_eq!(harness.emailjs.attempts.lock().unwrap()[0], "karim@example.com");
}

#[tokio::test]
#[serial]
async fn orders_without_email_skip_the_mail_step() {
  setup_tracing();
  let harness = Harness::new();

  let result = orders::create_order_action(&harness.state, new_order_with_email(None), OrderSource::Checkout).await;

  assert!(result.success);
  assert_eq!(harness.resend.attempt_count(), 0);
  assert_eq!(harness.emailjs.attempt_count(), 0);
}

#[tokio::test]
#[serial]
async fn mail_preference_restricts_the_chain() {
  setup_tracing();
  let harness = HarnessBuilder {
    resend_failing: true,
    mail_preference: MailPreference::Only(ProviderKind::Resend),
    ..Default::default()
  }
  .build();
  let order = harness.seed("ORD-MAIL", LifecycleStatus::Confirmed, Some("x@y.io")).await;
  let email = OrderEmail::for_order(&order).unwrap();

  let err = harness.state.mailer.send(&email).await.unwrap_err();

  assert!(matches!(&err, AppError::Mail(msg) if msg.starts_with("All providers failed")));
  assert_eq!(harness.resend.attempt_count(), 1);
  assert_eq!(harness.emailjs.attempt_count(), 0);
}

#[tokio::test]
#[serial]
async fn status_update_writes_both_fields_and_emails_customer() {
  setup_tracing();
  let harness = Harness::new();
  harness.seed("ORD-1", LifecycleStatus::Confirmed, Some("buyer@example.com")).await;

  let result = orders::update_order_status_action(&harness.state, "ORD-1", "shipped").await;
  assert!(result.success);
  assert!(result.id.is_none());

  let order = harness.store.inner.get("ORD-1").await.unwrap().unwrap();
  assert_eq!(order.status, LifecycleStatus::Shipped);
  let doc = serde_json::to_value(&order).unwrap();
  assert_eq!(doc["status"], doc["orderStatus"]);
  assert_eq!(harness.resend.attempt_count(), 1);
  assert_eq!(
    harness.invalidated(),
    vec!["/admin/orders".to_string(), "/admin/orders?status=Shipped".to_string()]
  );
}

#[tokio::test]
#[serial]
async fn forward_policy_rejects_leaving_delivered() {
  setup_tracing();
  let harness = Harness::new();
  harness.seed("ORD-2", LifecycleStatus::Delivered, None).await;

  let err = orders::update_order_status(&harness.state, "ORD-2", "Pending").await.unwrap_err();
  assert_eq!(err.status_code(), StatusCode::CONFLICT);

  let result = orders::update_order_status_action(&harness.state, "ORD-2", "Pending").await;
  assert!(!result.success);
  assert!(result.error.unwrap().contains("Delivered"));
  let order = harness.store.inner.get("ORD-2").await.unwrap().unwrap();
  assert_eq!(order.status, LifecycleStatus::Delivered);
  assert!(harness.invalidated().is_empty());
}

#[tokio::test]
#[serial]
async fn permissive_policy_accepts_any_transition() {
  setup_tracing();
  let harness = HarnessBuilder {
    config: AppConfig {
      transitions: TransitionPolicy::Permissive,
      ..Default::default()
    },
    ..Default::default()
  }
  .build();
  harness.seed("ORD-3", LifecycleStatus::Delivered, None).await;

  let result = orders::update_order_status_action(&harness.state, "ORD-3", "Pending").await;
  assert!(result.success);
  let order = harness.store.inner.get("ORD-3").await.unwrap().unwrap();
  assert_eq!(order.status, LifecycleStatus::Pending);
}

#[tokio::test]
#[serial]
async fn unknown_order_and_bad_status_are_distinct_errors() {
  setup_tracing();
  let harness = Harness::new();
  harness.seed("ORD-4", LifecycleStatus::Pending, None).await;

  let missing = orders::update_order_status(&harness.state, "ORD-NOPE", "Confirmed").await.unwrap_err();
  assert!(matches!(missing, AppError::NotFound(_)));
  assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

  let bad = orders::update_order_status(&harness.state, "ORD-4", "Teleported").await.unwrap_err();
  assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn revalidation_failure_does_not_fail_update() {
  setup_tracing();
  let harness = HarnessBuilder {
    invalidator: RecordingInvalidator {
      failing: true,
      ..Default::default()
    },
    ..Default::default()
  }
  .build();
  harness.seed("ORD-5", LifecycleStatus::Pending, None).await;

  let result = orders::update_order_status_action(&harness.state, "ORD-5", "Cancelled").await;
  assert!(result.success);
  // Both views were attempted even though the first failed.
  assert_eq!(harness.invalidated().len(), 2);
}

#[tokio::test]
#[serial]
async fn failover_import_reports_each_order() {
  setup_tracing();
  let harness = Harness::new();
  let batch: Vec<NewOrder> = serde_json::from_value(serde_json::json!([
    { "invoiceNumber": "2001", "items": [{ "name": "Lungi", "quantity": 2, "unitPrice": 450 }] },
    { "status": "Lost in transit" },
    { "invoiceNumber": "2003", "source": "manual" }
  ]))
  .unwrap();

  let results = orders::import_failover_orders(&harness.state, batch).await;

  assert_eq!(results.len(), 3);
  assert!(results[0].success);
  assert!(!results[1].success);
  assert!(results[2].success);

  let first = harness.store.inner.get(results[0].id.as_deref().unwrap()).await.unwrap().unwrap();
  assert_eq!(first.source, OrderSource::Failover);
  let third = harness.store.inner.get(results[2].id.as_deref().unwrap()).await.unwrap().unwrap();
  assert_eq!(third.source, OrderSource::Manual);
  assert_eq!(
    harness.notifier.notified.lock().unwrap().as_slice(),
    ["MAN-2001".to_string(), "MAN-2003".to_string()]
  );
}
