// storefront/src/web/middleware.rs

//! Actix middleware applying the access gate to every request.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::sync::Arc;
use storefront_core::{CookieValues, GateDecision, GatePolicy};
use tracing::{debug, warn};

/// Resolves the session from cookies and either forwards the request (with
/// the `Session` in its extensions) or answers with a 302 to the login page.
/// Denied requests never reach a handler. The policy decodes the path itself,
/// so `/%61dmin` is gated as `/admin`.
#[derive(Clone)]
pub struct AccessGate {
  policy: Arc<GatePolicy>,
}

impl AccessGate {
  pub fn new(policy: GatePolicy) -> Self {
    Self {
      policy: Arc::new(policy),
    }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AccessGateMiddleware<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AccessGateMiddleware {
      service,
      policy: self.policy.clone(),
    }))
  }
}

pub struct AccessGateMiddleware<S> {
  service: S,
  policy: Arc<GatePolicy>,
}

impl<S, B> Service<ServiceRequest> for AccessGateMiddleware<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let cookies = CookieValues::from_lookup(|name| req.cookie(name).map(|c| c.value().to_string()));

    match self.policy.decide(req.path(), &cookies) {
      GateDecision::Allow(session) => {
        if let Some(session) = session {
          debug!(path = %req.path(), role = session.role_label(), "Session attached to request.");
          req.extensions_mut().insert(session);
        }
        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
      }
      GateDecision::Redirect { location, reason } => {
        warn!(path = %req.path(), reason = %reason, "Access denied; redirecting to login.");
        let response = HttpResponse::Found()
          .insert_header((header::LOCATION, location))
          .finish()
          .map_into_right_body();
        let (request, _payload) = req.into_parts();
        Box::pin(async move { Ok(ServiceResponse::new(request, response)) })
      }
    }
  }
}
