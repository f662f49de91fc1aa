use actix_web::{
  Error, HttpMessage,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  error::ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::adapters::http::errors::{ApiError, AuthErrorKind};
use crate::domain::auth::errors::TokenError;
use crate::domain::auth::ports::{SessionRegistry, TokenProvider};
use crate::domain::auth::value_objects::UserId;

/// Identity attached to the request once authorization succeeds
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  /// The authenticated user's id, from the token's uid claim
  pub user_id: UserId,
  /// The authenticated user's email, from the token's subject
  pub email: String,
  /// The raw bearer token, needed by logout to drop the session entry
  pub token: String,
}

/// Authorization middleware for identity-scoped routes
///
/// A request is authenticated only when both checks pass: the session
/// registry reports the token as an active session, and the token itself
/// validates. An absent registry entry (logged out, or TTL lapsed) means
/// 401 even for a cryptographically valid token; a registry failure is a
/// 500, surfaced rather than treated as "not logged in".
pub struct AuthMiddleware {
  token_provider: Arc<dyn TokenProvider>,
  session_registry: Arc<dyn SessionRegistry>,
}

impl AuthMiddleware {
  /// Creates a new authorization middleware
  pub fn new(
    token_provider: Arc<dyn TokenProvider>,
    session_registry: Arc<dyn SessionRegistry>,
  ) -> Self {
    Self {
      token_provider,
      session_registry,
    }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      token_provider: self.token_provider.clone(),
      session_registry: self.session_registry.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  token_provider: Arc<dyn TokenProvider>,
  session_registry: Arc<dyn SessionRegistry>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let token_provider = self.token_provider.clone();
    let session_registry = self.session_registry.clone();

    Box::pin(async move {
      let token = match extract_bearer_token(&req) {
        Some(token) => token,
        None => {
          return Ok(reject(req, ApiError::Auth(AuthErrorKind::NotAuthenticated)));
        }
      };

      // Revocation is authoritative: no registry entry, no access
      match session_registry.exists(&token).await {
        Ok(true) => {}
        Ok(false) => {
          return Ok(reject(req, ApiError::Auth(AuthErrorKind::NotAuthenticated)));
        }
        Err(e) => {
          return Ok(reject(req, ApiError::Internal(e.to_string())));
        }
      }

      let claims = match token_provider.validate(&token) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
          return Ok(reject(req, ApiError::Auth(AuthErrorKind::ExpiredToken)));
        }
        Err(_) => {
          return Ok(reject(req, ApiError::Auth(AuthErrorKind::InvalidToken)));
        }
      };

      let user_id = match UserId::parse(&claims.user_id) {
        Ok(user_id) => user_id,
        Err(_) => {
          return Ok(reject(req, ApiError::Auth(AuthErrorKind::InvalidToken)));
        }
      };

      req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.subject,
        token,
      });

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .filter(|s| !s.is_empty())
    .map(|s| s.to_string())
}

/// Short-circuits the request with the mapped error response
fn reject<B>(req: ServiceRequest, error: ApiError) -> ServiceResponse<EitherBody<B>> {
  let (request, _) = req.into_parts();
  let response = error.error_response().map_into_right_body();
  ServiceResponse::new(request, response)
}
