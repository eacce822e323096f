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

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  domain::auth::{AuthService, SessionToken, User},
};

/// Resolves the bearer token to a user and attaches it to the request
///
/// Requests without a valid `Authorization: Bearer <token>` header are
/// answered with 401 before reaching the handler.
pub struct AuthMiddleware {
  auth_service: Arc<AuthService>,
}

impl AuthMiddleware {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
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
      auth_service: self.auth_service.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  auth_service: Arc<AuthService>,
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
    let auth_service = self.auth_service.clone();

    Box::pin(async move {
      let user = match authenticate(&req, &auth_service).await {
        Ok(user) => user,
        Err(e) => {
          let (request, _) = req.into_parts();
          let response = e.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      req.extensions_mut().insert(user);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

async fn authenticate(req: &ServiceRequest, auth_service: &AuthService) -> Result<User, ApiError> {
  let raw = extract_session_token(req)?;
  let token =
    SessionToken::from_string(raw).map_err(|_| ApiError::Auth(AuthErrorKind::InvalidToken))?;
  Ok(auth_service.validate_session(token).await?)
}

/// Extract session token from Authorization header
fn extract_session_token(req: &ServiceRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

/// Extension trait to pull the authenticated user out of a request
pub trait AuthUser {
  /// The user attached by `AuthMiddleware`, or 401 when the route is not wrapped
  fn authenticated_user(&self) -> Result<User, ApiError>;
}

impl AuthUser for actix_web::HttpRequest {
  fn authenticated_user(&self) -> Result<User, ApiError> {
    let user = self.extensions().get::<User>().cloned();
    if user.is_none() {
      tracing::warn!(path = %self.path(), "No authenticated user on request");
    }
    user.ok_or(ApiError::Auth(AuthErrorKind::InvalidSession))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::{AuthServiceConfig, Bin, Email, Password};
  use crate::test_support::{InMemoryAuthStore, fast_hasher};
  use actix_web::{
    App, HttpRequest, HttpResponse,
    http::StatusCode,
    test::{self, TestRequest},
    web,
  };

  #[test]
  fn test_extract_session_token() {
    let req = TestRequest::default()
      .insert_header(("Authorization", "Bearer test_token_123"))
      .to_srv_request();
    assert_eq!(extract_session_token(&req).unwrap(), "test_token_123");

    let req = TestRequest::default().to_srv_request();
    assert!(extract_session_token(&req).is_err());

    let req = TestRequest::default()
      .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
      .to_srv_request();
    assert!(extract_session_token(&req).is_err());
  }

  async fn whoami(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let user = req.authenticated_user()?;
    Ok(HttpResponse::Ok().body(user.bin_number))
  }

  #[actix_web::test]
  async fn test_middleware_attaches_user() {
    let store = InMemoryAuthStore::default();
    let auth = Arc::new(AuthService::new(
      Arc::new(store.clone()),
      Arc::new(store),
      Arc::new(fast_hasher()),
      AuthServiceConfig::default(),
    ));
    let (_, _, token) = auth
      .register(
        Bin::new("940140000385").unwrap(),
        Email::new("shop@example.kz".to_string()).unwrap(),
        Password::new("long enough".to_string()).unwrap(),
      )
      .await
      .unwrap();

    let app = test::init_service(
      App::new()
        .wrap(AuthMiddleware::new(auth))
        .route("/me", web::get().to(whoami)),
    )
    .await;

    let req = TestRequest::get()
      .uri("/me")
      .insert_header(("Authorization", format!("Bearer {}", token.as_str())))
      .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "940140000385");

    let req = TestRequest::get().uri("/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::get()
      .uri("/me")
      .insert_header(("Authorization", format!("Bearer {}", "ab".repeat(32))))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }
}
