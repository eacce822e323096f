use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{CurrentUserResponse, LoginRequest, RegisterRequest, SessionResponse, SuccessResponse},
  errors::{ApiError, AuthErrorKind},
};
use crate::application::auth::{
  GetCurrentUserUseCase, LoginUserCommand, LoginUserUseCase, LogoutUserUseCase,
  RegisterUserCommand, RegisterUserUseCase,
};

/// Extract session token from Authorization header
fn extract_session_token(req: &HttpRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.trim().to_string())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

/// Extract IP address from the request
fn extract_ip_address(req: &HttpRequest) -> Option<std::net::IpAddr> {
  let addr = req.connection_info().realip_remote_addr()?.to_string();
  addr
    .parse()
    .ok()
    .or_else(|| addr.parse::<std::net::SocketAddr>().ok().map(|s| s.ip()))
}

fn extract_user_agent(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get("User-Agent")
    .and_then(|h| h.to_str().ok())
    .map(|s| s.to_string())
}

/// POST /api/v1/auth/register
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let response = use_case
    .execute(RegisterUserCommand {
      bin_number: request.bin_number,
      email: request.email,
      password: request.password,
    })
    .await?;

  Ok(HttpResponse::Created().json(SessionResponse {
    user_id: response.user_id,
    bin_number: response.bin_number,
    email: response.email,
    is_staff: response.is_staff,
    session_token: response.session_token,
    expires_at: response.expires_at,
  }))
}

/// POST /api/v1/auth/login
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let ip_address = extract_ip_address(&http_req);
  let user_agent = extract_user_agent(&http_req);

  let request = request.into_inner();
  let response = use_case
    .execute(
      LoginUserCommand {
        bin_number: request.bin_number,
        password: request.password,
      },
      ip_address,
      user_agent,
    )
    .await?;

  Ok(HttpResponse::Ok().json(SessionResponse {
    user_id: response.user_id,
    bin_number: response.bin_number,
    email: response.email,
    is_staff: response.is_staff,
    session_token: response.session_token,
    expires_at: response.expires_at,
  }))
}

/// POST /api/v1/auth/logout
pub async fn logout_handler(
  use_case: web::Data<Arc<LogoutUserUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let session_token = extract_session_token(&http_req)?;
  use_case.execute(session_token).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Successfully logged out".to_string(),
  }))
}

/// GET /api/v1/auth/me
pub async fn get_current_user_handler(
  use_case: web::Data<Arc<GetCurrentUserUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let session_token = extract_session_token(&http_req)?;
  let response = use_case.execute(session_token).await?;

  Ok(HttpResponse::Ok().json(CurrentUserResponse {
    user_id: response.user_id,
    bin_number: response.bin_number,
    email: response.email,
    is_verified: response.is_verified,
    is_staff: response.is_staff,
    created_at: response.created_at,
  }))
}
