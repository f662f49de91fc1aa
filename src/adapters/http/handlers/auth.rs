use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    ResetPasswordRequest, SuccessResponse, UpdateNameRequest, UpdatePasswordRequest, UserResponse,
  },
  errors::ApiError,
  middleware::AuthenticatedUser,
};
use crate::application::auth::{
  LoginUserCommand, LoginUserUseCase, LogoutUserUseCase, RegisterUserCommand, RegisterUserUseCase,
  RequestPasswordResetUseCase, ResetPasswordUseCase, UpdateNameUseCase, UpdatePasswordUseCase,
};

/// Handler for user registration
///
/// POST /api/auth/register
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = RegisterUserCommand {
    name: request.name.clone(),
    email: request.email.clone(),
    password: request.password.clone(),
    password_confirmation: request.password_confirmation.clone(),
    image_url: request.image_url.clone(),
  };

  let response = use_case.execute(command).await?;

  let api_response = RegisterResponse {
    user: UserResponse {
      id: response.user_id.into_inner(),
      name: response.name,
      email: response.email,
      image_url: response.image_url,
      created_at: response.created_at,
    },
  };

  Ok(HttpResponse::Created().json(api_response))
}

/// Handler for user login
///
/// POST /api/auth/login
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = LoginUserCommand {
    email: request.email.clone(),
    password: request.password.clone(),
  };

  let response = use_case.execute(command).await?;

  let api_response = LoginResponse {
    access_token: response.token,
    expires_at: response.expires_at,
    user: UserResponse {
      id: response.user_id.into_inner(),
      name: response.name,
      email: response.email,
      image_url: response.image_url,
      created_at: response.created_at,
    },
  };

  Ok(HttpResponse::Ok().json(api_response))
}

/// Handler for user logout
///
/// POST /api/auth/logout (authorized)
pub async fn logout_handler(
  user: web::ReqData<AuthenticatedUser>,
  use_case: web::Data<Arc<LogoutUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case.execute(user.token.clone()).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Logged out".to_string(),
  }))
}

/// Handler for requesting a password reset link
///
/// POST /api/auth/forgot-password
///
/// The response is the same whether or not the email has an account.
pub async fn forgot_password_handler(
  request: web::Json<ForgotPasswordRequest>,
  use_case: web::Data<Arc<RequestPasswordResetUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  use_case.execute(request.email.clone()).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "If the email is registered, a reset link has been sent".to_string(),
  }))
}

/// Handler for completing a password reset
///
/// POST /api/auth/reset-password
pub async fn reset_password_handler(
  request: web::Json<ResetPasswordRequest>,
  use_case: web::Data<Arc<ResetPasswordUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  use_case
    .execute(request.token.clone(), request.password.clone())
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Password has been reset".to_string(),
  }))
}

/// Handler for changing the display name
///
/// PUT /api/auth/name (authorized)
pub async fn update_name_handler(
  request: web::Json<UpdateNameRequest>,
  user: web::ReqData<AuthenticatedUser>,
  use_case: web::Data<Arc<UpdateNameUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  use_case
    .execute(user.user_id, request.name.clone())
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Name updated".to_string(),
  }))
}

/// Handler for changing the password
///
/// PUT /api/auth/password (authorized)
pub async fn update_password_handler(
  request: web::Json<UpdatePasswordRequest>,
  user: web::ReqData<AuthenticatedUser>,
  use_case: web::Data<Arc<UpdatePasswordUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  use_case
    .execute(
      user.user_id,
      request.current_password.clone(),
      request.new_password.clone(),
    )
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Password updated".to_string(),
  }))
}
