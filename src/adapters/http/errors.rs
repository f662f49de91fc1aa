use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::auth::errors::{AuthError, RepositoryError, TokenError, ValidationErrors};

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Validation error (400 Bad Request), optionally with per-field details
  Validation(String, Option<serde_json::Value>),

  /// Authentication/authorization error
  Auth(AuthErrorKind),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Serialize)]
pub enum AuthErrorKind {
  /// Invalid credentials (401)
  InvalidCredentials,

  /// Missing bearer token or no active session (401)
  NotAuthenticated,

  /// Invalid bearer or reset token (401)
  InvalidToken,

  /// Expired bearer or reset token (401)
  ExpiredToken,

  /// Email already registered (409)
  UserExists,

  /// User not found (404)
  UserNotFound,
}

impl ApiError {
  /// Builds a validation error carrying the field-keyed violation map
  pub fn from_validation_errors(errors: &ValidationErrors) -> Self {
    let details: serde_json::Map<String, serde_json::Value> = errors
      .iter()
      .map(|(field, messages)| {
        (
          field.to_string(),
          serde_json::Value::from(messages.to_vec()),
        )
      })
      .collect();

    ApiError::Validation(errors.to_string(), Some(serde_json::Value::Object(details)))
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg, _) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_, _) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthErrorKind::NotAuthenticated => StatusCode::UNAUTHORIZED,
        AuthErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
        AuthErrorKind::ExpiredToken => StatusCode::UNAUTHORIZED,
        AuthErrorKind::UserExists => StatusCode::CONFLICT,
        AuthErrorKind::UserNotFound => StatusCode::NOT_FOUND,
      },
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message, details) = match self {
      ApiError::Validation(msg, details) => ("validation_error", msg.clone(), details.clone()),
      ApiError::Auth(kind) => {
        let (err_type, msg) = match kind {
          AuthErrorKind::InvalidCredentials => (
            "invalid_credentials",
            "Invalid email or password".to_string(),
          ),
          AuthErrorKind::NotAuthenticated => (
            "not_authenticated",
            "Missing or revoked authorization token".to_string(),
          ),
          AuthErrorKind::InvalidToken => ("invalid_token", "Invalid token".to_string()),
          AuthErrorKind::ExpiredToken => ("expired_token", "Token has expired".to_string()),
          AuthErrorKind::UserExists => (
            "user_exists",
            "An account with this email already exists".to_string(),
          ),
          AuthErrorKind::UserNotFound => ("user_not_found", "User not found".to_string()),
        };
        (err_type, msg, None)
      }
      ApiError::Internal(msg) => {
        // Never echo internals to the client
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
          None,
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::Validation(errors) => ApiError::from_validation_errors(&errors),
      AuthError::UserExists => ApiError::Auth(AuthErrorKind::UserExists),
      AuthError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::InvalidToken => ApiError::Auth(AuthErrorKind::InvalidToken),
      AuthError::ExpiredToken => ApiError::Auth(AuthErrorKind::ExpiredToken),
      AuthError::SamePassword | AuthError::NameUnchanged => {
        // Client bugs, reported as plain 400s
        ApiError::Validation(error.to_string(), None)
      }
      AuthError::UserNotFound => ApiError::Auth(AuthErrorKind::UserNotFound),
      AuthError::ValueObject(e) => ApiError::Validation(e.to_string(), None),
      AuthError::Token(e) => match e {
        TokenError::Expired => ApiError::Auth(AuthErrorKind::ExpiredToken),
        TokenError::Signing(_) | TokenError::InvalidClaims(_) => ApiError::Internal(e.to_string()),
        _ => ApiError::Auth(AuthErrorKind::InvalidToken),
      },
      AuthError::Repository(e) => match e {
        RepositoryError::NotFound => ApiError::Auth(AuthErrorKind::UserNotFound),
        RepositoryError::DuplicateKey(_) => ApiError::Auth(AuthErrorKind::UserExists),
        _ => ApiError::Internal(e.to_string()),
      },
      AuthError::Registry(e) => ApiError::Internal(e.to_string()),
      AuthError::Hash(e) => ApiError::Internal(e.to_string()),
      AuthError::Notification(e) => ApiError::Internal(e.to_string()),
    }
  }
}

/// Convert validation errors from the validator crate, keeping field keys
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let details: serde_json::Map<String, serde_json::Value> = errors
      .field_errors()
      .iter()
      .map(|(field, errors)| {
        let messages: Vec<String> = errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect();
        (field.to_string(), serde_json::Value::from(messages))
      })
      .collect();

    let message: Vec<String> = details.keys().map(|field| format!("invalid {}", field)).collect();

    ApiError::Validation(
      message.join(", "),
      Some(serde_json::Value::Object(details)),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string(), None).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidCredentials).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::UserExists).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::UserNotFound).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_auth_error_conversion() {
    let api_error: ApiError = AuthError::InvalidCredentials.into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);

    let api_error: ApiError = AuthError::UserExists.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = AuthError::ExpiredToken.into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);

    let api_error: ApiError = AuthError::SamePassword.into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError = AuthError::NameUnchanged.into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn test_domain_validation_errors_keep_field_keys() {
    let mut errors = ValidationErrors::new();
    errors.add("email", "invalid format");
    errors.add("name", "too short");

    let api_error = ApiError::from_validation_errors(&errors);
    match api_error {
      ApiError::Validation(_, Some(details)) => {
        let object = details.as_object().unwrap();
        assert!(object.contains_key("email"));
        assert!(object.contains_key("name"));
      }
      other => panic!("expected validation details, got {:?}", other),
    }
  }

  #[test]
  fn test_login_failures_share_one_external_message() {
    // Unknown email and wrong password both surface as InvalidCredentials,
    // so the response body is identical for both
    let unknown: ApiError = AuthError::InvalidCredentials.into();
    let mismatch: ApiError = AuthError::InvalidCredentials.into();

    assert_eq!(
      unknown.error_response().status(),
      mismatch.error_response().status()
    );
  }
}
