use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request for user registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  /// User's display name
  #[validate(length(min = 3, max = 100, message = "Name must be between 3 and 100 characters"))]
  pub name: String,

  /// User's email address
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// User's password
  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub password: String,

  /// Confirmation that must match the password
  #[validate(must_match(other = "password", message = "Passwords do not match"))]
  pub password_confirmation: String,

  /// Optional avatar URL
  #[serde(default)]
  pub image_url: Option<String>,
}

/// Request for user login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  /// User's email address
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// User's password
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Request for a password reset link
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
  /// Email address the reset link should be sent to
  #[validate(email(message = "Invalid email format"))]
  pub email: String,
}

/// Request for completing a password reset
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
  /// The opaque reset token from the emailed link
  #[validate(length(min = 1, message = "Reset token is required"))]
  pub token: String,

  /// The new password
  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub password: String,
}

/// Request for changing the display name
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateNameRequest {
  /// The new display name
  #[validate(length(min = 3, max = 100, message = "Name must be between 3 and 100 characters"))]
  pub name: String,
}

/// Request for changing the password
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
  /// The current password, re-verified before the change
  #[validate(length(min = 1, message = "Current password is required"))]
  pub current_password: String,

  /// The new password
  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub new_password: String,
}

/// Public profile fields of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
  /// Unique identifier of the user
  pub id: Uuid,

  /// User's display name
  pub name: String,

  /// User's email address
  pub email: String,

  /// User's avatar URL, if set
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,

  /// Timestamp when the user account was created
  pub created_at: DateTime<Utc>,
}

/// Response after successful user registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
  /// The newly created user's public profile
  pub user: UserResponse,
}

/// Response after successful user login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
  /// Signed bearer token for subsequent requests
  pub access_token: String,

  /// Token expiration timestamp
  pub expires_at: DateTime<Utc>,

  /// The authenticated user's public profile
  pub user: UserResponse,
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  /// Success message
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information, keyed by field for validation
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}
