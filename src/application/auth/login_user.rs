use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{Claims, PasswordHasher, SessionRegistry, TokenProvider, UserRepository};
use crate::domain::auth::value_objects::{Email, ImageUrl, UserId};

/// Command for logging in a user
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text)
  pub password: String,
}

/// Response after successful user login
#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  /// Unique identifier of the user
  pub user_id: UserId,
  /// User's display name
  pub name: String,
  /// User's email address
  pub email: String,
  /// User's avatar URL, if set
  pub image_url: Option<String>,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
  /// Signed bearer token for subsequent requests
  pub token: String,
  /// Token expiration timestamp
  pub expires_at: DateTime<Utc>,
}

/// Use case for logging in a user
///
/// An unknown email and a wrong password are indistinguishable to the
/// caller: both fail with `InvalidCredentials`. On success the token is
/// recorded as an active session with a TTL equal to its remaining
/// lifetime; if that write fails the login fails, because a token the
/// authorization check cannot find in the registry is useless.
pub struct LoginUserUseCase {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_provider: Arc<dyn TokenProvider>,
  session_registry: Arc<dyn SessionRegistry>,
  token_ttl: Duration,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_provider: Arc<dyn TokenProvider>,
    session_registry: Arc<dyn SessionRegistry>,
    token_ttl: Duration,
  ) -> Self {
    Self {
      user_repo,
      password_hasher,
      token_provider,
      session_registry,
      token_ttl,
    }
  }

  /// Executes the user login use case
  pub async fn execute(&self, command: LoginUserCommand) -> Result<LoginUserResponse, AuthError> {
    let email = Email::new(command.email)?;

    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    let matched = self
      .password_hasher
      .compare(&command.password, &user.password_hash)
      .await?;

    if !matched {
      return Err(AuthError::InvalidCredentials);
    }

    let expires_at = Utc::now() + chrono::Duration::seconds(self.token_ttl.as_secs() as i64);
    let claims = Claims::new(user.id, &user.email, expires_at);
    let token = self.token_provider.generate(&claims)?;

    // The session must be tracked before the token is handed out
    self.session_registry.add(&token, self.token_ttl).await?;

    Ok(LoginUserResponse {
      user_id: user.id,
      name: user.name.into_inner(),
      email: user.email.into_inner(),
      image_url: user.image_url.map(ImageUrl::into_inner),
      created_at: user.created_at,
      token,
      expires_at,
    })
  }
}
