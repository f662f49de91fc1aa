use chrono::Utc;
use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{PasswordHasher, UserRepository};
use crate::domain::auth::value_objects::Password;

/// Use case for completing a password reset
///
/// The lookup key is the opaque reset token itself. A token that matches no
/// user fails with `InvalidToken`; a matching token at or past its expiry
/// fails with `ExpiredToken`. On success the reset pair is cleared so the
/// token cannot be replayed.
pub struct ResetPasswordUseCase {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
}

impl ResetPasswordUseCase {
  /// Creates a new instance of ResetPasswordUseCase
  pub fn new(user_repo: Arc<dyn UserRepository>, password_hasher: Arc<dyn PasswordHasher>) -> Self {
    Self {
      user_repo,
      password_hasher,
    }
  }

  /// Executes the password reset use case
  pub async fn execute(&self, token: String, new_password: String) -> Result<(), AuthError> {
    let mut user = self
      .user_repo
      .find_by_reset_token(&token)
      .await?
      .ok_or(AuthError::InvalidToken)?;

    if user.password_reset_expired(Utc::now()) {
      return Err(AuthError::ExpiredToken);
    }

    let new_password = Password::new(new_password)?;
    let password_hash = self.password_hasher.encrypt(new_password.as_str()).await?;

    user.set_password_hash(password_hash);
    user.clear_password_reset_token();

    self.user_repo.save(user).await?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::auth::testing::{InMemoryUserRepository, seed_user, test_hasher};
  use crate::domain::auth::value_objects::Email;
  use chrono::Duration;

  fn use_case(repo: Arc<InMemoryUserRepository>) -> ResetPasswordUseCase {
    ResetPasswordUseCase::new(repo, test_hasher())
  }

  async fn seed_with_reset_token(
    repo: &Arc<InMemoryUserRepository>,
    token: &str,
    expires_at: chrono::DateTime<Utc>,
  ) {
    let mut user = seed_user(repo, "Ana Silva", "ana@example.com", "Secret123!").await;
    user.set_password_reset_token(token.to_string(), expires_at);
    repo.save(user).await.unwrap();
  }

  #[tokio::test]
  async fn test_unknown_token_is_invalid() {
    let repo = Arc::new(InMemoryUserRepository::new());

    let result = use_case(repo)
      .execute("no-such-token".to_string(), "NewSecret123!".to_string())
      .await;

    assert!(matches!(result, Err(AuthError::InvalidToken)));
  }

  #[tokio::test]
  async fn test_token_generated_61_minutes_ago_is_expired() {
    let repo = Arc::new(InMemoryUserRepository::new());
    // Issued 61 minutes ago with the standard 1 hour lifetime
    let expires_at = Utc::now() - Duration::minutes(61) + Duration::hours(1);
    seed_with_reset_token(&repo, "stale-token", expires_at).await;

    let result = use_case(repo)
      .execute("stale-token".to_string(), "NewSecret123!".to_string())
      .await;

    assert!(matches!(result, Err(AuthError::ExpiredToken)));
  }

  #[tokio::test]
  async fn test_expiry_boundary_is_exclusive() {
    let repo = Arc::new(InMemoryUserRepository::new());
    seed_with_reset_token(&repo, "boundary-token", Utc::now()).await;

    let result = use_case(repo)
      .execute("boundary-token".to_string(), "NewSecret123!".to_string())
      .await;

    assert!(matches!(result, Err(AuthError::ExpiredToken)));
  }

  #[tokio::test]
  async fn test_weak_new_password_is_rejected() {
    let repo = Arc::new(InMemoryUserRepository::new());
    seed_with_reset_token(&repo, "valid-token", Utc::now() + Duration::hours(1)).await;

    let result = use_case(repo)
      .execute("valid-token".to_string(), "short".to_string())
      .await;

    assert!(matches!(result, Err(AuthError::ValueObject(_))));
  }

  #[tokio::test]
  async fn test_success_replaces_hash_and_clears_token() {
    let repo = Arc::new(InMemoryUserRepository::new());
    seed_with_reset_token(&repo, "valid-token", Utc::now() + Duration::hours(1)).await;

    let email = Email::new("ana@example.com").unwrap();
    let old_hash = repo
      .find_by_email(&email)
      .await
      .unwrap()
      .unwrap()
      .password_hash;

    use_case(repo.clone())
      .execute("valid-token".to_string(), "NewSecret123!".to_string())
      .await
      .unwrap();

    let user = repo.find_by_email(&email).await.unwrap().unwrap();
    assert_ne!(user.password_hash, old_hash);
    assert!(user.password_reset_token.is_none());
    assert!(user.password_reset_expires.is_none());

    // The new password verifies against the stored hash
    assert!(
      test_hasher()
        .compare("NewSecret123!", &user.password_hash)
        .await
        .unwrap()
    );
  }
}
