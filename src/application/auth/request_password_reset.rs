use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{ResetNotifier, ResetTokenGenerator, UserRepository};
use crate::domain::auth::value_objects::Email;

/// Use case for requesting a password reset link
///
/// An unknown email succeeds with no observable difference from the known
/// case, so callers cannot probe which addresses have accounts. The token is
/// persisted before the notifier runs; a reset link is never emailed for
/// state that was not durably stored first.
pub struct RequestPasswordResetUseCase {
  user_repo: Arc<dyn UserRepository>,
  token_generator: Arc<dyn ResetTokenGenerator>,
  notifier: Arc<dyn ResetNotifier>,
  reset_ttl: Duration,
}

impl RequestPasswordResetUseCase {
  /// Creates a new instance of RequestPasswordResetUseCase
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    token_generator: Arc<dyn ResetTokenGenerator>,
    notifier: Arc<dyn ResetNotifier>,
    reset_ttl: Duration,
  ) -> Self {
    Self {
      user_repo,
      token_generator,
      notifier,
      reset_ttl,
    }
  }

  /// Executes the password reset request use case
  pub async fn execute(&self, email: String) -> Result<(), AuthError> {
    let email = Email::new(email)?;

    let mut user = match self.user_repo.find_by_email(&email).await? {
      Some(user) => user,
      // Deliberately silent: do not reveal whether the account exists
      None => return Ok(()),
    };

    let token = self.token_generator.generate().await?;
    let expires_at = Utc::now() + chrono::Duration::seconds(self.reset_ttl.as_secs() as i64);

    user.set_password_reset_token(token.clone(), expires_at);

    let user = self.user_repo.save(user).await?;

    self
      .notifier
      .send_reset_password_email(&user.email, &token)
      .await?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::auth::testing::{
    FixedResetTokenGenerator, InMemoryUserRepository, RecordingNotifier, seed_user,
  };
  use chrono::Duration as ChronoDuration;

  const RESET_TTL: Duration = Duration::from_secs(60 * 60);

  fn use_case(
    repo: Arc<InMemoryUserRepository>,
    notifier: Arc<RecordingNotifier>,
  ) -> RequestPasswordResetUseCase {
    RequestPasswordResetUseCase::new(
      repo,
      Arc::new(FixedResetTokenGenerator::new("fixed-reset-token")),
      notifier,
      RESET_TTL,
    )
  }

  #[tokio::test]
  async fn test_unknown_email_is_silent() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let result = use_case(repo, notifier.clone())
      .execute("nobody@example.com".to_string())
      .await;

    assert!(result.is_ok());
    assert!(notifier.sent().is_empty());
  }

  #[tokio::test]
  async fn test_known_email_persists_token_then_notifies() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    seed_user(&repo, "Ana Silva", "ana@example.com", "Secret123!").await;

    use_case(repo.clone(), notifier.clone())
      .execute("ana@example.com".to_string())
      .await
      .unwrap();

    let user = repo
      .find_by_email(&Email::new("ana@example.com").unwrap())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(user.password_reset_token.as_deref(), Some("fixed-reset-token"));

    let expires_at = user.password_reset_expires.unwrap();
    let expected = Utc::now() + ChronoDuration::hours(1);
    assert!((expires_at - expected).num_seconds().abs() < 5);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], ("ana@example.com".to_string(), "fixed-reset-token".to_string()));
  }

  #[tokio::test]
  async fn test_notifier_failure_is_surfaced() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    seed_user(&repo, "Ana Silva", "ana@example.com", "Secret123!").await;

    notifier.fail(true);

    let result = use_case(repo.clone(), notifier)
      .execute("ana@example.com".to_string())
      .await;

    assert!(matches!(result, Err(AuthError::Notification(_))));

    // The token was persisted before the delivery attempt
    let user = repo
      .find_by_email(&Email::new("ana@example.com").unwrap())
      .await
      .unwrap()
      .unwrap();
    assert!(user.password_reset_token.is_some());
  }
}
