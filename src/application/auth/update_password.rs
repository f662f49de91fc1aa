use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{PasswordHasher, UserRepository};
use crate::domain::auth::value_objects::{Password, UserId};

/// Use case for changing a user's password
///
/// The current password is re-verified even though the caller is already
/// authenticated, so a hijacked session cannot silently rotate the
/// credential. A new password equal to the current one fails with
/// `SamePassword`.
pub struct UpdatePasswordUseCase {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
}

impl UpdatePasswordUseCase {
  /// Creates a new instance of UpdatePasswordUseCase
  pub fn new(user_repo: Arc<dyn UserRepository>, password_hasher: Arc<dyn PasswordHasher>) -> Self {
    Self {
      user_repo,
      password_hasher,
    }
  }

  /// Executes the password change use case
  pub async fn execute(
    &self,
    user_id: UserId,
    current_password: String,
    new_password: String,
  ) -> Result<(), AuthError> {
    let mut user = self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    let matched = self
      .password_hasher
      .compare(&current_password, &user.password_hash)
      .await?;
    if !matched {
      return Err(AuthError::InvalidCredentials);
    }

    let new_password = Password::new(new_password)?;

    let same = self
      .password_hasher
      .compare(new_password.as_str(), &user.password_hash)
      .await?;
    if same {
      return Err(AuthError::SamePassword);
    }

    let password_hash = self.password_hasher.encrypt(new_password.as_str()).await?;
    user.set_password_hash(password_hash);

    self.user_repo.save(user).await?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::auth::testing::{InMemoryUserRepository, seed_user, test_hasher};
  use crate::domain::auth::value_objects::Email;

  fn use_case(repo: Arc<InMemoryUserRepository>) -> UpdatePasswordUseCase {
    UpdatePasswordUseCase::new(repo, test_hasher())
  }

  #[tokio::test]
  async fn test_unknown_user() {
    let repo = Arc::new(InMemoryUserRepository::new());

    let result = use_case(repo)
      .execute(
        UserId::new(),
        "Secret123!".to_string(),
        "NewSecret123!".to_string(),
      )
      .await;

    assert!(matches!(result, Err(AuthError::UserNotFound)));
  }

  #[tokio::test]
  async fn test_wrong_current_password() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let user = seed_user(&repo, "Ana Silva", "ana@example.com", "Secret123!").await;

    let result = use_case(repo)
      .execute(
        user.id,
        "WrongPass1!".to_string(),
        "NewSecret123!".to_string(),
      )
      .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
  }

  #[tokio::test]
  async fn test_same_new_password_is_rejected() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let user = seed_user(&repo, "Ana Silva", "ana@example.com", "Secret123!").await;

    let result = use_case(repo)
      .execute(
        user.id,
        "Secret123!".to_string(),
        "Secret123!".to_string(),
      )
      .await;

    assert!(matches!(result, Err(AuthError::SamePassword)));
  }

  #[tokio::test]
  async fn test_password_change_persists() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let user = seed_user(&repo, "Ana Silva", "ana@example.com", "Secret123!").await;

    use_case(repo.clone())
      .execute(
        user.id,
        "Secret123!".to_string(),
        "NewSecret123!".to_string(),
      )
      .await
      .unwrap();

    let stored = repo
      .find_by_email(&Email::new("ana@example.com").unwrap())
      .await
      .unwrap()
      .unwrap();

    let hasher = test_hasher();
    assert!(
      hasher
        .compare("NewSecret123!", &stored.password_hash)
        .await
        .unwrap()
    );
    assert!(
      !hasher
        .compare("Secret123!", &stored.password_hash)
        .await
        .unwrap()
    );
  }
}
