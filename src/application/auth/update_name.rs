use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::UserRepository;
use crate::domain::auth::value_objects::{Name, UserId};

/// Use case for changing a user's display name
///
/// A rename to the current name fails with `NameUnchanged`: a client that
/// submits a no-op rename is buggy, and persisting it would hide that.
pub struct UpdateNameUseCase {
  user_repo: Arc<dyn UserRepository>,
}

impl UpdateNameUseCase {
  /// Creates a new instance of UpdateNameUseCase
  pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
    Self { user_repo }
  }

  /// Executes the name change use case
  pub async fn execute(&self, user_id: UserId, new_name: String) -> Result<(), AuthError> {
    let mut user = self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    let new_name = Name::new(new_name)?;

    if new_name == user.name {
      return Err(AuthError::NameUnchanged);
    }

    user.set_name(new_name);
    self.user_repo.save(user).await?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::auth::testing::{InMemoryUserRepository, seed_user};
  use crate::domain::auth::value_objects::Email;

  #[tokio::test]
  async fn test_unknown_user() {
    let repo = Arc::new(InMemoryUserRepository::new());

    let result = UpdateNameUseCase::new(repo)
      .execute(UserId::new(), "Ana Souza".to_string())
      .await;

    assert!(matches!(result, Err(AuthError::UserNotFound)));
  }

  #[tokio::test]
  async fn test_invalid_name() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let user = seed_user(&repo, "Ana Silva", "ana@example.com", "Secret123!").await;

    let result = UpdateNameUseCase::new(repo)
      .execute(user.id, "Jo".to_string())
      .await;

    assert!(matches!(result, Err(AuthError::ValueObject(_))));
  }

  #[tokio::test]
  async fn test_noop_rename_is_rejected() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let user = seed_user(&repo, "Ana Silva", "ana@example.com", "Secret123!").await;

    let result = UpdateNameUseCase::new(repo)
      .execute(user.id, "Ana Silva".to_string())
      .await;

    assert!(matches!(result, Err(AuthError::NameUnchanged)));
  }

  #[tokio::test]
  async fn test_rename_persists() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let user = seed_user(&repo, "Ana Silva", "ana@example.com", "Secret123!").await;

    UpdateNameUseCase::new(repo.clone())
      .execute(user.id, "Ana Souza".to_string())
      .await
      .unwrap();

    let stored = repo
      .find_by_email(&Email::new("ana@example.com").unwrap())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(stored.name.as_str(), "Ana Souza");
  }
}
