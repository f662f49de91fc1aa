use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::SessionRegistry;

/// Use case for logging out a user
///
/// Removes the session entry for the presented token. Idempotent: logging
/// out a token that has no active session leaves the registry in the same
/// end state and is not an error.
pub struct LogoutUserUseCase {
  session_registry: Arc<dyn SessionRegistry>,
}

impl LogoutUserUseCase {
  /// Creates a new instance of LogoutUserUseCase
  pub fn new(session_registry: Arc<dyn SessionRegistry>) -> Self {
    Self { session_registry }
  }

  /// Executes the user logout use case
  pub async fn execute(&self, token: String) -> Result<(), AuthError> {
    self.session_registry.del(&[token]).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::auth::testing::InMemorySessionRegistry;
  use std::time::Duration;

  #[tokio::test]
  async fn test_logout_removes_active_session() {
    let registry = Arc::new(InMemorySessionRegistry::new());
    registry
      .add("token-abc", Duration::from_secs(3600))
      .await
      .unwrap();

    LogoutUserUseCase::new(registry.clone())
      .execute("token-abc".to_string())
      .await
      .unwrap();

    assert!(!registry.exists("token-abc").await.unwrap());
  }

  #[tokio::test]
  async fn test_logout_is_idempotent() {
    let registry = Arc::new(InMemorySessionRegistry::new());
    let use_case = LogoutUserUseCase::new(registry.clone());

    // Never logged in; both calls succeed with the same end state
    use_case.execute("token-missing".to_string()).await.unwrap();
    use_case.execute("token-missing".to_string()).await.unwrap();

    assert!(!registry.exists("token-missing").await.unwrap());
  }
}
