//! In-memory port implementations shared by the use case tests
//!
//! These stand in for the networked backends: a HashMap-backed user store
//! that enforces email uniqueness, a session registry with real TTL
//! bookkeeping and write-failure injection, a notifier that records what it
//! was asked to send, and a token generator pinned to a known value.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::auth::errors::{
  AuthError, NotifyError, RegistryError, RepositoryError,
};
use crate::domain::auth::ports::{
  PasswordHasher, ResetNotifier, ResetTokenGenerator, SessionRegistry, UserRepository,
};
use crate::domain::auth::value_objects::{Email, Name, UserId};
use crate::infrastructure::security::{Argon2PasswordHasher, JwtTokenProvider};

const TEST_JWT_SECRET: &str = "test-secret-key";

/// A hasher with the cheapest acceptable work factor, for fast tests
pub(crate) fn test_hasher() -> Arc<Argon2PasswordHasher> {
  Arc::new(Argon2PasswordHasher::with_params(1024, 1).unwrap())
}

/// A token provider with a fixed secret shared across test instances
pub(crate) fn test_token_provider() -> Arc<JwtTokenProvider> {
  Arc::new(JwtTokenProvider::new(TEST_JWT_SECRET))
}

/// Registers a user directly through the repository, bypassing the use case
pub(crate) async fn seed_user(
  repo: &Arc<InMemoryUserRepository>,
  name: &str,
  email: &str,
  password: &str,
) -> User {
  let password_hash = test_hasher().encrypt(password).await.unwrap();
  let user = User::new(
    Name::new(name).unwrap(),
    Email::new(email).unwrap(),
    password_hash,
    None,
  );
  repo.save(user).await.unwrap()
}

// ============================================================================
// InMemoryUserRepository
// ============================================================================

#[derive(Default)]
pub(crate) struct InMemoryUserRepository {
  users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
  pub(crate) fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn save(&self, user: User) -> Result<User, AuthError> {
    let mut users = self.users.lock().unwrap();

    // The store owns email uniqueness, like the real unique index does
    let duplicate = users
      .values()
      .any(|existing| existing.email == user.email && existing.id != user.id);
    if duplicate {
      return Err(AuthError::Repository(RepositoryError::DuplicateKey(
        format!("users_email_key: {}", user.email),
      )));
    }

    users.insert(user.id.into_inner(), user.clone());
    Ok(user)
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let users = self.users.lock().unwrap();
    Ok(users.values().find(|user| &user.email == email).cloned())
  }

  async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
    let users = self.users.lock().unwrap();
    Ok(users.get(id.as_uuid()).cloned())
  }

  async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, AuthError> {
    let users = self.users.lock().unwrap();
    Ok(
      users
        .values()
        .find(|user| user.password_reset_token.as_deref() == Some(token))
        .cloned(),
    )
  }
}

// ============================================================================
// InMemorySessionRegistry
// ============================================================================

#[derive(Default)]
pub(crate) struct InMemorySessionRegistry {
  entries: Mutex<HashMap<String, Instant>>,
  write_failure: AtomicBool,
  read_failure: AtomicBool,
}

impl InMemorySessionRegistry {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Makes every subsequent `add` fail, simulating a registry outage
  pub(crate) fn fail_writes(&self, fail: bool) {
    self.write_failure.store(fail, Ordering::SeqCst);
  }

  /// Makes every subsequent `exists` fail, simulating a registry outage
  pub(crate) fn fail_reads(&self, fail: bool) {
    self.read_failure.store(fail, Ordering::SeqCst);
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.entries.lock().unwrap().is_empty()
  }

  /// Force-expires a key, as if its TTL had lapsed
  pub(crate) fn expire(&self, key: &str) {
    let mut entries = self.entries.lock().unwrap();
    if let Some(deadline) = entries.get_mut(key) {
      *deadline = Instant::now();
    }
  }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
  async fn add(&self, key: &str, ttl: Duration) -> Result<(), RegistryError> {
    if self.write_failure.load(Ordering::SeqCst) {
      return Err(RegistryError::CommandFailed(
        "injected write failure".to_string(),
      ));
    }

    let mut entries = self.entries.lock().unwrap();
    entries.insert(key.to_string(), Instant::now() + ttl);
    Ok(())
  }

  async fn exists(&self, key: &str) -> Result<bool, RegistryError> {
    if self.read_failure.load(Ordering::SeqCst) {
      return Err(RegistryError::CommandFailed(
        "injected read failure".to_string(),
      ));
    }

    let entries = self.entries.lock().unwrap();
    Ok(
      entries
        .get(key)
        .is_some_and(|deadline| *deadline > Instant::now()),
    )
  }

  async fn del(&self, keys: &[String]) -> Result<(), RegistryError> {
    let mut entries = self.entries.lock().unwrap();
    for key in keys {
      entries.remove(key);
    }
    Ok(())
  }
}

// ============================================================================
// RecordingNotifier
// ============================================================================

#[derive(Default)]
pub(crate) struct RecordingNotifier {
  sent: Mutex<Vec<(String, String)>>,
  failure: AtomicBool,
}

impl RecordingNotifier {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Makes every subsequent send fail, simulating an SMTP outage
  pub(crate) fn fail(&self, fail: bool) {
    self.failure.store(fail, Ordering::SeqCst);
  }

  /// Returns the (email, token) pairs delivered so far
  pub(crate) fn sent(&self) -> Vec<(String, String)> {
    self.sent.lock().unwrap().clone()
  }
}

#[async_trait]
impl ResetNotifier for RecordingNotifier {
  async fn send_reset_password_email(
    &self,
    email: &Email,
    token: &str,
  ) -> Result<(), NotifyError> {
    if self.failure.load(Ordering::SeqCst) {
      return Err(NotifyError::Transport(
        "injected delivery failure".to_string(),
      ));
    }

    self
      .sent
      .lock()
      .unwrap()
      .push((email.as_str().to_string(), token.to_string()));
    Ok(())
  }
}

// ============================================================================
// FixedResetTokenGenerator
// ============================================================================

pub(crate) struct FixedResetTokenGenerator {
  token: String,
}

impl FixedResetTokenGenerator {
  pub(crate) fn new(token: &str) -> Self {
    Self {
      token: token.to_string(),
    }
  }
}

#[async_trait]
impl ResetTokenGenerator for FixedResetTokenGenerator {
  async fn generate(&self) -> Result<String, AuthError> {
    Ok(self.token.clone())
  }
}

// ============================================================================
// Full lifecycle scenarios
// ============================================================================

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::auth::{
    LoginUserCommand, LoginUserUseCase, LogoutUserUseCase, RegisterUserCommand,
    RegisterUserUseCase,
  };
  use crate::domain::auth::ports::TokenProvider;

  const TTL: Duration = Duration::from_secs(24 * 60 * 60);

  /// Register -> Login -> active session -> Logout -> authorization fails
  #[tokio::test]
  async fn test_full_credential_lifecycle() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let registry = Arc::new(InMemorySessionRegistry::new());
    let hasher = test_hasher();
    let token_provider = test_token_provider();

    let register = RegisterUserUseCase::new(repo.clone(), hasher.clone());
    let login = LoginUserUseCase::new(
      repo.clone(),
      hasher,
      token_provider.clone(),
      registry.clone(),
      TTL,
    );
    let logout = LogoutUserUseCase::new(registry.clone());

    register
      .execute(RegisterUserCommand {
        name: "Ana Silva".to_string(),
        email: "ana@example.com".to_string(),
        password: "Secret123!".to_string(),
        password_confirmation: "Secret123!".to_string(),
        image_url: None,
      })
      .await
      .unwrap();

    let response = login
      .execute(LoginUserCommand {
        email: "ana@example.com".to_string(),
        password: "Secret123!".to_string(),
      })
      .await
      .unwrap();

    // Authorization requires both a valid token and a registry entry
    assert!(token_provider.validate(&response.token).is_ok());
    assert!(registry.exists(&response.token).await.unwrap());

    logout.execute(response.token.clone()).await.unwrap();

    // The token is still cryptographically valid, but revocation wins
    assert!(token_provider.validate(&response.token).is_ok());
    assert!(!registry.exists(&response.token).await.unwrap());
  }

  /// TTL lapse has the same effect as an explicit logout
  #[tokio::test]
  async fn test_session_expiry_revokes_access() {
    let registry = Arc::new(InMemorySessionRegistry::new());
    registry.add("token-xyz", TTL).await.unwrap();
    assert!(registry.exists("token-xyz").await.unwrap());

    registry.expire("token-xyz");
    assert!(!registry.exists("token-xyz").await.unwrap());
  }

  /// Logging in again while a session is active is allowed
  #[tokio::test]
  async fn test_relogin_while_active_succeeds() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let registry = Arc::new(InMemorySessionRegistry::new());
    seed_user(&repo, "Ana Silva", "ana@example.com", "Secret123!").await;

    let login = LoginUserUseCase::new(
      repo,
      test_hasher(),
      test_token_provider(),
      registry.clone(),
      TTL,
    );
    let command = LoginUserCommand {
      email: "ana@example.com".to_string(),
      password: "Secret123!".to_string(),
    };

    let first = login.execute(command.clone()).await.unwrap();
    let second = login.execute(command).await.unwrap();

    assert!(registry.exists(&first.token).await.unwrap());
    assert!(registry.exists(&second.token).await.unwrap());
  }
}
