use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entities::User;
use super::errors::{AuthError, NotifyError, RegistryError, TokenError};
use super::value_objects::{Email, PasswordHash, UserId};

/// Claims carried by a bearer token
///
/// Ephemeral: built at issuance, recovered at validation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
  /// The user's identifier, as a string
  pub user_id: String,
  /// The user's email at issuance time
  pub subject: String,
  /// Absolute expiry; the token is invalid at and after this instant
  pub expires_at: DateTime<Utc>,
}

impl Claims {
  /// Builds claims for a user with the given expiry
  pub fn new(user_id: UserId, subject: &Email, expires_at: DateTime<Utc>) -> Self {
    Self {
      user_id: user_id.to_string(),
      subject: subject.as_str().to_string(),
      expires_at,
    }
  }
}

/// Repository trait for user persistence operations
///
/// The backing store must enforce email uniqueness; the use cases only
/// pre-check it for friendlier errors.
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates or updates a user
  async fn save(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthError>;

  /// Finds a user by their active password reset token
  async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password; fails on empty input
  async fn encrypt(&self, plaintext: &str) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a stored hash
  ///
  /// A genuine mismatch is `Ok(false)`; an error means the stored hash is
  /// malformed or the algorithm failed.
  async fn compare(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, AuthError>;
}

/// Service trait for signed bearer token issuance and validation
///
/// Pure CPU work, so the trait is synchronous.
pub trait TokenProvider: Send + Sync {
  /// Mints a signed token from the given claims
  fn generate(&self, claims: &Claims) -> Result<String, TokenError>;

  /// Checks a token's structure, signature, expiry, and required claims
  fn validate(&self, token: &str) -> Result<Claims, TokenError>;
}

/// Registry of currently-active sessions, keyed by the issued token
///
/// Presence means the session grants access; entries self-expire via TTL.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
  /// Records a key as active for the given time-to-live
  async fn add(&self, key: &str, ttl: std::time::Duration) -> Result<(), RegistryError>;

  /// Reports whether a key is currently present
  async fn exists(&self, key: &str) -> Result<bool, RegistryError>;

  /// Removes keys; removing an absent key is not an error
  async fn del(&self, keys: &[String]) -> Result<(), RegistryError>;
}

/// Outbound notifier for password reset links
#[async_trait]
pub trait ResetNotifier: Send + Sync {
  /// Delivers a reset link containing the token to the given address
  async fn send_reset_password_email(&self, email: &Email, token: &str)
  -> Result<(), NotifyError>;
}

/// Strategy for generating opaque reset tokens
///
/// Injectable so tests can pin the token while production uses the OS RNG.
#[async_trait]
pub trait ResetTokenGenerator: Send + Sync {
  /// Generates a URL-safe random token with at least 256 bits of entropy
  async fn generate(&self) -> Result<String, AuthError>;
}
