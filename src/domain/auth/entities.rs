use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{Email, ImageUrl, Name, PasswordHash, UserId};

/// User aggregate root
///
/// Constructed only from validated value objects, so an instance can never
/// hold a malformed email, name, or hash. The password-reset pair is kept in
/// sync by the mutators: either both are set or both are absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: UserId,
  /// User's display name
  pub name: Name,
  /// User's email address (unique across all users)
  pub email: Email,
  /// Hashed password, produced only by the password hasher
  pub password_hash: PasswordHash,
  /// Optional avatar URL
  pub image_url: Option<ImageUrl>,
  /// Timestamp when the user was created, set once
  pub created_at: DateTime<Utc>,
  /// Active password reset token, if a reset was requested
  pub password_reset_token: Option<String>,
  /// Expiration time for the password reset token
  pub password_reset_expires: Option<DateTime<Utc>>,
}

impl User {
  /// Creates a new user with the given validated details
  pub fn new(
    name: Name,
    email: Email,
    password_hash: PasswordHash,
    image_url: Option<ImageUrl>,
  ) -> Self {
    Self {
      id: UserId::new(),
      name,
      email,
      password_hash,
      image_url,
      created_at: Utc::now(),
      password_reset_token: None,
      password_reset_expires: None,
    }
  }

  /// Reconstructs a user from persisted fields
  pub fn from_db(
    id: UserId,
    name: Name,
    email: Email,
    password_hash: PasswordHash,
    image_url: Option<ImageUrl>,
    created_at: DateTime<Utc>,
    password_reset_token: Option<String>,
    password_reset_expires: Option<DateTime<Utc>>,
  ) -> Self {
    Self {
      id,
      name,
      email,
      password_hash,
      image_url,
      created_at,
      password_reset_token,
      password_reset_expires,
    }
  }

  /// Replaces the user's display name
  pub fn set_name(&mut self, name: Name) {
    self.name = name;
  }

  /// Replaces the user's password hash
  pub fn set_password_hash(&mut self, password_hash: PasswordHash) {
    self.password_hash = password_hash;
  }

  /// Arms the password reset pair with a token and its expiration
  pub fn set_password_reset_token(&mut self, token: String, expires_at: DateTime<Utc>) {
    self.password_reset_token = Some(token);
    self.password_reset_expires = Some(expires_at);
  }

  /// Clears the password reset pair
  pub fn clear_password_reset_token(&mut self) {
    self.password_reset_token = None;
    self.password_reset_expires = None;
  }

  /// True when a reset token is set but its expiry instant has been reached
  ///
  /// The boundary is exclusive: a token whose expiry equals `now` is already
  /// expired.
  pub fn password_reset_expired(&self, now: DateTime<Utc>) -> bool {
    match self.password_reset_expires {
      Some(expires_at) => expires_at <= now,
      None => true,
    }
  }

  /// Returns the reset token when one is set and still valid at `now`
  pub fn valid_reset_token(&self, now: DateTime<Utc>) -> Option<&str> {
    match (&self.password_reset_token, self.password_reset_expires) {
      (Some(token), Some(expires_at)) if now < expires_at => Some(token.as_str()),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn test_user() -> User {
    User::new(
      Name::new("Ana Silva").unwrap(),
      Email::new("ana@example.com").unwrap(),
      PasswordHash::from_hash(test_hash()).unwrap(),
      None,
    )
  }

  fn test_hash() -> String {
    // Hashing in entity tests would drag in the work factor; a syntactically
    // valid PHC string is enough here.
    use argon2::password_hash::{PasswordHasher, SaltString};
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    argon2::Argon2::default()
      .hash_password(b"Secret123!", &salt)
      .unwrap()
      .to_string()
  }

  #[test]
  fn test_user_creation() {
    let user = test_user();

    assert_eq!(user.email.as_str(), "ana@example.com");
    assert_eq!(user.name.as_str(), "Ana Silva");
    assert!(user.image_url.is_none());
    assert!(user.password_reset_token.is_none());
    assert!(user.password_reset_expires.is_none());
  }

  #[test]
  fn test_reset_token_lifecycle() {
    let mut user = test_user();
    let expires_at = Utc::now() + Duration::hours(1);

    user.set_password_reset_token("reset-token".to_string(), expires_at);
    assert_eq!(user.valid_reset_token(Utc::now()), Some("reset-token"));
    assert!(!user.password_reset_expired(Utc::now()));

    user.clear_password_reset_token();
    assert!(user.password_reset_token.is_none());
    assert!(user.password_reset_expires.is_none());
    assert!(user.valid_reset_token(Utc::now()).is_none());
  }

  #[test]
  fn test_reset_token_expired_after_one_hour() {
    let mut user = test_user();
    let now = Utc::now();

    // Token generated 61 minutes ago with a 1 hour lifetime
    user.set_password_reset_token(
      "stale-token".to_string(),
      now - Duration::minutes(61) + Duration::hours(1),
    );

    assert!(user.password_reset_expired(now));
    assert!(user.valid_reset_token(now).is_none());
  }

  #[test]
  fn test_reset_token_expiry_boundary_is_exclusive() {
    let mut user = test_user();
    let now = Utc::now();

    user.set_password_reset_token("boundary-token".to_string(), now);

    // The expiry instant itself counts as expired
    assert!(user.password_reset_expired(now));
    assert!(user.valid_reset_token(now).is_none());
  }

  #[test]
  fn test_set_name_and_password_hash() {
    let mut user = test_user();

    user.set_name(Name::new("Ana Souza").unwrap());
    assert_eq!(user.name.as_str(), "Ana Souza");

    let new_hash = PasswordHash::from_hash(test_hash()).unwrap();
    user.set_password_hash(new_hash.clone());
    assert_eq!(user.password_hash, new_hash);
  }
}
