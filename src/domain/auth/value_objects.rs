use argon2::PasswordHash as Argon2PasswordHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateEmail;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Email must not be empty")]
  EmptyEmail,

  #[error("Invalid email format: {0}")]
  InvalidEmail(String),

  #[error("Name must not be empty")]
  EmptyName,

  #[error("Name is too short (minimum {min} characters)")]
  NameTooShort { min: usize },

  #[error("Name is too long (maximum {max} characters)")]
  NameTooLong { max: usize },

  #[error("Name contains non-printable characters")]
  NameNotPrintable,

  #[error("Password is too short (minimum {min} characters)")]
  PasswordTooShort { min: usize },

  #[error("Password is too long (maximum {max} characters)")]
  PasswordTooLong { max: usize },

  #[error("Invalid password hash format")]
  InvalidPasswordHash,

  #[error("Invalid image URL: {0}")]
  InvalidUrl(String),

  #[error("Invalid user id: {0}")]
  InvalidUserId(String),
}

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation, normalized to lowercase
  pub fn new(email: impl Into<String>) -> Result<Self, ValueObjectError> {
    let email = email.into();

    if email.is_empty() {
      return Err(ValueObjectError::EmptyEmail);
    }

    if !email.validate_email() {
      return Err(ValueObjectError::InvalidEmail(email));
    }

    Ok(Self(email.to_lowercase()))
  }

  /// Returns the email as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Name Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(String);

impl Name {
  const MIN_LENGTH: usize = 3;
  const MAX_LENGTH: usize = 100;

  /// Creates a new Name after trimming and validation
  pub fn new(name: impl Into<String>) -> Result<Self, ValueObjectError> {
    let name = name.into();

    if name.is_empty() {
      return Err(ValueObjectError::EmptyName);
    }

    let trimmed = name.trim();

    if trimmed.chars().any(|c| c.is_control()) {
      return Err(ValueObjectError::NameNotPrintable);
    }

    let length = trimmed.chars().count();
    if length < Self::MIN_LENGTH {
      return Err(ValueObjectError::NameTooShort {
        min: Self::MIN_LENGTH,
      });
    }
    if length > Self::MAX_LENGTH {
      return Err(ValueObjectError::NameTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(trimmed.to_string()))
  }

  /// Returns the name as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Name {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// ImageUrl Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl(String);

impl ImageUrl {
  /// Creates a new ImageUrl; only http and https schemes are accepted
  pub fn new(raw: impl Into<String>) -> Result<Self, ValueObjectError> {
    let raw = raw.into();

    let rest = raw
      .strip_prefix("https://")
      .or_else(|| raw.strip_prefix("http://"))
      .ok_or_else(|| ValueObjectError::InvalidUrl(raw.clone()))?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    if host.is_empty() {
      return Err(ValueObjectError::InvalidUrl(raw));
    }

    Ok(Self(raw.trim_end_matches('/').to_string()))
  }

  /// Returns the URL as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for ImageUrl {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  const MIN_LENGTH: usize = 8;
  const MAX_LENGTH: usize = 128;

  /// Creates a new Password after validation
  pub fn new(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    let password = password.into();

    if password.len() < Self::MIN_LENGTH {
      return Err(ValueObjectError::PasswordTooShort {
        min: Self::MIN_LENGTH,
      });
    }

    if password.len() > Self::MAX_LENGTH {
      return Err(ValueObjectError::PasswordTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(password))
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the password
impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// Implement Display without exposing the password
impl fmt::Display for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

// ============================================================================
// PasswordHash Value Object (Argon2id PHC String)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Creates a new PasswordHash from an existing hash string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    if hash.is_empty() {
      return Err(ValueObjectError::InvalidPasswordHash);
    }

    // Must be a well-formed PHC string
    Argon2PasswordHash::new(&hash).map_err(|_| ValueObjectError::InvalidPasswordHash)?;

    Ok(Self(hash))
  }

  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for PasswordHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// UserId Value Object
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
  /// Creates a new random UserId
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }

  /// Creates a UserId from an existing UUID
  pub fn from_uuid(uuid: Uuid) -> Self {
    Self(uuid)
  }

  /// Parses a UserId from its canonical string form
  pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
    Uuid::parse_str(value)
      .map(Self)
      .map_err(|_| ValueObjectError::InvalidUserId(value.to_string()))
  }

  /// Returns the inner UUID
  pub fn into_inner(self) -> Uuid {
    self.0
  }

  /// Returns a reference to the inner UUID
  pub fn as_uuid(&self) -> &Uuid {
    &self.0
  }
}

impl Default for UserId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<Uuid> for UserId {
  fn from(uuid: Uuid) -> Self {
    Self(uuid)
  }
}

impl From<UserId> for Uuid {
  fn from(user_id: UserId) -> Self {
    user_id.0
  }
}
