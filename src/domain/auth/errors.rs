use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use super::value_objects::ValueObjectError;

/// Main authentication error type returned by the use cases
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("Email already registered")]
  UserExists,

  #[error("Invalid credentials provided")]
  InvalidCredentials,

  #[error("Invalid password reset token")]
  InvalidToken,

  #[error("Password reset token has expired")]
  ExpiredToken,

  #[error("New password must be different from the current one")]
  SamePassword,

  #[error("New name must be different from the current one")]
  NameUnchanged,

  #[error("User not found")]
  UserNotFound,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Session registry error: {0}")]
  Registry(#[from] RegistryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Token error: {0}")]
  Token(#[from] TokenError),

  #[error("Notification error: {0}")]
  Notification(#[from] NotifyError),

  #[error("Value object error: {0}")]
  ValueObject(#[from] ValueObjectError),
}

/// Field-keyed validation failures, collected without stopping at the first
///
/// Register reports every violation at once; the map keeps fields in a
/// stable order so responses and log lines are deterministic.
#[derive(Debug, Default)]
pub struct ValidationErrors {
  errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
  /// Creates an empty collection
  pub fn new() -> Self {
    Self::default()
  }

  /// Records a violation for the given field
  pub fn add(&mut self, field: impl Into<String>, message: impl fmt::Display) {
    self
      .errors
      .entry(field.into())
      .or_default()
      .push(message.to_string());
  }

  /// True when no violation has been recorded
  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }

  /// Number of fields with at least one violation
  pub fn field_count(&self) -> usize {
    self.errors.len()
  }

  /// Returns the messages recorded for a field, if any
  pub fn field(&self, field: &str) -> Option<&[String]> {
    self.errors.get(field).map(Vec::as_slice)
  }

  /// Iterates over (field, messages) pairs in field order
  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self
      .errors
      .iter()
      .map(|(field, messages)| (field.as_str(), messages.as_slice()))
  }

  /// Wraps a non-empty collection into an AuthError, or returns Ok
  pub fn into_result(self) -> Result<(), AuthError> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(AuthError::Validation(self))
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.errors {
      for message in messages {
        if !first {
          write!(f, "; ")?;
        }
        write!(f, "{}: {}", field, message)?;
        first = false;
      }
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Session registry (Redis) errors
#[derive(Debug, Error)]
pub enum RegistryError {
  #[error("Registry connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Registry command failed: {0}")]
  CommandFailed(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Password must not be empty")]
  EmptyPassword,

  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

/// Bearer token issuance and validation errors
///
/// Validation failures are kept distinct so callers can tell a structural
/// problem from a cryptographic or temporal one.
#[derive(Debug, Error)]
pub enum TokenError {
  #[error("Token is malformed")]
  Malformed,

  #[error("Token signature is invalid")]
  InvalidSignature,

  #[error("Token has expired")]
  Expired,

  #[error("Token is missing required claim: {0}")]
  MissingClaim(&'static str),

  #[error("Invalid claims: {0}")]
  InvalidClaims(String),

  #[error("Failed to sign token: {0}")]
  Signing(String),
}

/// Reset notification errors
#[derive(Debug, Error)]
pub enum NotifyError {
  #[error("Failed to build reset email: {0}")]
  Message(String),

  #[error("Failed to send reset email: {0}")]
  Transport(String),
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}

impl From<redis::RedisError> for RegistryError {
  fn from(error: redis::RedisError) -> Self {
    if error.is_connection_refusal() || error.is_timeout() || error.is_connection_dropped() {
      RegistryError::ConnectionFailed(error.to_string())
    } else {
      RegistryError::CommandFailed(error.to_string())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_validation_errors_collects_per_field() {
    let mut errors = ValidationErrors::new();
    errors.add("name", "too short");
    errors.add("email", "invalid format");
    errors.add("email", "must not be empty");

    assert!(!errors.is_empty());
    assert_eq!(errors.field_count(), 2);
    assert_eq!(errors.field("email").unwrap().len(), 2);
    assert!(errors.field("password").is_none());
  }

  #[test]
  fn test_validation_errors_display_is_deterministic() {
    let mut errors = ValidationErrors::new();
    errors.add("name", "too short");
    errors.add("email", "invalid format");

    // BTreeMap ordering: email before name
    assert_eq!(errors.to_string(), "email: invalid format; name: too short");
  }

  #[test]
  fn test_into_result() {
    assert!(ValidationErrors::new().into_result().is_ok());

    let mut errors = ValidationErrors::new();
    errors.add("name", "too short");
    assert!(matches!(
      errors.into_result(),
      Err(AuthError::Validation(_))
    ));
  }
}
