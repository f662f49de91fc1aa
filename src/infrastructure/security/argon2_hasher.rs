use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::PasswordHash;

/// Default memory cost: 19 MiB = 19456 KiB
const DEFAULT_MEMORY_KIB: u32 = 19456;
/// Default time cost: 2 iterations
const DEFAULT_ITERATIONS: u32 = 2;
/// Single lane; the service hashes one password per request
const PARALLELISM: u32 = 1;
/// Output length: 32 bytes
const OUTPUT_LEN: usize = 32;

/// Argon2id password hasher implementation
///
/// The work factor (memory cost and iteration count) is configurable so
/// deployments can tune hashing cost to their hardware; the algorithm and
/// version are fixed at Argon2id v19.
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  /// Creates a hasher with the default work factor
  pub fn new() -> Result<Self, AuthError> {
    Self::with_params(DEFAULT_MEMORY_KIB, DEFAULT_ITERATIONS)
  }

  /// Creates a hasher with an explicit work factor
  pub fn with_params(memory_kib: u32, iterations: u32) -> Result<Self, AuthError> {
    let params =
      Params::new(memory_kib, iterations, PARALLELISM, Some(OUTPUT_LEN)).map_err(|e| {
        AuthError::Hash(HashError::HashingFailed(format!(
          "Failed to create Argon2 params: {}",
          e
        )))
      })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    Ok(Self { argon2 })
  }
}

impl Default for Argon2PasswordHasher {
  fn default() -> Self {
    Self::new().expect("Failed to create default Argon2PasswordHasher")
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  /// Hashes a plain text password using Argon2id
  ///
  /// Fails with `EmptyPassword` on empty input. Each call draws a fresh
  /// random salt, so the same plaintext never produces the same hash twice.
  async fn encrypt(&self, plaintext: &str) -> Result<PasswordHash, AuthError> {
    if plaintext.is_empty() {
      return Err(AuthError::Hash(HashError::EmptyPassword));
    }

    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    let hash = self
      .argon2
      .hash_password(plaintext.as_bytes(), &salt)
      .map_err(|e| {
        AuthError::Hash(HashError::HashingFailed(format!(
          "Failed to hash password: {}",
          e
        )))
      })?;

    PasswordHash::from_hash(hash.to_string()).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Invalid hash format: {}",
        e
      )))
    })
  }

  /// Verifies a plain text password against a stored hash
  ///
  /// A genuine mismatch is `Ok(false)`, never an error; only a malformed
  /// stored hash or an algorithm failure produces `Err`.
  async fn compare(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, AuthError> {
    let parsed_hash = Argon2PasswordHash::new(hash.as_str()).map_err(|e| {
      AuthError::Hash(HashError::VerificationFailed(format!(
        "Invalid hash format: {}",
        e
      )))
    })?;

    match self
      .argon2
      .verify_password(plaintext.as_bytes(), &parsed_hash)
    {
      Ok(_) => Ok(true),
      Err(argon2::password_hash::Error::Password) => Ok(false),
      Err(e) => Err(AuthError::Hash(HashError::VerificationFailed(format!(
        "Password verification failed: {}",
        e
      )))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fast_hasher() -> Argon2PasswordHasher {
    Argon2PasswordHasher::with_params(1024, 1).unwrap()
  }

  #[tokio::test]
  async fn test_encrypt_produces_argon2id_hash() {
    let hasher = fast_hasher();

    let hash = hasher.encrypt("test_password_123").await.unwrap();
    assert!(!hash.as_str().is_empty());
    assert!(hash.as_str().starts_with("$argon2id$"));
  }

  #[tokio::test]
  async fn test_encrypt_rejects_empty_password() {
    let hasher = fast_hasher();

    let result = hasher.encrypt("").await;
    assert!(matches!(
      result,
      Err(AuthError::Hash(HashError::EmptyPassword))
    ));
  }

  #[tokio::test]
  async fn test_compare_correct_password() {
    let hasher = fast_hasher();

    let hash = hasher.encrypt("test_password_123").await.unwrap();
    assert!(hasher.compare("test_password_123", &hash).await.unwrap());
  }

  #[tokio::test]
  async fn test_compare_mismatch_is_false_not_error() {
    let hasher = fast_hasher();

    let hash = hasher.encrypt("test_password_123").await.unwrap();
    let result = hasher.compare("wrong_password", &hash).await;

    assert!(result.is_ok());
    assert!(!result.unwrap());
  }

  #[tokio::test]
  async fn test_encrypt_salts_every_call() {
    let hasher = fast_hasher();

    let hash1 = hasher.encrypt("test_password_123").await.unwrap();
    let hash2 = hasher.encrypt("test_password_123").await.unwrap();

    // Same password, different salts, different hashes
    assert_ne!(hash1.as_str(), hash2.as_str());

    assert!(hasher.compare("test_password_123", &hash1).await.unwrap());
    assert!(hasher.compare("test_password_123", &hash2).await.unwrap());
  }

  #[tokio::test]
  async fn test_work_factor_is_recorded_in_hash() {
    let hasher = Argon2PasswordHasher::with_params(2048, 3).unwrap();

    let hash = hasher.encrypt("test_password_123").await.unwrap();
    assert!(hash.as_str().contains("m=2048,t=3"));
  }

  #[tokio::test]
  async fn test_hashes_verify_across_work_factors() {
    // A hash is self-describing, so a hasher configured differently can
    // still verify it
    let old = Argon2PasswordHasher::with_params(1024, 1).unwrap();
    let new = Argon2PasswordHasher::with_params(2048, 2).unwrap();

    let hash = old.encrypt("test_password_123").await.unwrap();
    assert!(new.compare("test_password_123", &hash).await.unwrap());
  }
}
