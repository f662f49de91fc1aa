use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::ResetTokenGenerator;

/// Number of random bytes per token: 32 bytes = 256 bits of entropy
const TOKEN_BYTES: usize = 32;

/// Secure reset-token generator backed by the operating system RNG
pub struct SecureTokenGenerator;

impl SecureTokenGenerator {
  /// Creates a new instance of SecureTokenGenerator
  pub fn new() -> Self {
    Self
  }
}

impl Default for SecureTokenGenerator {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl ResetTokenGenerator for SecureTokenGenerator {
  /// Generates a cryptographically secure random token
  ///
  /// Draws 32 bytes from `OsRng` and encodes them as base64url without
  /// padding, safe for use inside a reset link.
  async fn generate(&self) -> Result<String, AuthError> {
    let mut token_bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut token_bytes);

    Ok(URL_SAFE_NO_PAD.encode(token_bytes))
  }
}
