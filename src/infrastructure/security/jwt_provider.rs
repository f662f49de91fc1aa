use chrono::{TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::auth::errors::TokenError;
use crate::domain::auth::ports::{Claims, TokenProvider};

/// Wire shape of the token payload
///
/// Every field defaults on deserialization so that an absent claim is
/// reported by the validation step as a missing claim rather than as a
/// generic parse failure.
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
  #[serde(default)]
  uid: String,
  #[serde(default)]
  sub: String,
  #[serde(default)]
  exp: i64,
}

/// HS256 bearer token provider
///
/// The algorithm is pinned on both ends: tokens are minted as HS256 and
/// validation rejects anything else, including "none". Expiry is exclusive —
/// a token is invalid at its expiry instant, which is stricter than the
/// library's own check, so it is re-applied after decoding.
pub struct JwtTokenProvider {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validation: Validation,
}

impl JwtTokenProvider {
  /// Creates a provider signing and validating with the given secret
  pub fn new(secret: &str) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      validation,
    }
  }
}

impl TokenProvider for JwtTokenProvider {
  fn generate(&self, claims: &Claims) -> Result<String, TokenError> {
    if claims.user_id.is_empty() {
      return Err(TokenError::InvalidClaims(
        "user id must not be empty".to_string(),
      ));
    }
    if claims.subject.is_empty() {
      return Err(TokenError::InvalidClaims(
        "subject must not be empty".to_string(),
      ));
    }

    let jwt_claims = JwtClaims {
      uid: claims.user_id.clone(),
      sub: claims.subject.clone(),
      exp: claims.expires_at.timestamp(),
    };

    encode(
      &Header::new(Algorithm::HS256),
      &jwt_claims,
      &self.encoding_key,
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
  }

  fn validate(&self, token: &str) -> Result<Claims, TokenError> {
    let data =
      decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
        match e.kind() {
          ErrorKind::ExpiredSignature => TokenError::Expired,
          ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
          ErrorKind::MissingRequiredClaim(claim) => {
            if claim.as_str() == "sub" {
              TokenError::MissingClaim("sub")
            } else {
              TokenError::MissingClaim("exp")
            }
          }
          _ => TokenError::Malformed,
        }
      })?;

    let jwt_claims = data.claims;

    if jwt_claims.uid.is_empty() {
      return Err(TokenError::MissingClaim("uid"));
    }
    if jwt_claims.sub.is_empty() {
      return Err(TokenError::MissingClaim("sub"));
    }

    // Exclusive boundary: the expiry instant itself is already invalid
    if jwt_claims.exp <= Utc::now().timestamp() {
      return Err(TokenError::Expired);
    }

    let expires_at = Utc
      .timestamp_opt(jwt_claims.exp, 0)
      .single()
      .ok_or(TokenError::Malformed)?;

    Ok(Claims {
      user_id: jwt_claims.uid,
      subject: jwt_claims.sub,
      expires_at,
    })
  }
}
