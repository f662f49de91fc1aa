use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::auth::ports::UserRepository;
use crate::domain::auth::value_objects::{Email, ImageUrl, Name, PasswordHash, UserId};

/// Database row structure for the users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  name: String,
  email: String,
  password_hash: String,
  image_url: Option<String>,
  created_at: DateTime<Utc>,
  password_reset_token: Option<String>,
  password_reset_expires: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
  type Error = AuthError;

  // Rows went through the value objects on the way in; one that no longer
  // parses is corrupt, not invalid input
  fn try_from(row: UserRow) -> Result<Self, Self::Error> {
    let corrupt = |e: &dyn std::fmt::Display| {
      AuthError::Repository(RepositoryError::DatabaseError(format!(
        "corrupt user row {}: {}",
        row.id, e
      )))
    };

    let name = Name::new(&row.name).map_err(|e| corrupt(&e))?;
    let email = Email::new(&row.email).map_err(|e| corrupt(&e))?;
    let password_hash = PasswordHash::from_hash(&row.password_hash).map_err(|e| corrupt(&e))?;
    let image_url = match &row.image_url {
      Some(raw) => Some(ImageUrl::new(raw).map_err(|e| corrupt(&e))?),
      None => None,
    };

    Ok(User::from_db(
      UserId::from_uuid(row.id),
      name,
      email,
      password_hash,
      image_url,
      row.created_at,
      row.password_reset_token,
      row.password_reset_expires,
    ))
  }
}

/// PostgreSQL implementation of the UserRepository trait
///
/// The unique index on `email` is the source of truth for uniqueness; a
/// concurrent duplicate registration surfaces here as a duplicate-key
/// error regardless of what the use-case pre-check saw.
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

const USER_COLUMNS: &str =
  "id, name, email, password_hash, image_url, created_at, password_reset_token, password_reset_expires";

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn save(&self, user: User) -> Result<User, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (id, name, email, password_hash, image_url, created_at, password_reset_token, password_reset_expires)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                image_url = EXCLUDED.image_url,
                password_reset_token = EXCLUDED.password_reset_token,
                password_reset_expires = EXCLUDED.password_reset_expires
            RETURNING id, name, email, password_hash, image_url, created_at, password_reset_token, password_reset_expires
            "#,
    )
    .bind(user.id.into_inner())
    .bind(user.name.as_str())
    .bind(user.email.as_str())
    .bind(user.password_hash.as_str())
    .bind(user.image_url.as_ref().map(|url| url.as_str()))
    .bind(user.created_at)
    .bind(user.password_reset_token.as_deref())
    .bind(user.password_reset_expires)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to save user: {}", e);
      AuthError::from(e)
    })?;

    User::try_from(row)
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      "SELECT {} FROM users WHERE email = $1",
      USER_COLUMNS
    ))
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find user by email: {}", e);
      AuthError::from(e)
    })?;

    row.map(User::try_from).transpose()
  }

  async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      "SELECT {} FROM users WHERE id = $1",
      USER_COLUMNS
    ))
    .bind(id.into_inner())
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find user by id: {}", e);
      AuthError::from(e)
    })?;

    row.map(User::try_from).transpose()
  }

  async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      "SELECT {} FROM users WHERE password_reset_token = $1",
      USER_COLUMNS
    ))
    .bind(token)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find user by reset token: {}", e);
      AuthError::from(e)
    })?;

    row.map(User::try_from).transpose()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid_row() -> UserRow {
    UserRow {
      id: Uuid::new_v4(),
      name: "Ana Silva".to_string(),
      email: "ana@example.com".to_string(),
      password_hash: sample_hash(),
      image_url: Some("https://example.com/avatar.png".to_string()),
      created_at: Utc::now(),
      password_reset_token: None,
      password_reset_expires: None,
    }
  }

  fn sample_hash() -> String {
    use argon2::password_hash::{PasswordHasher, SaltString};
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    argon2::Argon2::default()
      .hash_password(b"Secret123!", &salt)
      .unwrap()
      .to_string()
  }

  #[test]
  fn test_row_maps_to_aggregate() {
    let row = valid_row();
    let id = row.id;

    let user = User::try_from(row).unwrap();
    assert_eq!(user.id.into_inner(), id);
    assert_eq!(user.email.as_str(), "ana@example.com");
    assert_eq!(
      user.image_url.as_ref().map(|url| url.as_str()),
      Some("https://example.com/avatar.png")
    );
  }

  #[test]
  fn test_corrupt_row_is_a_repository_error() {
    let mut row = valid_row();
    row.password_hash = "not-a-phc-string".to_string();

    let result = User::try_from(row);
    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::DatabaseError(_)))
    ));
  }
}
