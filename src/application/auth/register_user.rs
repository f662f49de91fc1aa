use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::auth::entities::User;
use crate::domain::auth::errors::{AuthError, RepositoryError, ValidationErrors};
use crate::domain::auth::ports::{PasswordHasher, UserRepository};
use crate::domain::auth::value_objects::{Email, ImageUrl, Name, Password, UserId};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  /// User's display name
  pub name: String,
  /// User's email address
  pub email: String,
  /// User's password (plain text, will be hashed)
  pub password: String,
  /// Confirmation that must match the password
  pub password_confirmation: String,
  /// Optional avatar URL
  pub image_url: Option<String>,
}

/// Response after successful user registration
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  /// Unique identifier of the newly created user
  pub user_id: UserId,
  /// User's display name
  pub name: String,
  /// User's email address
  pub email: String,
  /// User's avatar URL, if provided
  pub image_url: Option<String>,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
}

/// Use case for registering a new user
///
/// Every field is validated before anything else happens and all violations
/// are reported at once, keyed by field. The email pre-check only produces a
/// friendly error; the store's unique index is the source of truth, so a
/// concurrent duplicate surfaces as `UserExists` from the save as well.
pub struct RegisterUserUseCase {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(user_repo: Arc<dyn UserRepository>, password_hasher: Arc<dyn PasswordHasher>) -> Self {
    Self {
      user_repo,
      password_hasher,
    }
  }

  /// Executes the user registration use case
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, AuthError> {
    // Every field is checked before the first failure is reported
    let mut violations = ValidationErrors::new();

    if let Err(e) = Name::new(command.name.as_str()) {
      violations.add("name", e);
    }
    if let Err(e) = Email::new(command.email.as_str()) {
      violations.add("email", e);
    }
    match Password::new(command.password.as_str()) {
      Ok(password) if password.as_str() != command.password_confirmation => {
        violations.add("password_confirmation", "does not match password");
      }
      Err(e) => violations.add("password", e),
      Ok(_) => {}
    }

    let image_url_raw = command.image_url.filter(|raw| !raw.is_empty());
    if let Some(raw) = &image_url_raw {
      if let Err(e) = ImageUrl::new(raw.as_str()) {
        violations.add("image_url", e);
      }
    }

    violations.into_result()?;

    let name = Name::new(command.name)?;
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;
    let image_url = match image_url_raw {
      Some(raw) => Some(ImageUrl::new(raw)?),
      None => None,
    };

    if self.user_repo.find_by_email(&email).await?.is_some() {
      return Err(AuthError::UserExists);
    }

    let password_hash = self.password_hasher.encrypt(password.as_str()).await?;

    let user = User::new(name, email, password_hash, image_url);

    let created = match self.user_repo.save(user).await {
      Ok(user) => user,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_))) => {
        return Err(AuthError::UserExists);
      }
      Err(e) => return Err(e),
    };

    Ok(RegisterUserResponse {
      user_id: created.id,
      name: created.name.into_inner(),
      email: created.email.into_inner(),
      image_url: created.image_url.map(ImageUrl::into_inner),
      created_at: created.created_at,
    })
  }
}
