pub mod entities;
pub mod errors;
pub mod ports;
pub mod value_objects;

// Re-export commonly used types
pub use entities::User;
pub use errors::{
  AuthError, HashError, NotifyError, RegistryError, RepositoryError, TokenError, ValidationErrors,
};
pub use ports::Claims;
pub use value_objects::{Email, ImageUrl, Name, Password, PasswordHash, UserId};
