mod argon2_hasher;
mod jwt_provider;
mod token_generator;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_provider::JwtTokenProvider;
pub use token_generator::SecureTokenGenerator;
