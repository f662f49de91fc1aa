pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{
  ErrorResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
  RegisterResponse, ResetPasswordRequest, SuccessResponse, UpdateNameRequest,
  UpdatePasswordRequest, UserResponse,
};
pub use errors::{ApiError, AuthErrorKind};
pub use middleware::{AuthMiddleware, AuthenticatedUser};
pub use routes::{AuthRouteDependencies, configure_auth_routes};
