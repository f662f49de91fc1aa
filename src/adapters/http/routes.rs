use actix_web::web;
use std::sync::Arc;

use crate::application::auth::{
  LoginUserUseCase, LogoutUserUseCase, RegisterUserUseCase, RequestPasswordResetUseCase,
  ResetPasswordUseCase, UpdateNameUseCase, UpdatePasswordUseCase,
};
use crate::domain::auth::ports::{SessionRegistry, TokenProvider};

use super::handlers::auth::{
  forgot_password_handler, login_handler, logout_handler, register_handler,
  reset_password_handler, update_name_handler, update_password_handler,
};
use super::middleware::AuthMiddleware;

/// Everything the auth routes need, wired once in main
#[derive(Clone)]
pub struct AuthRouteDependencies {
  pub register_use_case: Arc<RegisterUserUseCase>,
  pub login_use_case: Arc<LoginUserUseCase>,
  pub logout_use_case: Arc<LogoutUserUseCase>,
  pub request_password_reset_use_case: Arc<RequestPasswordResetUseCase>,
  pub reset_password_use_case: Arc<ResetPasswordUseCase>,
  pub update_name_use_case: Arc<UpdateNameUseCase>,
  pub update_password_use_case: Arc<UpdatePasswordUseCase>,
  pub token_provider: Arc<dyn TokenProvider>,
  pub session_registry: Arc<dyn SessionRegistry>,
}

/// Configure authentication routes
///
/// Mounts all endpoints under /api/auth. Identity-scoped routes (logout,
/// name, password) sit behind the authorization middleware, which requires
/// both a valid token and an active session entry.
///
/// # Routes
///
/// - POST /api/auth/register - Register a new user account
/// - POST /api/auth/login - Authenticate and open a session
/// - POST /api/auth/forgot-password - Request a password reset link
/// - POST /api/auth/reset-password - Complete a password reset
/// - POST /api/auth/logout - Close the current session (authorized)
/// - PUT  /api/auth/name - Change the display name (authorized)
/// - PUT  /api/auth/password - Change the password (authorized)
pub fn configure_auth_routes(
  deps: AuthRouteDependencies,
) -> impl FnOnce(&mut web::ServiceConfig) {
  move |cfg| {
    cfg.service(
      web::scope("/api/auth")
        .app_data(web::Data::new(deps.register_use_case))
        .app_data(web::Data::new(deps.login_use_case))
        .app_data(web::Data::new(deps.logout_use_case))
        .app_data(web::Data::new(deps.request_password_reset_use_case))
        .app_data(web::Data::new(deps.reset_password_use_case))
        .app_data(web::Data::new(deps.update_name_use_case))
        .app_data(web::Data::new(deps.update_password_use_case))
        .route("/register", web::post().to(register_handler))
        .route("/login", web::post().to(login_handler))
        .route("/forgot-password", web::post().to(forgot_password_handler))
        .route("/reset-password", web::post().to(reset_password_handler))
        .service(
          web::scope("")
            .wrap(AuthMiddleware::new(
              deps.token_provider,
              deps.session_registry,
            ))
            .route("/logout", web::post().to(logout_handler))
            .route("/name", web::put().to(update_name_handler))
            .route("/password", web::put().to(update_password_handler)),
        ),
    );
  }
}
