use actix_web::{App, HttpServer, middleware::Logger};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authbase::{
  adapters::http::{AuthRouteDependencies, configure_auth_routes},
  application::auth::{
    LoginUserUseCase, LogoutUserUseCase, RegisterUserUseCase, RequestPasswordResetUseCase,
    ResetPasswordUseCase, UpdateNameUseCase, UpdatePasswordUseCase,
  },
  infrastructure::{
    config::Config,
    email::SmtpResetNotifier,
    persistence::postgres::PostgresUserRepository,
    registry::RedisSessionRegistry,
    security::{Argon2PasswordHasher, JwtTokenProvider, SecureTokenGenerator},
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "authbase=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting authbase");

  // Load configuration
  let config = Config::load().expect("Failed to load configuration");
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?".to_string(),
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .expect("Failed to run database migrations");
  tracing::info!("Database migrations completed");

  // Set up Redis connection with timeout
  tracing::info!("Connecting to Redis");

  let redis_client = redis::Client::open(config.redis.url.clone()).map_err(|e| {
    tracing::error!("Failed to create Redis client: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::InvalidInput,
      format!("Invalid Redis URL: {}", e),
    )
  })?;

  let redis_conn = tokio::time::timeout(
    Duration::from_secs(config.redis.connect_timeout_seconds),
    redis_client.get_connection_manager(),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Redis connection timed out after {} seconds. Is Redis running?",
      config.redis.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Redis connection timed out after {} seconds",
        config.redis.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to Redis: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::ConnectionRefused,
      format!("Could not connect to Redis: {}", e),
    )
  })?;

  tracing::info!("Redis connection established");

  // Initialize port adapters
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let session_registry = Arc::new(RedisSessionRegistry::new(redis_conn));
  let password_hasher = Arc::new(
    Argon2PasswordHasher::with_params(
      config.security.argon2_memory_kib,
      config.security.argon2_iterations,
    )
    .expect("Failed to create password hasher"),
  );
  let token_provider = Arc::new(JwtTokenProvider::new(&config.security.jwt_secret));
  let token_generator = Arc::new(SecureTokenGenerator::new());
  let notifier =
    Arc::new(SmtpResetNotifier::from_config(&config.smtp).expect("Failed to create SMTP notifier"));

  let token_ttl = Duration::from_secs(config.security.token_ttl_seconds);
  let reset_token_ttl = Duration::from_secs(config.security.reset_token_ttl_seconds);

  // Initialize use cases
  let register_use_case = Arc::new(RegisterUserUseCase::new(
    user_repo.clone(),
    password_hasher.clone(),
  ));
  let login_use_case = Arc::new(LoginUserUseCase::new(
    user_repo.clone(),
    password_hasher.clone(),
    token_provider.clone(),
    session_registry.clone(),
    token_ttl,
  ));
  let logout_use_case = Arc::new(LogoutUserUseCase::new(session_registry.clone()));
  let request_password_reset_use_case = Arc::new(RequestPasswordResetUseCase::new(
    user_repo.clone(),
    token_generator,
    notifier,
    reset_token_ttl,
  ));
  let reset_password_use_case = Arc::new(ResetPasswordUseCase::new(
    user_repo.clone(),
    password_hasher.clone(),
  ));
  let update_name_use_case = Arc::new(UpdateNameUseCase::new(user_repo.clone()));
  let update_password_use_case =
    Arc::new(UpdatePasswordUseCase::new(user_repo, password_hasher));

  let deps = AuthRouteDependencies {
    register_use_case,
    login_use_case,
    logout_use_case,
    request_password_reset_use_case,
    reset_password_use_case,
    update_name_use_case,
    update_password_use_case,
    token_provider,
    session_registry,
  };

  let bind_address = (config.server.host.clone(), config.server.port);
  tracing::info!(
    "Starting HTTP server on {}:{}",
    config.server.host,
    config.server.port
  );

  HttpServer::new(move || {
    App::new()
      .wrap(Logger::default())
      .configure(configure_auth_routes(deps.clone()))
  })
  .bind(bind_address)?
  .run()
  .await
}
