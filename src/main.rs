use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pockit::{
  adapters::http::{RequestIdMiddleware, configure_auth_routes},
  application::auth::{
    GetCurrentUserUseCase, ResendVerificationUseCase, ResetPasswordUseCase, SignInUseCase,
    SignUpUseCase, VerifyEmailUseCase,
  },
  domain::auth::ports::{NotificationGateway, TokenIssuer},
  domain::auth::services::AuthService,
  infrastructure::{
    config::Config,
    notification::{LogNotificationGateway, SmtpNotificationGateway},
    persistence::postgres::{
      PostgresRoleRepository, PostgresUserRepository, PostgresVerificationCodeStore,
    },
    security::{Argon2PasswordHasher, JwtTokenIssuer, RandomCodeGenerator},
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pockit=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Pockit backend");

  // Load configuration
  let config = Config::load().context("Failed to load configuration")?;
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
  .context("Database connection timed out. Is PostgreSQL running?")?
  .context("Failed to connect to database")?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  // Initialize repositories
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let role_repo = Arc::new(PostgresRoleRepository::new(db_pool.clone()));
  let code_store = Arc::new(PostgresVerificationCodeStore::new(
    db_pool.clone(),
    Arc::new(RandomCodeGenerator::new()),
    chrono::Duration::seconds(config.verification.code_ttl_seconds as i64),
  ));

  // Initialize security services
  let password_hasher = Arc::new(Argon2PasswordHasher::new()?);
  let token_issuer: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(
    &config.security.jwt_secret,
    chrono::Duration::seconds(config.security.token_ttl_seconds as i64),
  ));

  // Notification gateway: SMTP relay when configured, logs otherwise
  let notifier: Arc<dyn NotificationGateway> = match &config.smtp {
    Some(smtp) => {
      Arc::new(SmtpNotificationGateway::new(smtp).context("Failed to create SMTP gateway")?)
    }
    None => {
      tracing::warn!("No SMTP relay configured; account emails go to the log");
      Arc::new(LogNotificationGateway::new())
    }
  };

  // Initialize domain service
  let auth_service = Arc::new(AuthService::new(
    user_repo,
    role_repo,
    code_store,
    password_hasher,
    notifier,
    token_issuer.clone(),
  ));

  // Initialize use cases
  let sign_up_use_case = Arc::new(SignUpUseCase::new(auth_service.clone()));
  let resend_use_case = Arc::new(ResendVerificationUseCase::new(auth_service.clone()));
  let verify_use_case = Arc::new(VerifyEmailUseCase::new(auth_service.clone()));
  let sign_in_use_case = Arc::new(SignInUseCase::new(auth_service.clone()));
  let reset_password_use_case = Arc::new(ResetPasswordUseCase::new(auth_service.clone()));
  let get_user_use_case = Arc::new(GetCurrentUserUseCase::new(auth_service.clone()));

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  // Create and start the HTTP server
  HttpServer::new(move || {
    App::new()
      // Add request ID middleware
      .wrap(RequestIdMiddleware::new())
      // Add logging middleware
      .wrap(Logger::default())
      // Configure account lifecycle routes
      .service(web::scope("/api/v1/auth").configure(|cfg| {
        configure_auth_routes(
          cfg,
          sign_up_use_case.clone(),
          resend_use_case.clone(),
          verify_use_case.clone(),
          sign_in_use_case.clone(),
          reset_password_use_case.clone(),
          get_user_use_case.clone(),
          token_issuer.clone(),
        )
      }))
      // Health check endpoint
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await?;

  Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}
