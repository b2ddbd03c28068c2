//! Fireside API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fireside_api::error::AppError;
use fireside_api::routes;
use fireside_api::state::AppState;
use fireside_core::clock::SystemClock;
use fireside_roster::directory::MemberDirectory;
use fireside_store::{PgBindingRepository, PgTemplateRepository, PgUserRepository, schema};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Fireside API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
    let bot_call_timeout_secs: u64 = std::env::var("BOT_CALL_TIMEOUT_SECS")
        .unwrap_or_else(|_| "5".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("BOT_CALL_TIMEOUT_SECS must be a valid u64: {e}")))?;

    // Create database connection pool and make sure the schema exists.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    schema::ensure_schema(&pool)
        .await
        .map_err(|e| AppError::Config(e.to_string()))?;

    // Build application state.
    let app_state = AppState::new(
        Arc::new(PgTemplateRepository::new(pool.clone())),
        Arc::new(PgBindingRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool)),
        Arc::new(MemberDirectory::new()),
        Arc::new(SystemClock),
        Duration::from_secs(bot_call_timeout_secs),
    );

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::bot_ws::router())
        .nest("/api/v1/templates", routes::templates::router())
        .nest("/api/v1/bindings", routes::bindings::router())
        .nest("/api/v1/characters", routes::characters::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
