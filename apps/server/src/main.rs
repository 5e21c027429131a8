//! Dukaan Back-Office - HTTP API Server
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dukaan API Server                                │
//! │                                                                         │
//! │  Browser UI ───► REST (axum) ───► services/repositories ───► SQLite   │
//! │                                                                         │
//! │  sales · customers · recovery · products · purchasing · expenses       │
//! │  salesmen · vendors · categories · backup (CSV) · analytics · login    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::{routing::get, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dukaan_db::{Database, DbConfig};

mod config;
mod error;
mod handlers;
mod routes;

pub use config::Config;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dukaan_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    info!("Starting Dukaan back-office server");

    // Connect to the database (creates the file and runs migrations)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!(path = %config.database_path, "Database ready");

    // Seed the operator account on a fresh installation
    let password_hash = bcrypt::hash(&config.admin_password, bcrypt::DEFAULT_COST)?;
    db.users()
        .ensure_default_admin(&config.admin_name, &config.admin_email, &password_hash)
        .await?;

    let state = AppState {
        db,
        config: Arc::new(config.clone()),
    };

    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the application router with all routes and middleware.
fn create_app(state: AppState) -> Router {
    // The UI is served separately during development; allow it from anywhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint.
async fn root() -> &'static str {
    "Dukaan Back-Office API v0.1"
}

/// Health check: process up + database reachable.
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let database = state.db.health_check().await;
    Json(serde_json::json!({
        "status": if database { "ok" } else { "degraded" },
        "database": database,
    }))
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
