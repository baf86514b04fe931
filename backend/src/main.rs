//! JalSarthi allocation server
//!
//! Stateless JSON API over the drought-relief engine: stress scoring, tanker
//! recommendations, greedy and AI-assisted dispatch planning, forecasts and
//! district/fleet reports. Callers send the village, fleet and rainfall
//! snapshots with each request.

use axum::{http::Uri, routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use crate::config::Config;

use error::AppError;
use external::OptimizerClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no generator API key is configured
    pub optimizer: Option<OptimizerClient>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let optimizer = OptimizerClient::from_config(&config.optimizer)?;
        Ok(Self {
            config: Arc::new(config),
            optimizer,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jalsarthi_server=debug,tower_http=debug".into());
    let (json_layer, pretty_layer) = if config.json_logs() {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();

    tracing::info!("Starting JalSarthi allocation server");
    tracing::info!("Environment: {}", config.environment);

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| AppError::Configuration(format!("Invalid server.host: {}", e)))?;
    let addr = SocketAddr::new(host, config.server.port);

    let state = AppState::new(config)?;
    if state.optimizer.is_none() {
        tracing::warn!("No plan generator API key configured, AI optimization disabled");
    }

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "JalSarthi Drought Relief Allocation API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {}", uri.path()))
}
