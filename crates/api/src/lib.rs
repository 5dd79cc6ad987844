//! # Volly API
//!
//! The API crate provides the web server implementation for the Volly
//! volunteer management service. It defines RESTful endpoints for managing
//! users, postings, shifts, and signups.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into service and repository calls
//! - **Services**: Implement account coordination and shift scheduling
//! - **Middleware**: Provide cross-cutting concerns like error handling
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.
//! User identity (email and credentials) lives in an external directory
//! reached through the [`volly_directory::IdentityDirectory`] trait.

/// Configuration module for API settings
pub mod config;
/// Request handlers that adapt HTTP to the service layer
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Account coordination and shift scheduling services
pub mod services;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use volly_db::store::PgUserStore;
use volly_directory::{http::HttpIdentityDirectory, IdentityDirectory};

use services::{accounts::AccountService, shifts::ShiftService};

/// Shared application state that is accessible to all request handlers.
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,

    /// Coordinates account writes across the database and the directory
    pub accounts: AccountService,

    /// Shift expansion, validation, and persistence
    pub shifts: ShiftService,
}

/// Starts the API server with the provided configuration and database connection.
///
/// Initializes logging, wires the identity directory client and the service
/// layer, builds the router, and serves until shutdown.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Wire shared dependencies
    let directory: Arc<dyn IdentityDirectory> = Arc::new(HttpIdentityDirectory::new(
        &config.directory_base_url,
        &config.directory_api_key,
    ));
    let store = Arc::new(PgUserStore::new(db_pool.clone()));
    let accounts = AccountService::new(store, directory);
    let shifts = ShiftService::new(db_pool.clone());

    let state = Arc::new(ApiState {
        db_pool,
        accounts,
        shifts,
    });

    // Build the application router with all routes
    let app = Router::new()
        .merge(routes::health::routes())
        .merge(routes::users::routes())
        .merge(routes::branches::routes())
        .merge(routes::skills::routes())
        .merge(routes::postings::routes())
        .merge(routes::shifts::routes())
        .merge(routes::signups::routes())
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let mut parsed = Vec::with_capacity(origins.len());
        for origin in origins {
            parsed.push(origin.parse()?);
        }
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(parsed)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(tower_http::timeout::TimeoutLayer::new(
        std::time::Duration::from_secs(config.request_timeout),
    ));

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
