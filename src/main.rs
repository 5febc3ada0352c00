//! Storefront - a small marketplace backend with login-attempt throttling

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxOrderRepository, SqlxSellerRepository, SqlxUserRepository},
    },
    services::{start_sweeper, LoginAttemptGuard, OrderService, SellerService, UserService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting storefront...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Login attempt guard shared between the login flow and its sweeper
    let login_guard = Arc::new(LoginAttemptGuard::from_config(&config.throttle));
    let sweeper = start_sweeper(login_guard.clone());
    tracing::info!(
        window_ms = config.throttle.window_ms,
        max_attempts = config.throttle.max_attempts,
        "Login throttle active"
    );

    // Build application state
    let state = AppState {
        user_service: Arc::new(UserService::new(
            SqlxUserRepository::boxed(pool.clone()),
            login_guard,
            config.throttle.max_attempts,
        )),
        seller_service: Arc::new(SellerService::new(SqlxSellerRepository::boxed(pool.clone()))),
        order_service: Arc::new(OrderService::new(SqlxOrderRepository::boxed(pool))),
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.stop().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    } else {
        tracing::info!("Shutdown signal received");
    }
}
