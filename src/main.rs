//! Authgate - Stateless JWT Authentication & Authorization API
//! Mission: One trust domain, one signing key, correct 401/403 semantics

use anyhow::{Context, Result};
use authgate_backend::{
    auth::{AuthState, JwtHandler, UserStore},
    build_app,
    config::Config,
};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    info!("🚀 Authgate starting");

    // Fails fast on a missing or short signing secret.
    let config = Config::from_env()?;

    let user_store = Arc::new(UserStore::new(&config.db_path)?);
    user_store.seed_users(&config.seed_users)?;
    info!("🔐 User store initialized at: {}", config.db_path);

    let jwt_handler = Arc::new(JwtHandler::new(
        config.jwt_secret.clone(),
        config.token_ttl_secs,
        config.clock_skew_leeway_secs,
    ));
    info!(
        "🎫 Token service ready (ttl {}s, leeway {}s)",
        config.token_ttl_secs, config.clock_skew_leeway_secs
    );

    let auth_state = AuthState {
        user_store,
        jwt_handler,
    };

    let app = build_app(auth_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgate_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
