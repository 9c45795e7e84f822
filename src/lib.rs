//! Authgate Backend Library
//!
//! Exposes core modules for use by the server binary and tests.

pub mod api;
pub mod auth;
pub mod config;

use crate::auth::{
    auth_middleware, AccessRule, AuthGuard, AuthState, RoutePolicy, UserRole,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the full application router
///
/// Shared by main and the integration tests so both drive the exact same
/// route set, middleware stack and access rules.
pub fn build_app(auth_state: AuthState) -> Router {
    // Ordered access rules for protected routes, evaluated first-match.
    let policy = RoutePolicy::new()
        .require("/api/admin", AccessRule::Roles(vec![UserRole::Admin]))
        .require("/api/hello", AccessRule::Authenticated);

    let guard = AuthGuard {
        jwt_handler: auth_state.jwt_handler.clone(),
        policy: Arc::new(policy),
    };

    let auth_router = Router::new()
        .route("/auth/login", post(auth::api::login))
        .with_state(auth_state);

    let protected_routes = Router::new()
        .route("/api/hello", get(api::hello))
        .route("/api/admin", get(api::admin))
        .route_layer(middleware::from_fn_with_state(guard, auth_middleware));

    let public_routes = Router::new().route("/health", get(api::health_check));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_router)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
