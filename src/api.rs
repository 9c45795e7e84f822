//! Protected API Endpoints
//! Mission: Serve role-gated resources behind the auth middleware

use crate::auth::middleware::extract_context;
use axum::{extract::Request, http::StatusCode};
use tracing::debug;

/// Greeting for any authenticated user - GET /api/hello
pub async fn hello(req: Request) -> Result<&'static str, StatusCode> {
    let ctx = extract_context(&req).ok_or(StatusCode::UNAUTHORIZED)?;
    debug!("👋 Protected greeting served to {}", ctx.username);

    Ok("Olá! Você acessou um endpoint protegido com sucesso!")
}

/// Admin-only resource - GET /api/admin
///
/// The role check already happened in the middleware; by the time this
/// handler runs the context role is Admin.
pub async fn admin(req: Request) -> Result<&'static str, StatusCode> {
    let ctx = extract_context(&req).ok_or(StatusCode::UNAUTHORIZED)?;
    debug!("🛡️ Admin resource served to {}", ctx.username);

    Ok("Bem-vindo, Administrador! Este é um recurso restrito.")
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "🚀 Authgate Operational"
}
