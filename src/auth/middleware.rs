//! Authorization Middleware
//! Mission: Gate protected routes on token validity and role claims

use crate::auth::{jwt::JwtHandler, models::UserRole};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Access requirement for a protected route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRule {
    /// Any valid token is enough
    Authenticated,
    /// Token role must be one of the listed roles
    Roles(Vec<UserRole>),
}

impl AccessRule {
    fn allows(&self, role: UserRole) -> bool {
        match self {
            AccessRule::Authenticated => true,
            AccessRule::Roles(roles) => roles.contains(&role),
        }
    }
}

/// Ordered (route pattern, access rule) table, evaluated first-match
///
/// Patterns match the request path exactly, or as a prefix when they end
/// in `/*`. Routes without a matching rule only require a valid token.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    rules: Vec<(String, AccessRule)>,
}

impl RoutePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, pattern: &str, rule: AccessRule) -> Self {
        self.rules.push((pattern.to_string(), rule));
        self
    }

    pub fn rule_for(&self, path: &str) -> Option<&AccessRule> {
        self.rules
            .iter()
            .find(|(pattern, _)| Self::matches(pattern, path))
            .map(|(_, rule)| rule)
    }

    fn matches(pattern: &str, path: &str) -> bool {
        if let Some(prefix) = pattern.strip_suffix("/*") {
            path.starts_with(prefix)
        } else {
            pattern == path
        }
    }
}

/// Per-request identity derived from a validated token
///
/// Lives in the request extensions for exactly one request. The role is
/// taken from the token verbatim - no store lookup on the hot path.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub username: String,
    pub role: UserRole,
}

/// State for the auth middleware: token verifier + route rules
#[derive(Clone)]
pub struct AuthGuard {
    pub jwt_handler: Arc<JwtHandler>,
    pub policy: Arc<RoutePolicy>,
}

/// Auth middleware that validates bearer tokens and enforces route roles
///
/// 401 for a missing or invalid token, 403 for a valid token whose role
/// does not satisfy the matched rule.
pub async fn auth_middleware(
    State(guard): State<AuthGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    let claims = guard
        .jwt_handler
        .decode_claims(token)
        .map_err(|_| AuthError::InvalidToken)?;

    if let Some(rule) = guard.policy.rule_for(req.uri().path()) {
        if !rule.allows(claims.role) {
            warn!(
                "🚫 Role {} denied for {} on {}",
                claims.role.as_str(),
                claims.sub,
                req.uri().path()
            );
            return Err(AuthError::Forbidden);
        }
    }

    req.extensions_mut().insert(AuthContext {
        username: claims.sub,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Extract the auth context from a request (use after auth middleware)
pub fn extract_context(req: &Request) -> Option<&AuthContext> {
    req.extensions().get::<AuthContext>()
}

/// Auth error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidFormat,
    InvalidToken,
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::InvalidFormat => (
                StatusCode::UNAUTHORIZED,
                "Invalid authorization format. Use: Bearer {token}",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Insufficient permissions"),
        };

        (status, message).into_response()
    }
}
