//! Authentication API Endpoints
//! Mission: Exchange credentials for signed bearer tokens

use crate::auth::{jwt::JwtHandler, models::LoginForm, user_store::UserStore};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

/// Login endpoint - POST /auth/login
///
/// Responds 200 with the raw token string as the body. Both credential
/// failure branches answer 401; only the message text differs.
pub async fn login(
    State(state): State<AuthState>,
    Form(payload): Form<LoginForm>,
) -> Result<String, LoginError> {
    info!("🔐 Login attempt: {}", payload.username);

    let user = state
        .user_store
        .get_user_by_username(&payload.username)
        .map_err(|e| {
            error!("User lookup failed: {e}");
            LoginError::Store
        })?
        .ok_or_else(|| {
            warn!("❌ Login failed, unknown user: {}", payload.username);
            LoginError::UserNotFound
        })?;

    let valid = UserStore::verify_password(&user, &payload.password).map_err(|e| {
        error!("Password verification failed: {e}");
        LoginError::Store
    })?;

    if !valid {
        warn!("❌ Failed login attempt: {}", payload.username);
        return Err(LoginError::WrongPassword);
    }

    let token = state
        .jwt_handler
        .generate_token(&user.username, user.role)
        .map_err(|e| {
            error!("Token issuance failed: {e}");
            LoginError::Store
        })?;

    info!(
        "✅ Login successful: {} ({})",
        user.username,
        user.role.as_str()
    );

    Ok(token)
}

/// Login errors
///
/// Login never mutates the user store; these only shape the response.
#[derive(Debug)]
pub enum LoginError {
    UserNotFound,
    WrongPassword,
    Store,
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            LoginError::UserNotFound => (StatusCode::UNAUTHORIZED, "Usuário não encontrado."),
            LoginError::WrongPassword => (StatusCode::UNAUTHORIZED, "Senha incorreta."),
            LoginError::Store => (StatusCode::INTERNAL_SERVER_ERROR, "Erro interno no servidor."),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_responses() {
        let not_found = LoginError::UserNotFound.into_response();
        assert_eq!(not_found.status(), StatusCode::UNAUTHORIZED);

        let wrong_password = LoginError::WrongPassword.into_response();
        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

        let store = LoginError::Store.into_response();
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
