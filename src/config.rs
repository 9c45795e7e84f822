//! Configuration
//! Mission: Collect all runtime configuration once at startup

use crate::auth::models::UserRole;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;

/// A user to insert at startup if absent
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

/// Immutable application configuration, built once in main
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub clock_skew_leeway_secs: u64,
    pub db_path: String,
    pub port: u16,
    pub seed_users: Vec<SeedUser>,
}

const DEFAULT_SEED_USERS: &str = r#"[
  {"username": "admin", "password": "123456", "role": "ROLE_ADMIN"},
  {"username": "user", "password": "password", "role": "ROLE_USER"}
]"#;

const MIN_SECRET_BYTES: usize = 32;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        // A missing or short signing key is a startup failure, never a
        // silent fallback.
        let jwt_secret =
            env::var("JWT_SECRET").context("JWT_SECRET must be set - refusing to start")?;
        if jwt_secret.trim().len() < MIN_SECRET_BYTES {
            bail!(
                "JWT_SECRET must be at least {} bytes, got {}",
                MIN_SECRET_BYTES,
                jwt_secret.trim().len()
            );
        }

        let token_ttl_secs = env::var("TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);

        let clock_skew_leeway_secs = env::var("CLOCK_SKEW_LEEWAY_SECS")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .unwrap_or(0);

        let db_path =
            env::var("AUTH_DB_PATH").unwrap_or_else(|_| "authgate_users.db".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        let seed_users = parse_seed_users(
            &env::var("SEED_USERS").unwrap_or_else(|_| DEFAULT_SEED_USERS.to_string()),
        )?;

        Ok(Self {
            jwt_secret,
            token_ttl_secs,
            clock_skew_leeway_secs,
            db_path,
            port,
            seed_users,
        })
    }
}

/// Parse the SEED_USERS JSON array
pub fn parse_seed_users(raw: &str) -> Result<Vec<SeedUser>> {
    serde_json::from_str(raw).context("Invalid SEED_USERS JSON")
}
