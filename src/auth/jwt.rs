//! JWT Token Handler
//! Mission: Issue and validate signed bearer tokens

use crate::auth::models::{Claims, UserRole};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// JWT Handler for token operations
///
/// Holds the process-wide signing secret. Read-only after startup, so a
/// single handler can be shared across all request tasks without locking.
pub struct JwtHandler {
    secret: String,
    ttl_secs: u64,
    leeway_secs: u64,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key, token TTL and clock-skew leeway
    pub fn new(secret: String, ttl_secs: u64, leeway_secs: u64) -> Self {
        Self {
            secret,
            ttl_secs,
            leeway_secs,
        }
    }

    /// Issue a signed token for a username + role
    pub fn generate_token(&self, username: &str, role: UserRole) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::seconds(self.ttl_secs as i64))
            .context("Invalid expiry timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: username.to_string(),
            role,
            iat: now.timestamp() as usize,
            exp: expiration,
        };

        debug!(
            "Issuing JWT for {} ({}), ttl {}s",
            username,
            role.as_str(),
            self.ttl_secs
        );

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign JWT")
    }

    /// Decode a token, verifying signature, structure and expiry
    pub fn decode_claims(&self, token: &str) -> Result<Claims> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &self.validation(),
        )
        .context("Invalid or expired token")?;

        Ok(decoded.claims)
    }

    /// Check whether a token is currently valid
    ///
    /// Malformed, tampered and expired tokens all come back `false`;
    /// validation failures are routine, not errors.
    pub fn validate_token(&self, token: &str) -> bool {
        self.decode_claims(token).is_ok()
    }

    /// Extract the subject (username) claim from a verified token
    pub fn extract_username(&self, token: &str) -> Result<String> {
        let claims = self
            .decode_claims(token)
            .context("Failed to extract subject claim")?;
        Ok(claims.sub)
    }

    /// Extract the role claim from a verified token
    pub fn extract_role(&self, token: &str) -> Result<UserRole> {
        let claims = self
            .decode_claims(token)
            .context("Failed to extract role claim")?;
        Ok(claims.role)
    }

    fn validation(&self) -> Validation {
        // Validation::default() tolerates 60s of clock skew; use the
        // configured leeway instead (zero unless set).
        let mut validation = Validation::default();
        validation.leeway = self.leeway_secs;
        validation
    }
}
