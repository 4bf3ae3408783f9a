//! Token service configuration.

use tg_shared::config::JwtConfig;

use crate::domain::entities::token::{ACCESS_TOKEN_EXPIRY_SECS, REFRESH_TOKEN_EXPIRY_SECS};

/// Configuration for the session token service.
///
/// Signing material is passed in explicitly rather than read from ambient
/// environment state, so the engine is testable with injected keys.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Secret for signing access tokens
    pub access_secret: String,
    /// Secret for signing refresh tokens; falls back to `access_secret`
    pub refresh_secret: Option<String>,
    /// Access token lifetime in seconds
    pub access_token_expiry_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_expiry_secs: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            access_secret: "development-secret-please-change-in-production".to_string(),
            refresh_secret: None,
            access_token_expiry_secs: ACCESS_TOKEN_EXPIRY_SECS,
            refresh_token_expiry_secs: REFRESH_TOKEN_EXPIRY_SECS,
        }
    }
}

impl TokenServiceConfig {
    /// The effective refresh signing secret, with the documented fallback.
    pub fn refresh_secret(&self) -> &str {
        self.refresh_secret.as_deref().unwrap_or(&self.access_secret)
    }

    /// True when refresh tokens share the access signing key. The session
    /// service flags this degraded mode at startup.
    pub fn refresh_key_is_shared(&self) -> bool {
        self.refresh_secret.is_none()
    }
}

impl From<JwtConfig> for TokenServiceConfig {
    fn from(config: JwtConfig) -> Self {
        Self {
            access_secret: config.access_secret,
            refresh_secret: config.refresh_secret,
            access_token_expiry_secs: config.access_token_expiry,
            refresh_token_expiry_secs: config.refresh_token_expiry,
        }
    }
}
