//! Access and refresh token issuance.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, RefreshClaims};
use crate::errors::TokenError;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// A freshly signed refresh token together with its expiry, which the caller
/// needs to build the persisted record.
#[derive(Debug)]
pub struct IssuedRefresh {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Builds access and refresh claim sets with the configured lifetimes and
/// signs them under the matching key.
///
/// Issuance has no persistence side effects; storing the refresh record is
/// the session service's job.
pub struct TokenIssuer {
    access_codec: TokenCodec,
    refresh_codec: TokenCodec,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &TokenServiceConfig) -> Self {
        Self {
            access_codec: TokenCodec::new(&config.access_secret),
            refresh_codec: TokenCodec::new(config.refresh_secret()),
            access_ttl: Duration::seconds(config.access_token_expiry_secs),
            refresh_ttl: Duration::seconds(config.refresh_token_expiry_secs),
        }
    }

    /// Signs an access token for the user. `email` is present on login-issued
    /// tokens and absent on rotation-reissued ones.
    pub fn issue_access(&self, user_id: Uuid, email: Option<&str>) -> Result<String, TokenError> {
        let claims = AccessClaims::new(user_id, email.map(str::to_owned), self.access_ttl);
        self.access_codec.encode(&claims)
    }

    /// Signs a refresh token for the user.
    pub fn issue_refresh(&self, user_id: Uuid) -> Result<IssuedRefresh, TokenError> {
        let claims = RefreshClaims::new(user_id, self.refresh_ttl);
        let token = self.refresh_codec.encode(&claims)?;

        Ok(IssuedRefresh {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Configured access token lifetime in seconds.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Configured refresh token lifetime in seconds.
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl.num_seconds()
    }
}
