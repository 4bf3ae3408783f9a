//! Token validation against the correct signing context.

use crate::domain::entities::token::{AccessClaims, RefreshClaims};
use crate::errors::TokenError;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// Verifies presented token strings. Pure: no store access, so it cannot by
/// itself detect that a syntactically valid refresh token has already been
/// consumed.
pub struct TokenValidator {
    access_codec: TokenCodec,
    refresh_codec: TokenCodec,
}

impl TokenValidator {
    pub fn new(config: &TokenServiceConfig) -> Self {
        Self {
            access_codec: TokenCodec::new(&config.access_secret),
            refresh_codec: TokenCodec::new(config.refresh_secret()),
        }
    }

    /// Verifies signature, structure and expiry of an access token.
    pub fn validate_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = self.access_codec.decode(token)?;

        if claims.is_expired() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Verifies signature and structure of a refresh token, without the
    /// expiry check.
    ///
    /// Rotation proceeds to the store even for claims-expired tokens: the
    /// record's expiry is what distinguishes a stale-but-legitimate token
    /// from a reused one.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.refresh_codec.decode(token)
    }

    /// Verifies signature, structure and expiry of a refresh token. For
    /// callers outside the rotation path that only need a yes/no answer.
    pub fn validate_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let claims = self.decode_refresh(token)?;

        if claims.is_expired() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
