//! Session service: token issuance, rotation with reuse detection, and
//! revocation.
//!
//! This is the surface the HTTP layer calls:
//! - `issue_initial_pair` after registration/login
//! - `rotate` for refresh exchanges
//! - `authenticate` for bearer-token requests
//! - `logout` / `logout_all` for revocation

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, RefreshTokenRecord, TokenPair};
use crate::errors::{RotationError, SessionError, StoreError, TokenError};
use crate::repositories::session_store::{ConsumeOutcome, SessionStore};

use super::config::TokenServiceConfig;
use super::issuer::TokenIssuer;
use super::validator::TokenValidator;

/// Orchestrates the token lifecycle over a [`SessionStore`].
///
/// The store is the only shared mutable state; issuer and validator are
/// pure, so the service is safe to share across request handlers.
pub struct SessionService<S: SessionStore> {
    store: S,
    issuer: TokenIssuer,
    validator: TokenValidator,
}

impl<S: SessionStore> SessionService<S> {
    pub fn new(store: S, config: TokenServiceConfig) -> Self {
        if config.refresh_key_is_shared() {
            tracing::warn!(
                "no dedicated refresh token secret configured; \
                 refresh tokens share the access signing key"
            );
        }

        Self {
            store,
            issuer: TokenIssuer::new(&config),
            validator: TokenValidator::new(&config),
        }
    }

    /// Issues a fresh access/refresh pair after credential verification and
    /// persists the refresh record.
    pub async fn issue_initial_pair(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<TokenPair, SessionError> {
        let access_token = self.issuer.issue_access(user_id, Some(email))?;
        let issued = self.issuer.issue_refresh(user_id)?;

        let record =
            RefreshTokenRecord::new(user_id, hash_token(&issued.token), issued.expires_at);
        self.store.insert(record).await?;

        tracing::debug!(%user_id, "initial token pair issued");
        Ok(self.pair(access_token, issued.token))
    }

    /// Exchanges a refresh token for a new access/refresh pair, invalidating
    /// the old one.
    ///
    /// The exchange is strictly single-use per token string. When the store
    /// holds no record for a structurally valid token, it was either never
    /// issued here or already consumed: both are treated as a theft signal,
    /// and every outstanding session for the user is revoked before
    /// [`RotationError::Reuse`] is returned. A record whose refresh window
    /// has passed yields [`RotationError::Expired`] with no revocation.
    pub async fn rotate(&self, refresh_token: &str) -> Result<TokenPair, RotationError> {
        // Signature/structure check only; a claims-expired token still goes
        // to the store so that stale and reused tokens stay distinguishable.
        let claims = self
            .validator
            .decode_refresh(refresh_token)
            .map_err(RotationError::Invalid)?;
        let user_id = claims
            .user_id()
            .map_err(|_| RotationError::Invalid(TokenError::InvalidClaims))?;

        // Replacements are signed up front: they are plain values, discarded
        // unless the store commits the exchange. Only the user ID is carried
        // onto the reissued access token.
        let access_token = self
            .issuer
            .issue_access(user_id, None)
            .map_err(RotationError::Reissue)?;
        let issued = self
            .issuer
            .issue_refresh(user_id)
            .map_err(RotationError::Reissue)?;
        let replacement =
            RefreshTokenRecord::new(user_id, hash_token(&issued.token), issued.expires_at);

        match self
            .store
            .consume_and_replace(&hash_token(refresh_token), replacement)
            .await?
        {
            ConsumeOutcome::Replaced(old) => {
                tracing::debug!(user_id = %old.user_id, "refresh token rotated");
                Ok(self.pair(access_token, issued.token))
            }
            ConsumeOutcome::Stale(_) => Err(RotationError::Expired),
            ConsumeOutcome::NotFound => {
                let revoked = self.store.delete_all_for_user(user_id).await?;
                tracing::warn!(
                    %user_id,
                    revoked,
                    "refresh token reuse detected; all sessions revoked"
                );
                Err(RotationError::Reuse)
            }
        }
    }

    /// Verifies an access token for an inbound authenticated request. No
    /// store access.
    pub fn authenticate(&self, access_token: &str) -> Result<AccessClaims, TokenError> {
        self.validator.validate_access(access_token)
    }

    /// Ends a single session. Idempotent: succeeds even when the record is
    /// already gone.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), StoreError> {
        let removed = self.store.delete_one(&hash_token(refresh_token)).await?;
        tracing::debug!(removed, "session logged out");
        Ok(())
    }

    /// Ends every session for the user, returning how many were revoked.
    pub async fn logout_all(&self, user_id: Uuid) -> Result<usize, StoreError> {
        let revoked = self.store.delete_all_for_user(user_id).await?;
        tracing::debug!(%user_id, revoked, "all sessions revoked");
        Ok(revoked)
    }

    /// Purges expired refresh records. Housekeeping for a periodic job;
    /// correctness does not depend on it.
    pub async fn purge_expired(&self) -> Result<usize, StoreError> {
        self.store.delete_expired().await
    }

    fn pair(&self, access_token: String, refresh_token: String) -> TokenPair {
        TokenPair::new(
            access_token,
            refresh_token,
            self.issuer.access_ttl_secs(),
            self.issuer.refresh_ttl_secs(),
        )
    }
}

/// Digest used to key refresh records, so stores never hold raw credentials.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
