//! Token entities for the session credential engine.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 15 * 60;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

/// Claims carried by a short-lived access token.
///
/// Ephemeral: exists only as a signed string handed to the caller, never
/// persisted. The `jti` makes every issued string unique even when two
/// tokens for the same user are signed within the same second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// User email; absent on tokens reissued through rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Unique identifier for this issuance
    pub jti: String,
}

impl AccessClaims {
    /// Creates claims for a new access token expiring `ttl` from now.
    pub fn new(user_id: Uuid, email: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            email,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the user ID from the claims.
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Claims carried by a long-lived, single-use refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Unique identifier for this issuance
    pub jti: String,
}

impl RefreshClaims {
    /// Creates claims for a new refresh token expiring `ttl` from now.
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Expiry as a UTC timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }

    /// Gets the user ID from the claims.
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Persisted record of an outstanding (issued but not yet consumed) refresh
/// token.
///
/// The record's presence in the store is the sole proof that the token is
/// still valid-and-unused; signature validity of the token string alone is
/// necessary but not sufficient. Records are keyed by a SHA-256 digest of the
/// exact issued token string, so a store compromise does not directly yield
/// usable credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// User ID this token belongs to
    pub user_id: Uuid,

    /// SHA-256 hex digest of the issued token string
    pub token_hash: String,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Creates a new record for a freshly issued refresh token.
    pub fn new(user_id: Uuid, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            token_hash,
            expires_at,
            created_at: Utc::now(),
        }
    }

    /// Checks if the record's refresh window has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Token pair returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair.
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims() {
        let user_id = Uuid::new_v4();
        let claims = AccessClaims::new(
            user_id,
            Some("user@example.com".to_string()),
            Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS),
        );

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, Some("user@example.com".to_string()));
        assert!(!claims.is_expired());
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_EXPIRY_SECS);
    }

    #[test]
    fn test_refresh_claims() {
        let user_id = Uuid::new_v4();
        let claims = RefreshClaims::new(user_id, Duration::seconds(REFRESH_TOKEN_EXPIRY_SECS));

        assert_eq!(claims.sub, user_id.to_string());
        assert!(!claims.is_expired());
        assert_eq!(claims.expires_at().timestamp(), claims.exp);
    }

    #[test]
    fn test_claims_jti_uniqueness() {
        let user_id = Uuid::new_v4();
        let a = RefreshClaims::new(user_id, Duration::days(7));
        let b = RefreshClaims::new(user_id, Duration::days(7));

        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_claims_expiration() {
        let user_id = Uuid::new_v4();
        let mut claims = AccessClaims::new(user_id, None, Duration::minutes(15));

        claims.exp = Utc::now().timestamp() - 1;

        assert!(claims.is_expired());
    }

    #[test]
    fn test_refresh_token_record() {
        let user_id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::days(7);
        let record = RefreshTokenRecord::new(user_id, "digest".to_string(), expires_at);

        assert_eq!(record.user_id, user_id);
        assert!(!record.is_expired());

        let stale = RefreshTokenRecord::new(
            user_id,
            "digest2".to_string(),
            Utc::now() - Duration::days(1),
        );
        assert!(stale.is_expired());
    }

    #[test]
    fn test_access_claims_serialization() {
        let user_id = Uuid::new_v4();
        let claims = AccessClaims::new(user_id, None, Duration::minutes(15));

        let json = serde_json::to_string(&claims).unwrap();
        // email is omitted on the wire when absent
        assert!(!json.contains("email"));

        let deserialized: AccessClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims, deserialized);
    }
}
