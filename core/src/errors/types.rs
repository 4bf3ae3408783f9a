//! Error type definitions for token validation, storage and rotation.
//!
//! Error messages here are for operators and logs; HTTP mapping belongs to
//! the caller layer.

use thiserror::Error;

/// Token-level errors
///
/// Failures in encoding, decoding or validating a signed token string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The string is not a well-formed signed structure.
    #[error("malformed token")]
    Malformed,

    /// The signature does not verify under the expected key.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token was valid but its window has passed.
    #[error("token expired")]
    Expired,

    /// Signing the claim set failed.
    #[error("token signing failed")]
    SigningFailed,

    /// The claims decoded but do not carry a usable identity.
    #[error("invalid token claims")]
    InvalidClaims,
}

/// Session store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store is unreachable or rejected the operation.
    #[error("session store error: {message}")]
    Database { message: String },

    /// A record for the same token string already exists. Inserts never
    /// silently overwrite.
    #[error("refresh token record already exists")]
    DuplicateToken,
}

/// Outcome of a failed refresh exchange.
///
/// `Reuse` carries distinct severity: it is a theft signal that has already
/// triggered revocation of every outstanding session for the user, and must
/// not be downgraded to a generic invalid-token response.
#[derive(Error, Debug)]
pub enum RotationError {
    /// The presented string failed signature or structural checks.
    #[error("invalid refresh token")]
    Invalid(#[source] TokenError),

    /// The refresh window has passed; the client simply logs in again.
    #[error("refresh token expired")]
    Expired,

    /// An already-consumed (or never-issued) token was presented.
    #[error("refresh token reuse detected")]
    Reuse,

    /// Signing the replacement pair failed; the old token is untouched.
    #[error("failed to sign replacement tokens")]
    Reissue(#[source] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
