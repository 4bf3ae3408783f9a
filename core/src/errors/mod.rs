//! Error types for the session token engine.

mod types;

pub use types::{RotationError, StoreError, TokenError};

use thiserror::Error;

/// Umbrella error for session operations that touch both the signing layer
/// and the store (initial issuance, logout).
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SessionResult<T> = Result<T, SessionError>;
