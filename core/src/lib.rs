//! # TokenGate Core
//!
//! Core domain layer for the TokenGate session token engine. This crate
//! contains the token entities, the refresh-token store interface (plus an
//! in-memory implementation), the token services (codec, issuer, validator,
//! session service) and the error types shared across the workspace.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
