//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT signing secrets and token lifetimes
//! - `database` - Database connection and pool configuration

pub mod auth;
pub mod database;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use database::DatabaseConfig;
