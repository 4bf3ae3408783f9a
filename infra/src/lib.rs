//! # Infrastructure Layer
//!
//! Concrete persistence for the TokenGate session engine:
//! - **Database**: MySQL implementation of the core `SessionStore` trait
//!   using SQLx, with the transactional consume primitives the rotation
//!   protocol depends on.

pub mod database;

pub use database::connection::DatabasePool;
pub use database::mysql::MySqlSessionStore;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
