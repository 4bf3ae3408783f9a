//! Shared configuration types for the TokenGate server
//!
//! This crate provides the configuration surface consumed by the other
//! workspace members:
//! - JWT signing configuration (secrets and token lifetimes)
//! - Database connection and pool configuration

pub mod config;

// Re-export commonly used items at crate root
pub use config::{DatabaseConfig, JwtConfig};
