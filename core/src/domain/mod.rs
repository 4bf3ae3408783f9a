//! Domain entities for the session token engine.

pub mod entities;

pub use entities::*;
