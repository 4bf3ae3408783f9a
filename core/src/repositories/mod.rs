//! Repository interfaces and in-process implementations.

pub mod memory;
pub mod session_store;

pub use memory::MemorySessionStore;
pub use session_store::{ConsumeOutcome, SessionStore};
