//! Store trait defining the interface for refresh token persistence.
//!
//! All keys handed to a store are SHA-256 hex digests of issued token
//! strings; the session service owns the hashing, stores never see raw
//! credentials.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::StoreError;

/// Result of an atomic consume-and-replace exchange.
#[derive(Debug)]
pub enum ConsumeOutcome {
    /// The old record existed and was live: it has been deleted and the
    /// replacement inserted. Carries the consumed record.
    Replaced(RefreshTokenRecord),

    /// The old record existed but its refresh window had passed: it has been
    /// deleted, the replacement was NOT inserted.
    Stale(RefreshTokenRecord),

    /// No record for this digest. Either never issued here or already
    /// consumed by a prior exchange.
    NotFound,
}

/// Persistence contract for outstanding refresh tokens.
///
/// The store is the only shared mutable state in the engine, and `consume` /
/// `consume_and_replace` are its serialization points: for concurrent calls
/// on the same digest, at most one caller may observe a successful consume;
/// every other caller observes `NotFound`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a record for a freshly issued refresh token.
    ///
    /// Fails with [`StoreError::DuplicateToken`] if a record with the same
    /// digest already exists; an insert never silently overwrites.
    async fn insert(&self, record: RefreshTokenRecord) -> Result<(), StoreError>;

    /// Atomically locate and delete the record matching the digest,
    /// returning it if found.
    ///
    /// Must be linearizable with respect to concurrent `consume` calls on
    /// the same digest: exactly one winner, all others see `None`.
    async fn consume(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// The rotation commit primitive: consume the old record, check its
    /// expiry, and insert the replacement, as one atomic unit.
    ///
    /// A crash or failure mid-exchange must leave either both the old record
    /// present and the replacement absent, or the old record gone and the
    /// replacement inserted; a half-committed state is not permitted.
    async fn consume_and_replace(
        &self,
        token_hash: &str,
        replacement: RefreshTokenRecord,
    ) -> Result<ConsumeOutcome, StoreError>;

    /// Delete a single record if present. Idempotent; returns whether a
    /// record was removed. Used for plain logout and expired-token cleanup.
    async fn delete_one(&self, token_hash: &str) -> Result<bool, StoreError>;

    /// Delete every record owned by the user, returning the count. Used for
    /// logout-all and as the theft response.
    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<usize, StoreError>;

    /// Count outstanding records for a user.
    async fn count_for_user(&self, user_id: Uuid) -> Result<usize, StoreError>;

    /// Purge records whose refresh window has passed.
    ///
    /// Housekeeping only; expiry is enforced at consume time regardless.
    async fn delete_expired(&self) -> Result<usize, StoreError>;
}
