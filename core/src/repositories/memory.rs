//! In-memory session store.
//!
//! Backs tests and single-process deployments. Every operation holds the one
//! mutex for its full read-modify-write section, which is what makes
//! `consume` and `consume_and_replace` atomic here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::StoreError;
use crate::repositories::session_store::{ConsumeOutcome, SessionStore};

/// Mutex-guarded map of outstanding refresh token records, keyed by digest.
///
/// Cloning is cheap and shares the underlying map.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    records: Arc<Mutex<HashMap<String, RefreshTokenRecord>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;

        if records.contains_key(&record.token_hash) {
            return Err(StoreError::DuplicateToken);
        }

        records.insert(record.token_hash.clone(), record);
        Ok(())
    }

    async fn consume(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let mut records = self.records.lock().await;
        Ok(records.remove(token_hash))
    }

    async fn consume_and_replace(
        &self,
        token_hash: &str,
        replacement: RefreshTokenRecord,
    ) -> Result<ConsumeOutcome, StoreError> {
        let mut records = self.records.lock().await;

        if replacement.token_hash != token_hash && records.contains_key(&replacement.token_hash) {
            return Err(StoreError::DuplicateToken);
        }

        match records.remove(token_hash) {
            None => Ok(ConsumeOutcome::NotFound),
            Some(old) if old.is_expired() => Ok(ConsumeOutcome::Stale(old)),
            Some(old) => {
                records.insert(replacement.token_hash.clone(), replacement);
                Ok(ConsumeOutcome::Replaced(old))
            }
        }
    }

    async fn delete_one(&self, token_hash: &str) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;
        Ok(records.remove(token_hash).is_some())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<usize, StoreError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| record.user_id != user_id);
        Ok(before - records.len())
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<usize, StoreError> {
        let records = self.records.lock().await;
        Ok(records
            .values()
            .filter(|record| record.user_id == user_id)
            .count())
    }

    async fn delete_expired(&self) -> Result<usize, StoreError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired());
        Ok(before - records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn live_record(user_id: Uuid, hash: &str) -> RefreshTokenRecord {
        RefreshTokenRecord::new(user_id, hash.to_string(), Utc::now() + Duration::days(7))
    }

    fn stale_record(user_id: Uuid, hash: &str) -> RefreshTokenRecord {
        RefreshTokenRecord::new(user_id, hash.to_string(), Utc::now() - Duration::hours(1))
    }

    #[tokio::test]
    async fn test_insert_and_consume() {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();

        store.insert(live_record(user_id, "digest-1")).await.unwrap();

        let consumed = store.consume("digest-1").await.unwrap();
        assert_eq!(consumed.unwrap().user_id, user_id);

        // Already gone: second consume loses.
        assert!(store.consume("digest-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate() {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();

        store.insert(live_record(user_id, "digest-1")).await.unwrap();
        let result = store.insert(live_record(user_id, "digest-1")).await;

        assert!(matches!(result, Err(StoreError::DuplicateToken)));
    }

    #[tokio::test]
    async fn test_consume_and_replace_live_record() {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();

        store.insert(live_record(user_id, "old")).await.unwrap();

        let outcome = store
            .consume_and_replace("old", live_record(user_id, "new"))
            .await
            .unwrap();

        assert!(matches!(outcome, ConsumeOutcome::Replaced(ref old) if old.token_hash == "old"));
        assert!(store.consume("old").await.unwrap().is_none());
        assert!(store.consume("new").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_consume_and_replace_stale_record() {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();

        store.insert(stale_record(user_id, "old")).await.unwrap();

        let outcome = store
            .consume_and_replace("old", live_record(user_id, "new"))
            .await
            .unwrap();

        assert!(matches!(outcome, ConsumeOutcome::Stale(_)));
        // Stale record deleted on discovery, replacement not inserted.
        assert_eq!(store.count_for_user(user_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_consume_and_replace_not_found() {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();

        let outcome = store
            .consume_and_replace("never-issued", live_record(user_id, "new"))
            .await
            .unwrap();

        assert!(matches!(outcome, ConsumeOutcome::NotFound));
        assert_eq!(store.count_for_user(user_id).await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_consume_has_one_winner() {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();

        store.insert(live_record(user_id, "contested")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.consume("contested").await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_delete_one_is_idempotent() {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();

        store.insert(live_record(user_id, "digest-1")).await.unwrap();

        assert!(store.delete_one("digest-1").await.unwrap());
        assert!(!store.delete_one("digest-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_all_for_user() {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();
        let other = Uuid::new_v4();

        for i in 0..3 {
            store
                .insert(live_record(user_id, &format!("digest-{i}")))
                .await
                .unwrap();
        }
        store.insert(live_record(other, "other-digest")).await.unwrap();

        let deleted = store.delete_all_for_user(user_id).await.unwrap();

        assert_eq!(deleted, 3);
        assert_eq!(store.count_for_user(user_id).await.unwrap(), 0);
        assert_eq!(store.count_for_user(other).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();

        store.insert(live_record(user_id, "live")).await.unwrap();
        store.insert(stale_record(user_id, "stale")).await.unwrap();

        let purged = store.delete_expired().await.unwrap();

        assert_eq!(purged, 1);
        assert_eq!(store.count_for_user(user_id).await.unwrap(), 1);
    }
}
