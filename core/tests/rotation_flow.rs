//! End-to-end rotation behavior through the public crate surface.

use std::sync::Arc;

use tg_core::errors::RotationError;
use tg_core::repositories::{MemorySessionStore, SessionStore};
use tg_core::services::token::{SessionService, TokenServiceConfig};
use uuid::Uuid;

fn service_with_store() -> (Arc<SessionService<MemorySessionStore>>, MemorySessionStore) {
    let store = MemorySessionStore::new();
    let config = TokenServiceConfig {
        access_secret: "integration-access-secret".to_string(),
        refresh_secret: Some("integration-refresh-secret".to_string()),
        ..Default::default()
    };
    (Arc::new(SessionService::new(store.clone(), config)), store)
}

#[tokio::test]
async fn full_session_lifecycle() {
    let (service, store) = service_with_store();
    let user_id = Uuid::new_v4();

    let pair = service
        .issue_initial_pair(user_id, "user@example.com")
        .await
        .unwrap();

    // Bearer requests verify without touching the store.
    let claims = service.authenticate(&pair.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user_id);

    // One rotation, then the chain continues from the replacement.
    let rotated = service.rotate(&pair.refresh_token).await.unwrap();
    let again = service.rotate(&rotated.refresh_token).await.unwrap();
    assert_eq!(store.count_for_user(user_id).await.unwrap(), 1);

    // The first token is long consumed: theft signal, everything revoked.
    let result = service.rotate(&pair.refresh_token).await;
    assert!(matches!(result, Err(RotationError::Reuse)));
    assert_eq!(store.count_for_user(user_id).await.unwrap(), 0);

    // Including the newest replacement.
    let result = service.rotate(&again.refresh_token).await;
    assert!(matches!(result, Err(RotationError::Reuse)));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_rotation_has_exactly_one_winner() {
    let (service, store) = service_with_store();
    let user_id = Uuid::new_v4();

    let pair = service
        .issue_initial_pair(user_id, "user@example.com")
        .await
        .unwrap();
    let contested = pair.refresh_token;

    let a = {
        let service = Arc::clone(&service);
        let token = contested.clone();
        tokio::spawn(async move { service.rotate(&token).await })
    };
    let b = {
        let service = Arc::clone(&service);
        let token = contested.clone();
        tokio::spawn(async move { service.rotate(&token).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    let reuses = results
        .iter()
        .filter(|r| matches!(r, Err(RotationError::Reuse)))
        .count();

    assert_eq!(wins, 1);
    assert_eq!(reuses, 1);
    // The loser's theft response revoked the winner's replacement too.
    assert_eq!(store.count_for_user(user_id).await.unwrap(), 0);
}
