use chrono::Utc;
use uuid::Uuid;

use crate::db::Store;
use crate::error::AppError;
use crate::models::{ConnectionRequest, ConnectionStatus, FollowRelationship};

async fn validate_target(store: &dyn Store, user_id: Uuid, target_id: Uuid) -> Result<(), AppError> {
    if user_id == target_id {
        return Err(AppError::validation("You cannot follow yourself"));
    }
    if store.get_traveler(target_id).await?.is_none() {
        return Err(AppError::not_found("Traveler"));
    }
    Ok(())
}

/// Idempotent; returns true when the relationship is new.
pub async fn follow(store: &dyn Store, user_id: Uuid, target_id: Uuid) -> Result<bool, AppError> {
    validate_target(store, user_id, target_id).await?;
    let created = store.follow(user_id, target_id).await?;
    if created {
        tracing::debug!("{} now follows {}", user_id, target_id);
    }
    Ok(created)
}

/// Idempotent; returns true when a relationship was removed.
pub async fn unfollow(store: &dyn Store, user_id: Uuid, target_id: Uuid) -> Result<bool, AppError> {
    let removed = store.unfollow(user_id, target_id).await?;
    if removed {
        tracing::debug!("{} unfollowed {}", user_id, target_id);
    }
    Ok(removed)
}

pub async fn list_followers(store: &dyn Store, user_id: Uuid) -> Result<Vec<FollowRelationship>, AppError> {
    Ok(store.list_followers(user_id).await?)
}

pub async fn list_following(store: &dyn Store, user_id: Uuid) -> Result<Vec<FollowRelationship>, AppError> {
    Ok(store.list_following(user_id).await?)
}

/// Follows are written before the request leaves `Pending`, so a failed
/// write leaves a request that can still be accepted again.
async fn accept(store: &dyn Store, request: &ConnectionRequest) -> Result<ConnectionRequest, AppError> {
    store.follow(request.target_id, request.requester_id).await?;
    store.follow(request.requester_id, request.target_id).await?;
    store
        .resolve_connection_request(request.id, ConnectionStatus::Accepted, Utc::now())
        .await?
        .ok_or_else(|| AppError::validation("Connection request is no longer pending"))
}

/// Asks `target_id` to connect. The requester follows the target right away;
/// a crossing request from the target is accepted instead of duplicated.
pub async fn send_connection_request(store: &dyn Store, user_id: Uuid, target_id: Uuid) -> Result<ConnectionRequest, AppError> {
    validate_target(store, user_id, target_id).await?;

    if let Some(crossing) = store.find_pending_request(target_id, user_id).await? {
        tracing::info!("Crossing connection requests between {} and {}, accepting", user_id, target_id);
        return accept(store, &crossing).await;
    }

    store.follow(user_id, target_id).await?;

    if let Some(existing) = store.find_pending_request(user_id, target_id).await? {
        return Ok(existing);
    }

    let request = store.create_connection_request(user_id, target_id).await?;
    tracing::info!("Connection request {} from {} to {}", request.id, user_id, target_id);
    Ok(request)
}

/// Accepts or rejects a pending request addressed to `user_id`.
pub async fn respond_connection_request(
    store: &dyn Store,
    user_id: Uuid,
    request_id: Uuid,
    accept_request: bool,
) -> Result<ConnectionRequest, AppError> {
    let request = store
        .get_connection_request(request_id)
        .await?
        .filter(|r| r.target_id == user_id)
        .ok_or_else(|| AppError::not_found("Connection request"))?;

    if request.status != ConnectionStatus::Pending {
        return Err(AppError::validation(format!("Connection request is already {}", request.status)));
    }

    if accept_request {
        return accept(store, &request).await;
    }

    store
        .resolve_connection_request(request.id, ConnectionStatus::Rejected, Utc::now())
        .await?
        .ok_or_else(|| AppError::validation("Connection request is no longer pending"))
}

pub async fn list_incoming_requests(store: &dyn Store, user_id: Uuid) -> Result<Vec<ConnectionRequest>, AppError> {
    Ok(store.list_incoming_requests(user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FaultyStore, MemoryStore};
    use crate::services::gate;

    async fn travelers(store: &MemoryStore) -> (Uuid, Uuid) {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.upsert_traveler(a, "a", &[]).await.unwrap();
        store.upsert_traveler(b, "b", &[]).await.unwrap();
        (a, b)
    }

    #[tokio::test]
    async fn test_follow_validation() {
        let store = MemoryStore::new();
        let (a, b) = travelers(&store).await;

        assert!(matches!(follow(&store, a, a).await, Err(AppError::Validation(_))));
        assert!(matches!(follow(&store, a, Uuid::new_v4()).await, Err(AppError::NotFound(_))));
        assert!(follow(&store, a, b).await.unwrap());
        assert!(!follow(&store, a, b).await.unwrap());
        assert_eq!(list_followers(&store, b).await.unwrap()[0].follower_id, a);
        assert!(unfollow(&store, a, b).await.unwrap());
        assert!(list_following(&store, a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_accepted_request_makes_pair_mutual() {
        let store = MemoryStore::new();
        let (a, b) = travelers(&store).await;

        let request = send_connection_request(&store, a, b).await.unwrap();
        assert_eq!(request.status, ConnectionStatus::Pending);
        assert_eq!(
            gate::check_mutual_follow(&store, a, b).await.unwrap(),
            crate::models::MutualFollowStatus::new(true, false)
        );

        // Resending returns the same pending request
        assert_eq!(send_connection_request(&store, a, b).await.unwrap().id, request.id);
        assert_eq!(list_incoming_requests(&store, b).await.unwrap().len(), 1);

        // Only the target can respond
        assert!(matches!(
            respond_connection_request(&store, a, request.id, true).await,
            Err(AppError::NotFound(_))
        ));

        let accepted = respond_connection_request(&store, b, request.id, true).await.unwrap();
        assert_eq!(accepted.status, ConnectionStatus::Accepted);
        assert!(gate::check_mutual_follow(&store, a, b).await.unwrap().is_mutual_follow);
        assert!(list_incoming_requests(&store, b).await.unwrap().is_empty());

        assert!(matches!(
            respond_connection_request(&store, b, request.id, false).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_rejected_request_leaves_one_way_follow() {
        let store = MemoryStore::new();
        let (a, b) = travelers(&store).await;

        let request = send_connection_request(&store, a, b).await.unwrap();
        let rejected = respond_connection_request(&store, b, request.id, false).await.unwrap();
        assert_eq!(rejected.status, ConnectionStatus::Rejected);
        assert!(!gate::check_mutual_follow(&store, a, b).await.unwrap().is_mutual_follow);
    }

    #[tokio::test]
    async fn test_failed_accept_can_be_retried() {
        let store = FaultyStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.upsert_traveler(a, "a", &[]).await.unwrap();
        store.upsert_traveler(b, "b", &[]).await.unwrap();
        let request = send_connection_request(&store, a, b).await.unwrap();

        store.fail_writes(true);
        assert!(matches!(
            respond_connection_request(&store, b, request.id, true).await,
            Err(AppError::StoreUnavailable(_))
        ));
        store.fail_writes(false);

        let still_pending = store.get_connection_request(request.id).await.unwrap().unwrap();
        assert_eq!(still_pending.status, ConnectionStatus::Pending);

        let accepted = respond_connection_request(&store, b, request.id, true).await.unwrap();
        assert_eq!(accepted.status, ConnectionStatus::Accepted);
        assert!(gate::check_mutual_follow(&store, a, b).await.unwrap().is_mutual_follow);
    }

    #[tokio::test]
    async fn test_crossing_requests_accept_each_other() {
        let store = MemoryStore::new();
        let (a, b) = travelers(&store).await;

        let first = send_connection_request(&store, a, b).await.unwrap();
        let second = send_connection_request(&store, b, a).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.status, ConnectionStatus::Accepted);
        assert!(gate::check_mutual_follow(&store, b, a).await.unwrap().is_mutual_follow);
    }
}
