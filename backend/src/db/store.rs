use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::geo::BoundingBox;
use crate::models::{
    ChatPair, ConnectionRequest, ConnectionStatus, FollowRelationship, LocatedTraveler,
    PrivateChat, TravelerProfile, UserLocation,
};

/// Persistence primitives the services are written against.
///
/// Uniqueness of follows, chat pairs and pending requests is enforced by the
/// implementation, not by callers.
#[async_trait]
pub trait Store: Send + Sync {
    // Travelers
    async fn get_traveler(&self, user_id: Uuid) -> Result<Option<TravelerProfile>>;
    async fn upsert_traveler(&self, user_id: Uuid, display_name: &str, interests: &[String]) -> Result<TravelerProfile>;
    async fn touch_activity(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<()>;

    // Locations
    async fn upsert_location(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
        city: Option<&str>,
        country: Option<&str>,
    ) -> Result<UserLocation>;
    async fn get_location(&self, user_id: Uuid) -> Result<Option<UserLocation>>;
    /// Every traveler with a stored location except `exclude`, optionally
    /// narrowed to a bounding box.
    async fn list_located_travelers(&self, exclude: Uuid, bounds: Option<BoundingBox>) -> Result<Vec<LocatedTraveler>>;

    // Follows
    /// Returns true when a new relationship was created.
    async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool>;
    /// Returns true when a relationship was removed.
    async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool>;
    async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool>;
    async fn list_followers(&self, user_id: Uuid) -> Result<Vec<FollowRelationship>>;
    async fn list_following(&self, user_id: Uuid) -> Result<Vec<FollowRelationship>>;

    // Private chats
    async fn find_private_chat(&self, pair: ChatPair) -> Result<Option<PrivateChat>>;
    /// Inserts the chat unless one exists for the pair; the flag is true when
    /// this call created it.
    async fn create_private_chat_if_absent(&self, pair: ChatPair) -> Result<(PrivateChat, bool)>;
    async fn list_private_chats(&self, user_id: Uuid) -> Result<Vec<PrivateChat>>;

    // Connection requests
    async fn create_connection_request(&self, requester_id: Uuid, target_id: Uuid) -> Result<ConnectionRequest>;
    async fn find_pending_request(&self, requester_id: Uuid, target_id: Uuid) -> Result<Option<ConnectionRequest>>;
    async fn get_connection_request(&self, request_id: Uuid) -> Result<Option<ConnectionRequest>>;
    /// Moves a pending request to `status`; `None` if it was not pending.
    async fn resolve_connection_request(
        &self,
        request_id: Uuid,
        status: ConnectionStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<ConnectionRequest>>;
    async fn list_incoming_requests(&self, user_id: Uuid) -> Result<Vec<ConnectionRequest>>;
}

pub type SharedStore = Arc<dyn Store>;
