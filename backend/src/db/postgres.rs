use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{chats, connection_requests, follows, locations, travelers, Store};
use crate::geo::BoundingBox;
use crate::models::{
    ChatPair, ConnectionRequest, ConnectionStatus, FollowRelationship, LocatedTraveler,
    PrivateChat, TravelerProfile, UserLocation,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_traveler(&self, user_id: Uuid) -> Result<Option<TravelerProfile>> {
        travelers::get_traveler(&self.pool, user_id).await
    }

    async fn upsert_traveler(&self, user_id: Uuid, display_name: &str, interests: &[String]) -> Result<TravelerProfile> {
        travelers::upsert_traveler(&self.pool, user_id, display_name, interests).await
    }

    async fn touch_activity(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        travelers::touch_activity(&self.pool, user_id, at).await
    }

    async fn upsert_location(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
        city: Option<&str>,
        country: Option<&str>,
    ) -> Result<UserLocation> {
        locations::upsert_location(&self.pool, user_id, latitude, longitude, city, country).await
    }

    async fn get_location(&self, user_id: Uuid) -> Result<Option<UserLocation>> {
        locations::get_location(&self.pool, user_id).await
    }

    async fn list_located_travelers(&self, exclude: Uuid, bounds: Option<BoundingBox>) -> Result<Vec<LocatedTraveler>> {
        locations::list_located_travelers(&self.pool, exclude, bounds).await
    }

    async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        follows::follow(&self.pool, follower_id, followee_id).await
    }

    async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        follows::unfollow(&self.pool, follower_id, followee_id).await
    }

    async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        follows::is_following(&self.pool, follower_id, followee_id).await
    }

    async fn list_followers(&self, user_id: Uuid) -> Result<Vec<FollowRelationship>> {
        follows::list_followers(&self.pool, user_id).await
    }

    async fn list_following(&self, user_id: Uuid) -> Result<Vec<FollowRelationship>> {
        follows::list_following(&self.pool, user_id).await
    }

    async fn find_private_chat(&self, pair: ChatPair) -> Result<Option<PrivateChat>> {
        chats::find_private_chat(&self.pool, pair).await
    }

    async fn create_private_chat_if_absent(&self, pair: ChatPair) -> Result<(PrivateChat, bool)> {
        chats::create_private_chat_if_absent(&self.pool, pair).await
    }

    async fn list_private_chats(&self, user_id: Uuid) -> Result<Vec<PrivateChat>> {
        chats::list_private_chats(&self.pool, user_id).await
    }

    async fn create_connection_request(&self, requester_id: Uuid, target_id: Uuid) -> Result<ConnectionRequest> {
        connection_requests::create_connection_request(&self.pool, requester_id, target_id).await
    }

    async fn find_pending_request(&self, requester_id: Uuid, target_id: Uuid) -> Result<Option<ConnectionRequest>> {
        connection_requests::find_pending_request(&self.pool, requester_id, target_id).await
    }

    async fn get_connection_request(&self, request_id: Uuid) -> Result<Option<ConnectionRequest>> {
        connection_requests::get_connection_request(&self.pool, request_id).await
    }

    async fn resolve_connection_request(
        &self,
        request_id: Uuid,
        status: ConnectionStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<ConnectionRequest>> {
        connection_requests::resolve_connection_request(&self.pool, request_id, status, at).await
    }

    async fn list_incoming_requests(&self, user_id: Uuid) -> Result<Vec<ConnectionRequest>> {
        connection_requests::list_incoming_requests(&self.pool, user_id).await
    }
}
