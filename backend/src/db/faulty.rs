use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use super::{MemoryStore, Store};
use crate::geo::BoundingBox;
use crate::models::{
    ChatPair, ConnectionRequest, ConnectionStatus, FollowRelationship, LocatedTraveler,
    PrivateChat, TravelerProfile, UserLocation,
};

/// `MemoryStore` whose reads and writes can be switched to fail, standing in
/// for a dropped database connection.
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    reads_fail: AtomicBool,
    writes_fail: AtomicBool,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.reads_fail.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.writes_fail.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> Result<()> {
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("pool timed out while reading"));
        }
        Ok(())
    }

    fn write(&self) -> Result<()> {
        if self.writes_fail.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("pool timed out while writing"));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for FaultyStore {
    async fn get_traveler(&self, user_id: Uuid) -> Result<Option<TravelerProfile>> {
        self.read()?;
        self.inner.get_traveler(user_id).await
    }

    async fn upsert_traveler(&self, user_id: Uuid, display_name: &str, interests: &[String]) -> Result<TravelerProfile> {
        self.write()?;
        self.inner.upsert_traveler(user_id, display_name, interests).await
    }

    async fn touch_activity(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        self.write()?;
        self.inner.touch_activity(user_id, at).await
    }

    async fn upsert_location(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
        city: Option<&str>,
        country: Option<&str>,
    ) -> Result<UserLocation> {
        self.write()?;
        self.inner.upsert_location(user_id, latitude, longitude, city, country).await
    }

    async fn get_location(&self, user_id: Uuid) -> Result<Option<UserLocation>> {
        self.read()?;
        self.inner.get_location(user_id).await
    }

    async fn list_located_travelers(&self, exclude: Uuid, bounds: Option<BoundingBox>) -> Result<Vec<LocatedTraveler>> {
        self.read()?;
        self.inner.list_located_travelers(exclude, bounds).await
    }

    async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        self.write()?;
        self.inner.follow(follower_id, followee_id).await
    }

    async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        self.write()?;
        self.inner.unfollow(follower_id, followee_id).await
    }

    async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        self.read()?;
        self.inner.is_following(follower_id, followee_id).await
    }

    async fn list_followers(&self, user_id: Uuid) -> Result<Vec<FollowRelationship>> {
        self.read()?;
        self.inner.list_followers(user_id).await
    }

    async fn list_following(&self, user_id: Uuid) -> Result<Vec<FollowRelationship>> {
        self.read()?;
        self.inner.list_following(user_id).await
    }

    async fn find_private_chat(&self, pair: ChatPair) -> Result<Option<PrivateChat>> {
        self.read()?;
        self.inner.find_private_chat(pair).await
    }

    async fn create_private_chat_if_absent(&self, pair: ChatPair) -> Result<(PrivateChat, bool)> {
        self.write()?;
        self.inner.create_private_chat_if_absent(pair).await
    }

    async fn list_private_chats(&self, user_id: Uuid) -> Result<Vec<PrivateChat>> {
        self.read()?;
        self.inner.list_private_chats(user_id).await
    }

    async fn create_connection_request(&self, requester_id: Uuid, target_id: Uuid) -> Result<ConnectionRequest> {
        self.write()?;
        self.inner.create_connection_request(requester_id, target_id).await
    }

    async fn find_pending_request(&self, requester_id: Uuid, target_id: Uuid) -> Result<Option<ConnectionRequest>> {
        self.read()?;
        self.inner.find_pending_request(requester_id, target_id).await
    }

    async fn get_connection_request(&self, request_id: Uuid) -> Result<Option<ConnectionRequest>> {
        self.read()?;
        self.inner.get_connection_request(request_id).await
    }

    async fn resolve_connection_request(
        &self,
        request_id: Uuid,
        status: ConnectionStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<ConnectionRequest>> {
        self.write()?;
        self.inner.resolve_connection_request(request_id, status, at).await
    }

    async fn list_incoming_requests(&self, user_id: Uuid) -> Result<Vec<ConnectionRequest>> {
        self.read()?;
        self.inner.list_incoming_requests(user_id).await
    }
}
