use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::Store;
use crate::geo::BoundingBox;
use crate::models::{
    ChatPair, ConnectionRequest, ConnectionStatus, FollowRelationship, LocatedTraveler,
    PrivateChat, TravelerProfile, UserLocation,
};

#[derive(Debug, Default)]
struct Tables {
    travelers: HashMap<Uuid, TravelerProfile>,
    locations: HashMap<Uuid, UserLocation>,
    follows: BTreeMap<(Uuid, Uuid), FollowRelationship>,
    chats: HashMap<ChatPair, PrivateChat>,
    requests: HashMap<Uuid, ConnectionRequest>,
}

/// Process-local store used by tests and `STORE_BACKEND=memory`.
///
/// A single lock guards every table, which gives the same uniqueness
/// guarantees the Postgres indexes provide.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_traveler(&self, user_id: Uuid) -> Result<Option<TravelerProfile>> {
        Ok(self.tables.lock().await.travelers.get(&user_id).cloned())
    }

    async fn upsert_traveler(&self, user_id: Uuid, display_name: &str, interests: &[String]) -> Result<TravelerProfile> {
        let now = Utc::now();
        let mut tables = self.tables.lock().await;
        let traveler = tables
            .travelers
            .entry(user_id)
            .and_modify(|t| {
                t.display_name = display_name.to_string();
                t.interests = interests.to_vec();
                t.last_active_at = t.last_active_at.max(now);
            })
            .or_insert_with(|| TravelerProfile {
                id: user_id,
                display_name: display_name.to_string(),
                interests: interests.to_vec(),
                last_active_at: now,
                created_at: now,
            });
        Ok(traveler.clone())
    }

    async fn touch_activity(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        if let Some(traveler) = self.tables.lock().await.travelers.get_mut(&user_id) {
            traveler.last_active_at = traveler.last_active_at.max(at);
        }
        Ok(())
    }

    async fn upsert_location(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
        city: Option<&str>,
        country: Option<&str>,
    ) -> Result<UserLocation> {
        let mut tables = self.tables.lock().await;
        if !tables.travelers.contains_key(&user_id) {
            return Err(anyhow::anyhow!("user_locations.user_id references missing traveler {}", user_id));
        }

        let location = UserLocation {
            user_id,
            latitude,
            longitude,
            city: city.map(str::to_string),
            country: country.map(str::to_string),
            updated_at: Utc::now(),
        };
        tables.locations.insert(user_id, location.clone());
        Ok(location)
    }

    async fn get_location(&self, user_id: Uuid) -> Result<Option<UserLocation>> {
        Ok(self.tables.lock().await.locations.get(&user_id).cloned())
    }

    async fn list_located_travelers(&self, exclude: Uuid, bounds: Option<BoundingBox>) -> Result<Vec<LocatedTraveler>> {
        let tables = self.tables.lock().await;
        let travelers = tables
            .locations
            .values()
            .filter(|l| l.user_id != exclude)
            .filter(|l| bounds.is_none_or(|b| b.contains(l.latitude, l.longitude)))
            .filter_map(|l| {
                tables.travelers.get(&l.user_id).map(|profile| LocatedTraveler {
                    profile: profile.clone(),
                    location: l.clone(),
                })
            })
            .collect();
        Ok(travelers)
    }

    async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        if follower_id == followee_id {
            return Err(anyhow::anyhow!("follows check violated: follower equals followee"));
        }
        if tables.follows.contains_key(&(follower_id, followee_id)) {
            return Ok(false);
        }
        tables.follows.insert(
            (follower_id, followee_id),
            FollowRelationship { follower_id, followee_id, created_at: Utc::now() },
        );
        Ok(true)
    }

    async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        Ok(self.tables.lock().await.follows.remove(&(follower_id, followee_id)).is_some())
    }

    async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        Ok(self.tables.lock().await.follows.contains_key(&(follower_id, followee_id)))
    }

    async fn list_followers(&self, user_id: Uuid) -> Result<Vec<FollowRelationship>> {
        let tables = self.tables.lock().await;
        let mut followers: Vec<_> = tables
            .follows
            .values()
            .filter(|f| f.followee_id == user_id)
            .cloned()
            .collect();
        followers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(followers)
    }

    async fn list_following(&self, user_id: Uuid) -> Result<Vec<FollowRelationship>> {
        let tables = self.tables.lock().await;
        let mut following: Vec<_> = tables
            .follows
            .values()
            .filter(|f| f.follower_id == user_id)
            .cloned()
            .collect();
        following.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(following)
    }

    async fn find_private_chat(&self, pair: ChatPair) -> Result<Option<PrivateChat>> {
        Ok(self.tables.lock().await.chats.get(&pair).cloned())
    }

    async fn create_private_chat_if_absent(&self, pair: ChatPair) -> Result<(PrivateChat, bool)> {
        let mut tables = self.tables.lock().await;
        if let Some(chat) = tables.chats.get(&pair) {
            return Ok((chat.clone(), false));
        }
        let chat = PrivateChat {
            id: Uuid::new_v4(),
            user_low: pair.low,
            user_high: pair.high,
            created_at: Utc::now(),
        };
        tables.chats.insert(pair, chat.clone());
        Ok((chat, true))
    }

    async fn list_private_chats(&self, user_id: Uuid) -> Result<Vec<PrivateChat>> {
        let tables = self.tables.lock().await;
        let mut chats: Vec<_> = tables
            .chats
            .values()
            .filter(|c| c.user_low == user_id || c.user_high == user_id)
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(chats)
    }

    async fn create_connection_request(&self, requester_id: Uuid, target_id: Uuid) -> Result<ConnectionRequest> {
        let mut tables = self.tables.lock().await;
        let duplicate = tables.requests.values().any(|r| {
            r.requester_id == requester_id && r.target_id == target_id && r.status == ConnectionStatus::Pending
        });
        if duplicate {
            return Err(anyhow::anyhow!("idx_connection_requests_pending violated"));
        }

        let request = ConnectionRequest {
            id: Uuid::new_v4(),
            requester_id,
            target_id,
            status: ConnectionStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };
        tables.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_pending_request(&self, requester_id: Uuid, target_id: Uuid) -> Result<Option<ConnectionRequest>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .requests
            .values()
            .find(|r| {
                r.requester_id == requester_id && r.target_id == target_id && r.status == ConnectionStatus::Pending
            })
            .cloned())
    }

    async fn get_connection_request(&self, request_id: Uuid) -> Result<Option<ConnectionRequest>> {
        Ok(self.tables.lock().await.requests.get(&request_id).cloned())
    }

    async fn resolve_connection_request(
        &self,
        request_id: Uuid,
        status: ConnectionStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<ConnectionRequest>> {
        let mut tables = self.tables.lock().await;
        match tables.requests.get_mut(&request_id) {
            Some(request) if request.status == ConnectionStatus::Pending => {
                request.status = status;
                request.responded_at = Some(at);
                Ok(Some(request.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_incoming_requests(&self, user_id: Uuid) -> Result<Vec<ConnectionRequest>> {
        let tables = self.tables.lock().await;
        let mut requests: Vec<_> = tables
            .requests
            .values()
            .filter(|r| r.target_id == user_id && r.status == ConnectionStatus::Pending)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }
}
