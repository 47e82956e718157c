use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::TravelerProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserLocation {
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub country: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A discovery candidate: a profile joined with its stored location.
#[derive(Debug, Clone)]
pub struct LocatedTraveler {
    pub profile: TravelerProfile,
    pub location: UserLocation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyUser {
    pub user_id: Uuid,
    pub display_name: String,
    pub interests: Vec<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub distance_km: f64,
    pub mutual_interest_count: usize,
    pub is_online: bool,
    pub last_active_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResponse {
    pub users: Vec<NearbyUser>,
    pub count: usize,
}

impl From<Vec<NearbyUser>> for NearbyResponse {
    fn from(users: Vec<NearbyUser>) -> Self {
        Self { count: users.len(), users }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyStats {
    pub total_users: usize,
    pub nearby_count: usize,
    pub online_count: usize,
    pub shared_interest_count: usize,
}
