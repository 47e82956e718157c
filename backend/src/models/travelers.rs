use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TravelerProfile {
    pub id: Uuid,
    pub display_name: String,
    pub interests: Vec<String>,
    pub last_active_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TravelerProfile {
    pub fn is_online(&self, now: DateTime<Utc>, window_secs: i64) -> bool {
        now.signed_duration_since(self.last_active_at).num_seconds() <= window_secs
    }
}
