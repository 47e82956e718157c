use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FollowRelationship {
    pub follower_id: Uuid,
    pub followee_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Messaging eligibility for a pair of travelers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    NoRelationship,
    OneWayFollow,
    MutualFollow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutualFollowStatus {
    pub current_user_follows: bool,
    pub other_user_follows: bool,
    pub is_mutual_follow: bool,
}

impl MutualFollowStatus {
    pub fn new(current_user_follows: bool, other_user_follows: bool) -> Self {
        Self {
            current_user_follows,
            other_user_follows,
            is_mutual_follow: current_user_follows && other_user_follows,
        }
    }

    pub fn state(&self) -> ConnectionState {
        match (self.current_user_follows, self.other_user_follows) {
            (true, true) => ConnectionState::MutualFollow,
            (false, false) => ConnectionState::NoRelationship,
            _ => ConnectionState::OneWayFollow,
        }
    }
}

/// Unordered pair of travelers; `low < high` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatPair {
    pub low: Uuid,
    pub high: Uuid,
}

impl ChatPair {
    pub fn new(a: Uuid, b: Uuid) -> Self {
        if a < b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn other(&self, user_id: Uuid) -> Uuid {
        if self.low == user_id { self.high } else { self.low }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PrivateChat {
    pub id: Uuid,
    pub user_low: Uuid,
    pub user_high: Uuid,
    pub created_at: DateTime<Utc>,
}

impl PrivateChat {
    pub fn pair(&self) -> ChatPair {
        ChatPair { low: self.user_low, high: self.user_high }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateChatOpened {
    pub chat_id: Uuid,
    pub is_new: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateChatSummary {
    pub chat_id: Uuid,
    pub other_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub can_message: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(anyhow::anyhow!("Unknown connection request status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub target_id: Uuid,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}
