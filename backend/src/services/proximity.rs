use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::NEARBY_MAX_DISTANCE_KM;
use crate::db::Store;
use crate::error::AppError;
use crate::geo::{haversine_km, BoundingBox};
use crate::models::{LocatedTraveler, NearbyStats, NearbyUser, UserLocation};
use crate::services::profiles::parse_interest_filter;
use crate::utils::Config;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Distance,
    Interests,
}

impl FromStr for SortBy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "distance" => Ok(Self::Distance),
            "interests" => Ok(Self::Interests),
            other => Err(AppError::validation(format!(
                "sortBy must be 'distance' or 'interests', got '{}'",
                other
            ))),
        }
    }
}

/// Raw query string of `GET /nearby-users`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParams {
    pub max_distance: Option<f64>,
    pub interests: Option<String>,
    pub sort_by: Option<String>,
    pub show_online_only: Option<bool>,
    pub limit: Option<usize>,
}

/// Validated discovery filters.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub max_distance_km: f64,
    pub interests: BTreeSet<String>,
    pub sort_by: SortBy,
    pub online_only: bool,
    pub limit: usize,
}

impl NearbyQuery {
    pub fn from_params(params: &NearbyParams, config: &Config) -> Result<Self, AppError> {
        let max_distance_km = params.max_distance.unwrap_or(config.nearby_default_distance_km);
        if !max_distance_km.is_finite() || max_distance_km < 0.0 {
            return Err(AppError::validation("maxDistance must be a non-negative number"));
        }

        let sort_by = match params.sort_by.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortBy::default(),
        };

        Ok(Self {
            max_distance_km: max_distance_km.min(NEARBY_MAX_DISTANCE_KM),
            interests: params.interests.as_deref().map(parse_interest_filter).unwrap_or_default(),
            sort_by,
            online_only: params.show_online_only.unwrap_or(false),
            limit: params
                .limit
                .unwrap_or(config.nearby_default_limit)
                .clamp(1, config.nearby_max_limit),
        })
    }
}

fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Filters and orders candidates around `origin`.
///
/// Distance filtering uses the exact haversine value; only the reported
/// `distance_km` is rounded.
pub fn rank_candidates(
    origin: &UserLocation,
    own_interests: &BTreeSet<String>,
    candidates: Vec<LocatedTraveler>,
    query: &NearbyQuery,
    now: DateTime<Utc>,
    online_window_secs: i64,
) -> Vec<NearbyUser> {
    let mut ranked: Vec<(f64, NearbyUser)> = candidates
        .into_iter()
        .filter(|c| c.profile.id != origin.user_id)
        .filter_map(|c| {
            let distance = haversine_km(
                origin.latitude,
                origin.longitude,
                c.location.latitude,
                c.location.longitude,
            );
            if distance > query.max_distance_km {
                return None;
            }

            if !query.interests.is_empty()
                && !c.profile.interests.iter().any(|t| query.interests.contains(t))
            {
                return None;
            }

            let is_online = c.profile.is_online(now, online_window_secs);
            if query.online_only && !is_online {
                return None;
            }

            let mutual_interest_count = c
                .profile
                .interests
                .iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .filter(|t| own_interests.contains(*t))
                .count();

            Some((
                distance,
                NearbyUser {
                    user_id: c.profile.id,
                    display_name: c.profile.display_name,
                    interests: c.profile.interests,
                    city: c.location.city,
                    country: c.location.country,
                    distance_km: round_km(distance),
                    mutual_interest_count,
                    is_online,
                    last_active_at: c.profile.last_active_at,
                },
            ))
        })
        .collect();

    ranked.sort_by(|(da, a), (db, b)| {
        let by_distance = da.partial_cmp(db).unwrap_or(Ordering::Equal);
        let by_interests = b.mutual_interest_count.cmp(&a.mutual_interest_count);
        let primary = match query.sort_by {
            SortBy::Distance => by_distance.then(by_interests),
            SortBy::Interests => by_interests.then(by_distance),
        };
        primary.then_with(|| a.user_id.cmp(&b.user_id))
    });

    ranked.into_iter().take(query.limit).map(|(_, user)| user).collect()
}

async fn requester_interests(store: &dyn Store, user_id: Uuid) -> Result<BTreeSet<String>, AppError> {
    Ok(store
        .get_traveler(user_id)
        .await?
        .map(|p| p.interests.into_iter().collect())
        .unwrap_or_default())
}

/// Ranked list of travelers around the caller's stored location.
pub async fn find_nearby(
    store: &dyn Store,
    config: &Config,
    user_id: Uuid,
    query: &NearbyQuery,
) -> Result<Vec<NearbyUser>, AppError> {
    let origin = store
        .get_location(user_id)
        .await?
        .ok_or(AppError::LocationRequired)?;
    let own_interests = requester_interests(store, user_id).await?;

    let bounds = BoundingBox::around(origin.latitude, origin.longitude, query.max_distance_km);
    let candidates = store.list_located_travelers(user_id, bounds).await?;
    let scanned = candidates.len();

    let users = rank_candidates(
        &origin,
        &own_interests,
        candidates,
        query,
        Utc::now(),
        config.online_window_secs,
    );

    tracing::debug!(
        "Nearby search for {}: {} candidates scanned, {} returned (max {} km)",
        user_id,
        scanned,
        users.len(),
        query.max_distance_km
    );

    Ok(users)
}

async fn compute_stats(store: &dyn Store, config: &Config, user_id: Uuid) -> Result<NearbyStats, AppError> {
    let origin = store
        .get_location(user_id)
        .await?
        .ok_or(AppError::LocationRequired)?;
    let own_interests = requester_interests(store, user_id).await?;
    let everyone = store.list_located_travelers(user_id, None).await?;
    let now = Utc::now();

    let online_count = everyone
        .iter()
        .filter(|c| c.profile.is_online(now, config.online_window_secs))
        .count();
    let total_users = everyone.len();

    let nearby_query = NearbyQuery {
        max_distance_km: config.nearby_default_distance_km,
        interests: BTreeSet::new(),
        sort_by: SortBy::Distance,
        online_only: false,
        limit: usize::MAX,
    };
    let nearby = rank_candidates(&origin, &own_interests, everyone, &nearby_query, now, config.online_window_secs);

    Ok(NearbyStats {
        total_users,
        nearby_count: nearby.len(),
        online_count,
        shared_interest_count: nearby.iter().filter(|u| u.mutual_interest_count > 0).count(),
    })
}

/// Discovery counters for the caller. Never fails: any error yields zeros.
pub async fn nearby_stats(store: &dyn Store, config: &Config, user_id: Uuid) -> NearbyStats {
    match compute_stats(store, config, user_id).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::warn!("Falling back to empty nearby stats for {}: {}", user_id, e);
            NearbyStats::default()
        }
    }
}
