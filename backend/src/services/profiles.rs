use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::constants::*;
use crate::db::Store;
use crate::error::AppError;
use crate::models::TravelerProfile;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Lowercases and trims a tag; empty tags come back as `None`.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim().to_lowercase();
    (!tag.is_empty()).then_some(tag)
}

/// Parses the comma-separated `interests` query filter.
pub fn parse_interest_filter(raw: &str) -> BTreeSet<String> {
    raw.split(',').filter_map(normalize_tag).collect()
}

pub fn normalize_interests(raw: &[String]) -> Result<Vec<String>, AppError> {
    let mut tags = BTreeSet::new();
    for tag in raw.iter().filter_map(|t| normalize_tag(t)) {
        if tag.chars().count() > MAX_INTEREST_CHARS {
            return Err(AppError::validation(format!(
                "Interest '{}' is longer than {} characters",
                tag, MAX_INTEREST_CHARS
            )));
        }
        tags.insert(tag);
    }

    if tags.len() > MAX_INTERESTS {
        return Err(AppError::validation(format!("At most {} interests are allowed", MAX_INTERESTS)));
    }

    Ok(tags.into_iter().collect())
}

pub async fn upsert_profile(store: &dyn Store, user_id: Uuid, update: &ProfileUpdate) -> Result<TravelerProfile, AppError> {
    let display_name = update.display_name.trim();
    let name_len = display_name.chars().count();
    if name_len == 0 || name_len > MAX_DISPLAY_NAME_CHARS {
        return Err(AppError::validation(format!(
            "Display name must be between 1 and {} characters",
            MAX_DISPLAY_NAME_CHARS
        )));
    }

    let interests = normalize_interests(&update.interests)?;
    let profile = store.upsert_traveler(user_id, display_name, &interests).await?;
    tracing::debug!("Traveler {} saved profile with {} interests", user_id, profile.interests.len());

    Ok(profile)
}

pub async fn get_profile(store: &dyn Store, user_id: Uuid) -> Result<TravelerProfile, AppError> {
    store
        .get_traveler(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Traveler"))
}

/// Refreshes the presence timestamp used by the online filter.
pub async fn touch_activity(store: &dyn Store, user_id: Uuid) -> Result<(), AppError> {
    store.touch_activity(user_id, Utc::now()).await?;
    Ok(())
}
