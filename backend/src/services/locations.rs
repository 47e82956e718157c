use serde::Deserialize;
use uuid::Uuid;

use crate::db::Store;
use crate::error::AppError;
use crate::geo::{is_valid_latitude, is_valid_longitude};
use crate::models::UserLocation;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub country: Option<String>,
}

fn clean_label(label: Option<&String>) -> Option<&str> {
    label.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Stores the caller's latest position, replacing any previous one.
pub async fn update_location(store: &dyn Store, user_id: Uuid, update: &LocationUpdate) -> Result<UserLocation, AppError> {
    if !is_valid_latitude(update.latitude) {
        return Err(AppError::validation("Latitude must be between -90 and 90"));
    }
    if !is_valid_longitude(update.longitude) {
        return Err(AppError::validation("Longitude must be between -180 and 180"));
    }

    if store.get_traveler(user_id).await?.is_none() {
        return Err(AppError::not_found("Traveler profile"));
    }

    let location = store
        .upsert_location(
            user_id,
            update.latitude,
            update.longitude,
            clean_label(update.city.as_ref()),
            clean_label(update.country.as_ref()),
        )
        .await?;

    tracing::debug!(
        "Traveler {} moved to ({:.4}, {:.4})",
        user_id,
        location.latitude,
        location.longitude
    );

    Ok(location)
}

pub async fn get_location(store: &dyn Store, user_id: Uuid) -> Result<UserLocation, AppError> {
    store
        .get_location(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Location"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FaultyStore, MemoryStore};

    fn update(latitude: f64, longitude: f64) -> LocationUpdate {
        LocationUpdate { latitude, longitude, city: Some("  Porto ".into()), country: Some("".into()) }
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_coordinates() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store.upsert_traveler(user, "ana", &[]).await.unwrap();

        for (lat, lon) in [(90.5, 0.0), (-91.0, 0.0), (0.0, 180.1), (0.0, -200.0), (f64::NAN, 0.0)] {
            let result = update_location(&store, user, &update(lat, lon)).await;
            assert!(matches!(result, Err(AppError::Validation(_))), "({lat}, {lon}) accepted");
        }
        assert!(store.get_location(user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stores_latest_fix_with_clean_labels() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store.upsert_traveler(user, "ana", &[]).await.unwrap();

        update_location(&store, user, &update(41.15, -8.61)).await.unwrap();
        let latest = update_location(&store, user, &update(90.0, -180.0)).await.unwrap();

        assert_eq!(latest.city.as_deref(), Some("Porto"));
        assert_eq!(latest.country, None);
        assert_eq!(get_location(&store, user).await.unwrap(), latest);
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let store = FaultyStore::new();
        let user = Uuid::new_v4();
        store.upsert_traveler(user, "ana", &[]).await.unwrap();

        store.fail_writes(true);
        let result = update_location(&store, user, &update(41.15, -8.61)).await;
        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
        store.fail_writes(false);
        assert!(store.get_location(user).await.unwrap().is_none());

        store.fail_reads(true);
        assert!(matches!(get_location(&store, user).await, Err(AppError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unknown_traveler_is_not_found() {
        let store = MemoryStore::new();
        let result = update_location(&store, Uuid::new_v4(), &update(0.0, 0.0)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(matches!(get_location(&store, Uuid::new_v4()).await, Err(AppError::NotFound(_))));
    }
}
