use axum::{
    extract::State,
    response::Json,
    Extension,
};

use super::{AppState, AuthenticatedUser, ValidJson, ValidQuery};
use crate::error::AppError;
use crate::models::{NearbyResponse, NearbyStats, UserLocation};
use crate::services::locations::{self, LocationUpdate};
use crate::services::proximity::{self, NearbyParams, NearbyQuery};

pub async fn update_location(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidJson(update): ValidJson<LocationUpdate>,
) -> Result<Json<UserLocation>, AppError> {
    let location = locations::update_location(store.as_ref(), user.id, &update).await?;
    Ok(Json(location))
}

pub async fn get_location(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserLocation>, AppError> {
    let location = locations::get_location(store.as_ref(), user.id).await?;
    Ok(Json(location))
}

pub async fn find_nearby(
    State((store, config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidQuery(params): ValidQuery<NearbyParams>,
) -> Result<Json<NearbyResponse>, AppError> {
    let query = NearbyQuery::from_params(&params, &config)?;
    let users = proximity::find_nearby(store.as_ref(), &config, user.id, &query).await?;
    Ok(Json(users.into()))
}

pub async fn nearby_stats(
    State((store, config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<NearbyStats> {
    Json(proximity::nearby_stats(store.as_ref(), &config, user.id).await)
}
