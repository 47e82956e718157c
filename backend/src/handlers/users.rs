use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    Extension,
};
use uuid::Uuid;

use super::{AppState, AuthenticatedUser, ValidJson, ValidPath};
use crate::error::AppError;
use crate::models::{FollowRelationship, TravelerProfile};
use crate::services::profiles::{self, ProfileUpdate};
use crate::services::social;

pub async fn get_me(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<TravelerProfile>, AppError> {
    Ok(Json(profiles::get_profile(store.as_ref(), user.id).await?))
}

pub async fn update_me(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidJson(update): ValidJson<ProfileUpdate>,
) -> Result<Json<TravelerProfile>, AppError> {
    Ok(Json(profiles::upsert_profile(store.as_ref(), user.id, &update).await?))
}

pub async fn get_user(
    State((store, _config)): State<AppState>,
    ValidPath(user_id): ValidPath<Uuid>,
) -> Result<Json<TravelerProfile>, AppError> {
    Ok(Json(profiles::get_profile(store.as_ref(), user_id).await?))
}

pub async fn follow(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidPath(target_id): ValidPath<Uuid>,
) -> Result<StatusCode, AppError> {
    let created = social::follow(store.as_ref(), user.id, target_id).await?;
    Ok(if created { StatusCode::CREATED } else { StatusCode::NO_CONTENT })
}

pub async fn unfollow(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidPath(target_id): ValidPath<Uuid>,
) -> Result<StatusCode, AppError> {
    social::unfollow(store.as_ref(), user.id, target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn followers(
    State((store, _config)): State<AppState>,
    ValidPath(user_id): ValidPath<Uuid>,
) -> Result<Json<Vec<FollowRelationship>>, AppError> {
    Ok(Json(social::list_followers(store.as_ref(), user_id).await?))
}

pub async fn following(
    State((store, _config)): State<AppState>,
    ValidPath(user_id): ValidPath<Uuid>,
) -> Result<Json<Vec<FollowRelationship>>, AppError> {
    Ok(Json(social::list_following(store.as_ref(), user_id).await?))
}
