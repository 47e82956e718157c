use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{AppState, AuthenticatedUser, ValidJson, ValidPath};
use crate::error::AppError;
use crate::models::{MutualFollowStatus, PrivateChatOpened, PrivateChatSummary};
use crate::services::gate;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPrivateChatRequest {
    pub user_id: Uuid,
}

pub async fn check_mutual(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidPath(other_user_id): ValidPath<Uuid>,
) -> Result<Json<MutualFollowStatus>, AppError> {
    let status = gate::check_mutual_follow(store.as_ref(), user.id, other_user_id).await?;
    Ok(Json(status))
}

pub async fn start_private_chat(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidJson(req): ValidJson<StartPrivateChatRequest>,
) -> Result<(StatusCode, Json<PrivateChatOpened>), AppError> {
    let opened = gate::start_private_chat(store.as_ref(), user.id, req.user_id).await?;
    let status = if opened.is_new { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(opened)))
}

pub async fn list_private_chats(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<PrivateChatSummary>>, AppError> {
    let chats = gate::list_private_chats(store.as_ref(), user.id).await?;
    Ok(Json(chats))
}
