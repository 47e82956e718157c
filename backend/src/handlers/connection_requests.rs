use axum::{
    extract::State,
    response::Json,
    Extension,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{AppState, AuthenticatedUser, ValidJson, ValidPath};
use crate::error::AppError;
use crate::models::ConnectionRequest;
use crate::services::social;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConnectionRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RespondConnectionRequest {
    pub accept: bool,
}

pub async fn send(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidJson(req): ValidJson<SendConnectionRequest>,
) -> Result<Json<ConnectionRequest>, AppError> {
    Ok(Json(social::send_connection_request(store.as_ref(), user.id, req.user_id).await?))
}

pub async fn list_incoming(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ConnectionRequest>>, AppError> {
    Ok(Json(social::list_incoming_requests(store.as_ref(), user.id).await?))
}

pub async fn respond(
    State((store, _config)): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidPath(request_id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<RespondConnectionRequest>,
) -> Result<Json<ConnectionRequest>, AppError> {
    let request = social::respond_connection_request(store.as_ref(), user.id, request_id, req.accept).await?;
    Ok(Json(request))
}
