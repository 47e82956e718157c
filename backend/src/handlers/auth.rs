use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::AppState;
use crate::constants::USER_ID_HEADER;
use crate::error::AppError;
use crate::services::profiles;

/// Identity of the caller, inserted into request extensions by `require_auth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

fn user_id_from_request(request: &Request) -> Option<Uuid> {
    request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
}

/// Trusts the user id forwarded by the auth gateway and refreshes presence.
pub async fn require_auth(
    State((store, _config)): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = user_id_from_request(&request).ok_or(AppError::Unauthorized)?;

    // Presence is best effort; a failed heartbeat must not fail the request
    if let Err(e) = profiles::touch_activity(store.as_ref(), user_id).await {
        tracing::warn!("Failed to refresh presence for {}: {}", user_id, e);
    }

    request.extensions_mut().insert(AuthenticatedUser { id: user_id });
    Ok(next.run(request).await)
}
