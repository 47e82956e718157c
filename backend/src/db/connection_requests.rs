use crate::models::{ConnectionRequest, ConnectionStatus};
use anyhow::Result;
use sqlx::{FromRow, PgPool};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(FromRow)]
struct ConnectionRequestRow {
    id: Uuid,
    requester_id: Uuid,
    target_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}

impl TryFrom<ConnectionRequestRow> for ConnectionRequest {
    type Error = anyhow::Error;

    fn try_from(row: ConnectionRequestRow) -> Result<Self> {
        Ok(ConnectionRequest {
            id: row.id,
            requester_id: row.requester_id,
            target_id: row.target_id,
            status: row.status.parse()?,
            created_at: row.created_at,
            responded_at: row.responded_at,
        })
    }
}

pub async fn create_connection_request(pool: &PgPool, requester_id: Uuid, target_id: Uuid) -> Result<ConnectionRequest> {
    let row = sqlx::query_as::<_, ConnectionRequestRow>(
        r#"
        INSERT INTO connection_requests (id, requester_id, target_id, status)
        VALUES ($1, $2, $3, 'pending')
        RETURNING id, requester_id, target_id, status, created_at, responded_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(requester_id)
    .bind(target_id)
    .fetch_one(pool)
    .await?;

    row.try_into()
}

pub async fn find_pending_request(pool: &PgPool, requester_id: Uuid, target_id: Uuid) -> Result<Option<ConnectionRequest>> {
    let row = sqlx::query_as::<_, ConnectionRequestRow>(
        r#"
        SELECT id, requester_id, target_id, status, created_at, responded_at
        FROM connection_requests
        WHERE requester_id = $1 AND target_id = $2 AND status = 'pending'
        "#,
    )
    .bind(requester_id)
    .bind(target_id)
    .fetch_optional(pool)
    .await?;

    row.map(ConnectionRequest::try_from).transpose()
}

pub async fn get_connection_request(pool: &PgPool, request_id: Uuid) -> Result<Option<ConnectionRequest>> {
    let row = sqlx::query_as::<_, ConnectionRequestRow>(
        r#"
        SELECT id, requester_id, target_id, status, created_at, responded_at
        FROM connection_requests
        WHERE id = $1
        "#,
    )
    .bind(request_id)
    .fetch_optional(pool)
    .await?;

    row.map(ConnectionRequest::try_from).transpose()
}

pub async fn resolve_connection_request(
    pool: &PgPool,
    request_id: Uuid,
    status: ConnectionStatus,
    at: DateTime<Utc>,
) -> Result<Option<ConnectionRequest>> {
    let row = sqlx::query_as::<_, ConnectionRequestRow>(
        r#"
        UPDATE connection_requests
        SET status = $2, responded_at = $3
        WHERE id = $1 AND status = 'pending'
        RETURNING id, requester_id, target_id, status, created_at, responded_at
        "#,
    )
    .bind(request_id)
    .bind(status.as_str())
    .bind(at)
    .fetch_optional(pool)
    .await?;

    row.map(ConnectionRequest::try_from).transpose()
}

pub async fn list_incoming_requests(pool: &PgPool, user_id: Uuid) -> Result<Vec<ConnectionRequest>> {
    let rows = sqlx::query_as::<_, ConnectionRequestRow>(
        r#"
        SELECT id, requester_id, target_id, status, created_at, responded_at
        FROM connection_requests
        WHERE target_id = $1 AND status = 'pending'
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ConnectionRequest::try_from).collect()
}
