use crate::models::TravelerProfile;
use anyhow::Result;
use sqlx::PgPool;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub async fn get_traveler(pool: &PgPool, user_id: Uuid) -> Result<Option<TravelerProfile>> {
    let traveler = sqlx::query_as::<_, TravelerProfile>(
        r#"
        SELECT id, display_name, interests, last_active_at, created_at
        FROM travelers
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(traveler)
}

pub async fn upsert_traveler(
    pool: &PgPool,
    user_id: Uuid,
    display_name: &str,
    interests: &[String],
) -> Result<TravelerProfile> {
    let traveler = sqlx::query_as::<_, TravelerProfile>(
        r#"
        INSERT INTO travelers (id, display_name, interests)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE
        SET display_name = EXCLUDED.display_name,
            interests = EXCLUDED.interests,
            last_active_at = NOW()
        RETURNING id, display_name, interests, last_active_at, created_at
        "#,
    )
    .bind(user_id)
    .bind(display_name)
    .bind(interests)
    .fetch_one(pool)
    .await?;

    Ok(traveler)
}

pub async fn touch_activity(pool: &PgPool, user_id: Uuid, at: DateTime<Utc>) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE travelers
        SET last_active_at = GREATEST(last_active_at, $2)
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(at)
    .execute(pool)
    .await?;

    Ok(())
}
