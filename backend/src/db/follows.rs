use crate::models::FollowRelationship;
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn follow(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followee_id)
        VALUES ($1, $2)
        ON CONFLICT (follower_id, followee_id) DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn unfollow(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND followee_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn is_following(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2)"
    )
    .bind(follower_id)
    .bind(followee_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

pub async fn list_followers(pool: &PgPool, user_id: Uuid) -> Result<Vec<FollowRelationship>> {
    let followers = sqlx::query_as::<_, FollowRelationship>(
        r#"
        SELECT follower_id, followee_id, created_at
        FROM follows
        WHERE followee_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(followers)
}

pub async fn list_following(pool: &PgPool, user_id: Uuid) -> Result<Vec<FollowRelationship>> {
    let following = sqlx::query_as::<_, FollowRelationship>(
        r#"
        SELECT follower_id, followee_id, created_at
        FROM follows
        WHERE follower_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(following)
}
