use crate::models::{ChatPair, PrivateChat};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn find_private_chat(pool: &PgPool, pair: ChatPair) -> Result<Option<PrivateChat>> {
    let chat = sqlx::query_as::<_, PrivateChat>(
        r#"
        SELECT id, user_low, user_high, created_at
        FROM private_chats
        WHERE user_low = $1 AND user_high = $2
        "#,
    )
    .bind(pair.low)
    .bind(pair.high)
    .fetch_optional(pool)
    .await?;

    Ok(chat)
}

/// Both parties may race here; the unique (user_low, user_high) index decides
/// the winner and the loser reads the winner's row back.
pub async fn create_private_chat_if_absent(pool: &PgPool, pair: ChatPair) -> Result<(PrivateChat, bool)> {
    let inserted = sqlx::query_as::<_, PrivateChat>(
        r#"
        INSERT INTO private_chats (id, user_low, user_high)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_low, user_high) DO NOTHING
        RETURNING id, user_low, user_high, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(pair.low)
    .bind(pair.high)
    .fetch_optional(pool)
    .await?;

    if let Some(chat) = inserted {
        return Ok((chat, true));
    }

    let existing = find_private_chat(pool, pair)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Private chat vanished after conflicting insert"))?;

    Ok((existing, false))
}

pub async fn list_private_chats(pool: &PgPool, user_id: Uuid) -> Result<Vec<PrivateChat>> {
    let chats = sqlx::query_as::<_, PrivateChat>(
        r#"
        SELECT id, user_low, user_high, created_at
        FROM private_chats
        WHERE user_low = $1 OR user_high = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(chats)
}
