use uuid::Uuid;

use crate::db::Store;
use crate::error::AppError;
use crate::models::{ChatPair, ConnectionState, MutualFollowStatus, PrivateChatOpened, PrivateChatSummary};

async fn ensure_traveler(store: &dyn Store, user_id: Uuid) -> Result<(), AppError> {
    match store.get_traveler(user_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("Traveler")),
    }
}

async fn follow_status(store: &dyn Store, user_id: Uuid, other_user_id: Uuid) -> Result<MutualFollowStatus, AppError> {
    let current_user_follows = store.is_following(user_id, other_user_id).await?;
    let other_user_follows = store.is_following(other_user_id, user_id).await?;
    Ok(MutualFollowStatus::new(current_user_follows, other_user_follows))
}

/// Reads both follow directions. Never cached: an unfollow takes effect on
/// the very next check.
pub async fn check_mutual_follow(store: &dyn Store, user_id: Uuid, other_user_id: Uuid) -> Result<MutualFollowStatus, AppError> {
    if user_id == other_user_id {
        return Err(AppError::validation("Cannot check a follow relationship with yourself"));
    }
    ensure_traveler(store, other_user_id).await?;

    follow_status(store, user_id, other_user_id).await
}

/// Opens (or reopens) the private channel between two mutual followers.
pub async fn start_private_chat(store: &dyn Store, user_id: Uuid, other_user_id: Uuid) -> Result<PrivateChatOpened, AppError> {
    let status = check_mutual_follow(store, user_id, other_user_id).await?;
    if status.state() != ConnectionState::MutualFollow {
        tracing::info!(
            "Private chat {} -> {} refused: {:?}",
            user_id,
            other_user_id,
            status.state()
        );
        return Err(AppError::NotMutualFollow);
    }

    let pair = ChatPair::new(user_id, other_user_id);
    if let Some(chat) = store.find_private_chat(pair).await? {
        return Ok(PrivateChatOpened { chat_id: chat.id, is_new: false });
    }

    let (chat, is_new) = store.create_private_chat_if_absent(pair).await?;
    if is_new {
        tracing::info!("Opened private chat {} between {} and {}", chat.id, pair.low, pair.high);
    }

    Ok(PrivateChatOpened { chat_id: chat.id, is_new })
}

/// The caller's channels, each flagged with whether messaging is allowed now.
pub async fn list_private_chats(store: &dyn Store, user_id: Uuid) -> Result<Vec<PrivateChatSummary>, AppError> {
    let chats = store.list_private_chats(user_id).await?;

    let mut summaries = Vec::with_capacity(chats.len());
    for chat in chats {
        let other_user_id = chat.pair().other(user_id);
        let status = follow_status(store, user_id, other_user_id).await?;
        summaries.push(PrivateChatSummary {
            chat_id: chat.id,
            other_user_id,
            created_at: chat.created_at,
            can_message: status.is_mutual_follow,
        });
    }

    Ok(summaries)
}
