//! Performs an [`Effect`] against a [`Backend`] and turns the outcome back
//! into an [`Action`] for the reducer.
//!
//! Kept free of any UI types so the whole cycle can be driven in tests
//! without a terminal.

use log::{error, info, warn};

use crate::api::{ApiError, Backend};
use crate::core::action::{Action, Effect};
use crate::core::thread::DeleteTarget;

/// Runs one effect to completion. `None` means there is nothing to feed
/// back (either nothing to do, or a failure that is only logged).
pub async fn perform(backend: &dyn Backend, effect: Effect) -> Option<Action> {
    match effect {
        Effect::None | Effect::Quit => None,
        Effect::Generate { ticket, request } => {
            let result = backend.generate(&request).await;
            Some(Action::GenerationFinished { ticket, result })
        }
        Effect::FetchChats => Some(Action::ChatsLoaded(backend.list_chats().await)),
        Effect::FetchMessages(chat_id) => Some(Action::MessagesLoaded {
            chat_id,
            result: backend.get_messages(chat_id).await,
        }),
        Effect::DeleteChat(chat_id) => Some(Action::SessionDeleted {
            chat_id,
            result: backend.delete_chat(chat_id).await,
        }),
        Effect::DeleteMessages(plan) => {
            // Both deletes go out independently.
            let (primary, cascade) = futures::join!(
                delete_target(backend, Some(plan.primary)),
                delete_target(backend, plan.cascade)
            );
            let cascade_deleted = match (plan.cascade, cascade) {
                (Some(target), Err(e)) => {
                    warn!("Cascade delete of message {:?} failed: {}", target.id, e);
                    false
                }
                (Some(_), Ok(())) => true,
                (None, _) => false,
            };
            Some(Action::MessagesDeleted {
                plan,
                result: primary,
                cascade_deleted,
            })
        }
        Effect::UpdateMessage { id, content } => {
            match backend.update_message(id, &content).await {
                Ok(()) => info!("Message {} updated", id),
                Err(e) => error!("Failed to update message {}: {}", id, e),
            }
            None
        }
    }
}

/// Deletes one message on the backend. Unpersisted or absent targets
/// succeed trivially.
async fn delete_target(backend: &dyn Backend, target: Option<DeleteTarget>) -> Result<(), ApiError> {
    match target.and_then(|t| t.id) {
        Some(id) => backend.delete_message(id).await,
        None => Ok(()),
    }
}
