//! # Actions
//!
//! Everything that can happen in the workspace becomes an `Action`.
//! User presses Enter? That's `Action::Submit(topic)`.
//! Backend answers? That's `Action::GenerationFinished { .. }`.
//!
//! `update()` takes the current state and an action, mutates the state, and
//! returns an `Effect` describing the I/O to perform next. No I/O happens
//! here; the event loop performs effects and feeds their results back in as
//! new actions.
//!
//! ```text
//! State + Action  →  update()  →  State' + Effect
//!                                          │
//!              Action  ←  effects::perform ┘
//! ```

use log::{debug, info, warn};

use crate::api::{ApiError, Chat, GenerateOutcome, GenerateRequest, Message, Role};
use crate::core::generation::{Audience, Tone, build_request, cycle_length};
use crate::core::state::{App, Phase, SessionRef};
use crate::core::thread::DeletePlan;

const SYSTEM_ERROR_PREFIX: &str = "**System Error**: ";
const CONNECTION_ERROR: &str = "**Connection Error**: Please check if the server is running.";

#[derive(Debug)]
pub enum Action {
    /// Generate a post for this topic in the active session.
    Submit(String),
    GenerationFinished {
        ticket: u64,
        result: Result<GenerateOutcome, ApiError>,
    },
    /// Drop the in-flight generation; any late result is ignored.
    CancelGeneration,

    RefreshChats,
    ChatsLoaded(Result<Vec<Chat>, ApiError>),
    SelectSession(SessionRef),
    MessagesLoaded {
        chat_id: i64,
        result: Result<Vec<Message>, ApiError>,
    },

    /// Confirmed delete of a whole session.
    DeleteSession(i64),
    SessionDeleted {
        chat_id: i64,
        result: Result<(), ApiError>,
    },
    /// Confirmed delete of a message (and its reply, for user messages).
    DeleteMessage(u64),
    /// Outcome of the primary delete. `cascade_deleted` is true when the
    /// paired reply is gone from the backend (or never reached it).
    MessagesDeleted {
        plan: DeletePlan,
        result: Result<(), ApiError>,
        cascade_deleted: bool,
    },
    EditMessage {
        key: u64,
        content: String,
    },

    CycleTone,
    CycleAudience,
    CycleLength,
    Quit,
}

/// Side effects the event loop must perform after an update.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Generate {
        ticket: u64,
        request: GenerateRequest,
    },
    FetchChats,
    FetchMessages(i64),
    DeleteChat(i64),
    DeleteMessages(DeletePlan),
    UpdateMessage {
        id: i64,
        content: String,
    },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(topic) => submit(app, topic),
        Action::GenerationFinished { ticket, result } => finish_generation(app, ticket, result),
        Action::CancelGeneration => {
            if !app.is_busy() {
                return Effect::None;
            }
            info!("Generation cancelled by user");
            abandon_generation(app);
            app.status_message = String::from("Generation cancelled");
            // The backend may still have persisted the turn.
            Effect::FetchChats
        }

        Action::RefreshChats => Effect::FetchChats,
        Action::ChatsLoaded(Ok(chats)) => {
            debug!("Chat list replaced ({} chats)", chats.len());
            app.chats.replace(chats);
            Effect::None
        }
        Action::ChatsLoaded(Err(e)) => {
            warn!("Failed to load chats: {}", e);
            app.error = Some(format!("Could not load sessions: {e}"));
            Effect::None
        }
        Action::SelectSession(session) => select_session(app, session),
        Action::MessagesLoaded { chat_id, result } => {
            if app.session != SessionRef::Saved(chat_id) {
                debug!("Discarding messages for inactive chat {}", chat_id);
                return Effect::None;
            }
            app.loading_messages = false;
            match result {
                Ok(messages) => {
                    app.thread.replace_with(messages);
                    app.status_message = match app.chats.get(chat_id) {
                        Some(chat) => format!("Opened \"{}\"", chat.title),
                        None => format!("Opened chat {chat_id}"),
                    };
                }
                Err(e) => {
                    warn!("Failed to load messages for chat {}: {}", chat_id, e);
                    app.error = Some(format!("Could not load session: {e}"));
                }
            }
            Effect::None
        }

        Action::DeleteSession(chat_id) => {
            info!("Deleting chat {}", chat_id);
            Effect::DeleteChat(chat_id)
        }
        Action::SessionDeleted { chat_id, result } => match result {
            Ok(()) => {
                app.chats.remove(chat_id);
                if app.session == SessionRef::Saved(chat_id) {
                    abandon_generation(app);
                    app.thread.clear();
                    app.session = SessionRef::Unsaved;
                    app.loading_messages = false;
                }
                app.status_message = String::from("Session deleted");
                Effect::FetchChats
            }
            Err(e) => {
                warn!("Failed to delete chat {}: {}", chat_id, e);
                app.error = Some(format!("Delete failed: {e}"));
                Effect::None
            }
        },
        Action::DeleteMessage(key) => delete_message(app, key),
        Action::MessagesDeleted {
            plan,
            result,
            cascade_deleted,
        } => match result {
            Ok(()) => {
                let removed = app.thread.remove_keys(&plan.keys());
                debug!("Removed {} messages from thread", removed);
                app.status_message = String::from("Message deleted");
                Effect::None
            }
            Err(e) => {
                warn!("Failed to delete message {:?}: {}", plan.primary.id, e);
                // The reply may already be gone even though its prompt stays
                if let Some(reply) = plan.cascade.filter(|_| cascade_deleted) {
                    app.thread.remove_keys(&[reply.key]);
                }
                app.error = Some(format!("Delete failed: {e}"));
                Effect::None
            }
        },
        Action::EditMessage { key, content } => edit_message(app, key, content),

        Action::CycleTone => {
            app.settings.tone = Tone::cycle(app.settings.tone);
            app.status_message = format!(
                "Tone: {}",
                app.settings.tone.map_or("default", Tone::label)
            );
            Effect::None
        }
        Action::CycleAudience => {
            app.settings.audience = Audience::cycle(app.settings.audience);
            app.status_message = format!(
                "Audience: {}",
                app.settings.audience.map_or("default", Audience::label)
            );
            Effect::None
        }
        Action::CycleLength => {
            app.settings.length = cycle_length(app.settings.length);
            app.status_message = match app.settings.length {
                Some(words) => format!("Length: {words} words"),
                None => String::from("Length: default"),
            };
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, topic: String) -> Effect {
    let topic = topic.trim().to_string();
    if topic.is_empty() {
        app.status_message = String::from("Enter a topic first");
        return Effect::None;
    }
    if app.is_busy() {
        debug!("Submit ignored: generation already in flight");
        return Effect::None;
    }

    app.error = None;
    app.thread.push_optimistic_user(topic.clone());
    app.thread.show_loading();

    let ticket = app.issue_ticket();
    app.phase = Phase::Busy { ticket };
    app.status_message = String::from("Generating...");

    let request = build_request(&topic, &app.settings, app.user_id, app.session);
    info!(
        "Submit accepted: ticket={}, chat_id={:?}",
        ticket, request.chat_id
    );
    Effect::Generate { ticket, request }
}

fn finish_generation(
    app: &mut App,
    ticket: u64,
    result: Result<GenerateOutcome, ApiError>,
) -> Effect {
    if app.active_ticket() != Some(ticket) {
        debug!("Discarding stale generation result (ticket {})", ticket);
        // A chat may have been created server-side all the same.
        return Effect::FetchChats;
    }

    app.thread.remove_loading();
    let effect = match result {
        Ok(GenerateOutcome::Generated(turn)) => {
            if !app.thread.reconcile_latest_user(turn.user_message_id) {
                warn!(
                    "No optimistic user message to reconcile with id {}",
                    turn.user_message_id
                );
            }
            app.thread.push_assistant(
                Some(turn.assistant_message_id),
                turn.content,
                turn.image_url,
            );
            if app.session == SessionRef::Unsaved {
                info!("Adopting new chat {}", turn.chat_id);
                app.session = SessionRef::Saved(turn.chat_id);
            }
            app.status_message = String::from("Post generated");
            Effect::FetchChats
        }
        Ok(GenerateOutcome::Rejected { detail }) => {
            warn!("Generation rejected by backend: {}", detail);
            app.error = Some(detail.clone());
            app.thread
                .push_assistant(None, format!("{SYSTEM_ERROR_PREFIX}{detail}"), None);
            app.status_message = String::from("Generation failed");
            Effect::None
        }
        Err(e) => {
            warn!("Generation failed: {}", e);
            app.error = Some(e.to_string());
            app.thread.push_assistant(None, failure_text(&e), None);
            app.status_message = String::from("Generation failed");
            Effect::None
        }
    };
    app.phase = Phase::Idle;
    effect
}

/// The synthetic assistant message shown for a failed call.
fn failure_text(error: &ApiError) -> String {
    if error.is_connectivity() {
        return CONNECTION_ERROR.to_string();
    }
    match error {
        ApiError::Api { message, .. } => format!("{SYSTEM_ERROR_PREFIX}{message}"),
        other => format!("{SYSTEM_ERROR_PREFIX}{other}"),
    }
}

/// Leaves `Busy` without a result. The optimistic user message stays.
fn abandon_generation(app: &mut App) {
    if app.is_busy() {
        app.thread.remove_loading();
        app.phase = Phase::Idle;
    }
}

fn select_session(app: &mut App, session: SessionRef) -> Effect {
    abandon_generation(app);
    app.thread.clear();
    app.error = None;
    app.session = session;

    match session {
        SessionRef::Unsaved => {
            app.loading_messages = false;
            app.status_message = String::from("New session");
            Effect::None
        }
        SessionRef::Saved(chat_id) => {
            app.loading_messages = true;
            app.status_message = String::from("Loading session...");
            Effect::FetchMessages(chat_id)
        }
    }
}

fn delete_message(app: &mut App, key: u64) -> Effect {
    if app.is_busy() {
        app.status_message = String::from("Wait for the current generation to finish");
        return Effect::None;
    }
    let Some(plan) = app.thread.plan_delete(key) else {
        return Effect::None;
    };
    if plan.is_local_only() {
        app.thread.remove_keys(&plan.keys());
        app.status_message = String::from("Message removed");
        return Effect::None;
    }
    Effect::DeleteMessages(plan)
}

fn edit_message(app: &mut App, key: u64, content: String) -> Effect {
    if app.is_busy() {
        app.status_message = String::from("Wait for the current generation to finish");
        return Effect::None;
    }
    let content = content.trim().to_string();
    let Some(current) = app.thread.get(key) else {
        return Effect::None;
    };
    if current.role != Role::User || content.is_empty() || current.content == content {
        return Effect::None;
    }

    match app.thread.set_content(key, content.clone()) {
        Some(Some(id)) => {
            app.status_message = String::from("Message updated");
            Effect::UpdateMessage { id, content }
        }
        Some(None) => {
            app.status_message = String::from("Message updated (unsaved)");
            Effect::None
        }
        None => Effect::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GeneratedTurn;
    use crate::core::generation::Tone;
    use crate::test_support::{chat, message, test_app, turn};

    fn submit_ok(app: &mut App, topic: &str) -> u64 {
        match update(app, Action::Submit(topic.to_string())) {
            Effect::Generate { ticket, .. } => ticket,
            other => panic!("expected Generate, got {other:?}"),
        }
    }

    fn finish(app: &mut App, ticket: u64, result: Result<GenerateOutcome, ApiError>) -> Effect {
        update(app, Action::GenerationFinished { ticket, result })
    }

    #[test]
    fn test_submit_empty_is_rejected_locally() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit("   \n".into())), Effect::None);
        assert!(app.thread.is_empty());
        assert!(!app.is_busy());
    }

    #[test]
    fn test_submit_appends_optimistic_message_and_placeholder() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("  Rust async  ".into()));

        let Effect::Generate { request, .. } = effect else {
            panic!("expected Generate");
        };
        assert_eq!(request.topic, "Rust async");
        assert_eq!(request.chat_id, None);
        assert_eq!(request.user_id, 1);
        assert!(app.is_busy());
        assert!(app.thread.is_loading());
        let msgs = app.thread.messages();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].id, None);
        assert_eq!(msgs[0].role, Role::User);
    }

    #[test]
    fn test_submit_while_busy_is_noop() {
        let mut app = test_app();
        submit_ok(&mut app, "first");
        assert_eq!(update(&mut app, Action::Submit("second".into())), Effect::None);
        assert_eq!(app.thread.len(), 1);
    }

    #[test]
    fn test_submit_uses_generation_settings() {
        let mut app = test_app();
        app.settings.tone = Some(Tone::Witty);
        let Effect::Generate { request, .. } = update(&mut app, Action::Submit("AI".into())) else {
            panic!("expected Generate");
        };
        assert!(request.topic.starts_with("Topic: AI\nTone: Witty"));
        // The thread shows what the user typed, not the composed prompt
        assert_eq!(app.thread.messages()[0].content, "AI");
    }

    #[test]
    fn test_success_reconciles_and_adopts_chat() {
        let mut app = test_app();
        let ticket = submit_ok(&mut app, "Future of Agentic AI");
        let effect = finish(&mut app, ticket, Ok(turn(5, 6, 42, "# Post")));

        assert_eq!(effect, Effect::FetchChats);
        assert_eq!(app.session, SessionRef::Saved(42));
        assert!(!app.is_busy());
        assert!(!app.thread.is_loading());
        let ids: Vec<_> = app.thread.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![Some(5), Some(6)]);
        assert_eq!(app.thread.messages()[1].content, "# Post");
    }

    #[test]
    fn test_success_keeps_existing_session() {
        let mut app = test_app();
        app.session = SessionRef::Saved(7);
        let ticket = submit_ok(&mut app, "topic");
        finish(&mut app, ticket, Ok(turn(1, 2, 7, "body")));
        assert_eq!(app.session, SessionRef::Saved(7));
    }

    #[test]
    fn test_success_carries_image_url() {
        let mut app = test_app();
        let ticket = submit_ok(&mut app, "topic");
        let outcome = GenerateOutcome::Generated(GeneratedTurn {
            content: "body".into(),
            image_url: Some("http://img/1.png".into()),
            user_message_id: 1,
            assistant_message_id: 2,
            chat_id: 3,
        });
        finish(&mut app, ticket, Ok(outcome));
        assert_eq!(
            app.thread.messages()[1].image_url.as_deref(),
            Some("http://img/1.png")
        );
    }

    #[test]
    fn test_rejected_shows_detail_and_keeps_user_message() {
        let mut app = test_app();
        let ticket = submit_ok(&mut app, "topic");
        let effect = finish(
            &mut app,
            ticket,
            Ok(GenerateOutcome::Rejected {
                detail: "X".into(),
            }),
        );

        assert_eq!(effect, Effect::None);
        let msgs = app.thread.messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[0].id, None);
        assert_eq!(msgs[1].role, Role::Assistant);
        assert_eq!(msgs[1].content, "**System Error**: X");
        assert!(!app.is_busy());
        assert!(!app.thread.is_loading());
        assert_eq!(app.session, SessionRef::Unsaved);
    }

    #[test]
    fn test_network_error_shows_connectivity_message() {
        let mut app = test_app();
        let ticket = submit_ok(&mut app, "topic");
        finish(
            &mut app,
            ticket,
            Err(ApiError::Network("connection refused".into())),
        );
        assert_eq!(
            app.thread.messages()[1].content,
            "**Connection Error**: Please check if the server is running."
        );
        assert!(app.error.is_some());
    }

    #[test]
    fn test_http_error_shows_server_message() {
        let mut app = test_app();
        let ticket = submit_ok(&mut app, "topic");
        finish(
            &mut app,
            ticket,
            Err(ApiError::Api {
                status: 502,
                message: "Bad Gateway".into(),
            }),
        );
        assert_eq!(app.thread.messages()[1].content, "**System Error**: Bad Gateway");
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut app = test_app();
        let ticket = submit_ok(&mut app, "topic");
        update(&mut app, Action::CancelGeneration);
        let effect = finish(&mut app, ticket, Ok(turn(5, 6, 42, "late")));

        assert_eq!(effect, Effect::FetchChats);
        assert_eq!(app.thread.len(), 1);
        assert_eq!(app.session, SessionRef::Unsaved);
    }

    #[test]
    fn test_cancel_returns_to_idle_without_rollback() {
        let mut app = test_app();
        submit_ok(&mut app, "topic");
        update(&mut app, Action::CancelGeneration);
        assert!(!app.is_busy());
        assert!(!app.thread.is_loading());
        assert_eq!(app.thread.len(), 1);
        // Idle again: a new submit is accepted
        submit_ok(&mut app, "again");
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::CancelGeneration), Effect::None);
    }

    #[test]
    fn test_select_new_clears_without_backend_call() {
        let mut app = test_app();
        app.session = SessionRef::Saved(3);
        app.thread.replace_with(vec![message(1, Role::User, "hi")]);
        let effect = update(&mut app, Action::SelectSession(SessionRef::Unsaved));
        assert_eq!(effect, Effect::None);
        assert!(app.thread.is_empty());
        assert_eq!(app.session, SessionRef::Unsaved);
    }

    #[test]
    fn test_select_saved_fetches_even_when_active() {
        let mut app = test_app();
        assert_eq!(
            update(&mut app, Action::SelectSession(SessionRef::Saved(3))),
            Effect::FetchMessages(3)
        );
        assert_eq!(
            update(&mut app, Action::SelectSession(SessionRef::Saved(3))),
            Effect::FetchMessages(3)
        );
        assert!(app.loading_messages);
    }

    #[test]
    fn test_select_while_busy_abandons_generation() {
        let mut app = test_app();
        let ticket = submit_ok(&mut app, "topic");
        update(&mut app, Action::SelectSession(SessionRef::Saved(9)));
        assert!(!app.is_busy());
        assert!(app.thread.is_empty());

        finish(&mut app, ticket, Ok(turn(1, 2, 50, "late")));
        assert!(app.thread.is_empty());
        assert_eq!(app.session, SessionRef::Saved(9));
    }

    #[test]
    fn test_messages_loaded_for_active_session_replace_thread() {
        let mut app = test_app();
        app.chats.replace(vec![chat(3, "Rust")]);
        update(&mut app, Action::SelectSession(SessionRef::Saved(3)));
        update(
            &mut app,
            Action::MessagesLoaded {
                chat_id: 3,
                result: Ok(vec![
                    message(10, Role::User, "q"),
                    message(11, Role::Assistant, "a"),
                ]),
            },
        );
        assert_eq!(app.thread.len(), 2);
        assert!(!app.loading_messages);
        assert_eq!(app.status_message, "Opened \"Rust\"");
    }

    #[test]
    fn test_messages_loaded_for_inactive_session_are_discarded() {
        let mut app = test_app();
        update(&mut app, Action::SelectSession(SessionRef::Saved(3)));
        update(&mut app, Action::SelectSession(SessionRef::Saved(4)));
        update(
            &mut app,
            Action::MessagesLoaded {
                chat_id: 3,
                result: Ok(vec![message(10, Role::User, "old")]),
            },
        );
        assert!(app.thread.is_empty());
        assert!(app.loading_messages);
    }

    #[test]
    fn test_messages_load_failure_surfaces_error() {
        let mut app = test_app();
        update(&mut app, Action::SelectSession(SessionRef::Saved(3)));
        update(
            &mut app,
            Action::MessagesLoaded {
                chat_id: 3,
                result: Err(ApiError::Network("down".into())),
            },
        );
        assert!(app.error.is_some());
        assert!(!app.loading_messages);
    }

    #[test]
    fn test_chats_loaded_replaces_list() {
        let mut app = test_app();
        update(&mut app, Action::ChatsLoaded(Ok(vec![chat(1, "a"), chat(2, "b")])));
        assert_eq!(app.chats.len(), 2);
        update(
            &mut app,
            Action::ChatsLoaded(Err(ApiError::Network("down".into()))),
        );
        // Failure leaves the previous list in place
        assert_eq!(app.chats.len(), 2);
        assert!(app.error.is_some());
    }

    #[test]
    fn test_delete_session_waits_for_backend() {
        let mut app = test_app();
        app.chats.replace(vec![chat(1, "a")]);
        assert_eq!(update(&mut app, Action::DeleteSession(1)), Effect::DeleteChat(1));
        assert!(app.chats.contains(1));
    }

    #[test]
    fn test_delete_active_session_falls_back_to_new() {
        let mut app = test_app();
        app.chats.replace(vec![chat(1, "a"), chat(2, "b")]);
        app.session = SessionRef::Saved(1);
        app.thread.replace_with(vec![message(1, Role::User, "hi")]);
        submit_ok(&mut app, "in flight");

        let effect = update(
            &mut app,
            Action::SessionDeleted {
                chat_id: 1,
                result: Ok(()),
            },
        );
        assert_eq!(effect, Effect::FetchChats);
        assert!(!app.chats.contains(1));
        assert_eq!(app.session, SessionRef::Unsaved);
        assert!(app.thread.is_empty());
        assert!(!app.is_busy());
    }

    #[test]
    fn test_delete_other_session_keeps_view() {
        let mut app = test_app();
        app.chats.replace(vec![chat(1, "a"), chat(2, "b")]);
        app.session = SessionRef::Saved(2);
        app.thread.replace_with(vec![message(1, Role::User, "hi")]);
        update(
            &mut app,
            Action::SessionDeleted {
                chat_id: 1,
                result: Ok(()),
            },
        );
        assert_eq!(app.session, SessionRef::Saved(2));
        assert_eq!(app.thread.len(), 1);
    }

    #[test]
    fn test_delete_session_failure_leaves_state() {
        let mut app = test_app();
        app.chats.replace(vec![chat(1, "a")]);
        update(
            &mut app,
            Action::SessionDeleted {
                chat_id: 1,
                result: Err(ApiError::Network("down".into())),
            },
        );
        assert!(app.chats.contains(1));
        assert!(app.error.is_some());
    }

    #[test]
    fn test_delete_user_message_plans_cascade() {
        let mut app = test_app();
        app.thread.replace_with(vec![
            message(1, Role::User, "q"),
            message(2, Role::Assistant, "a"),
        ]);
        let key = app.thread.messages()[0].key;
        let Effect::DeleteMessages(plan) = update(&mut app, Action::DeleteMessage(key)) else {
            panic!("expected DeleteMessages");
        };
        assert_eq!(plan.primary.id, Some(1));
        assert_eq!(plan.cascade.and_then(|c| c.id), Some(2));
        // Nothing removed until the backend confirms
        assert_eq!(app.thread.len(), 2);

        update(
            &mut app,
            Action::MessagesDeleted {
                plan,
                result: Ok(()),
                cascade_deleted: true,
            },
        );
        assert!(app.thread.is_empty());
    }

    #[test]
    fn test_delete_failure_keeps_messages() {
        let mut app = test_app();
        app.thread.replace_with(vec![
            message(1, Role::User, "q"),
            message(2, Role::Assistant, "a"),
        ]);
        let key = app.thread.messages()[0].key;
        let Effect::DeleteMessages(plan) = update(&mut app, Action::DeleteMessage(key)) else {
            panic!("expected DeleteMessages");
        };
        update(
            &mut app,
            Action::MessagesDeleted {
                plan,
                result: Err(ApiError::Api {
                    status: 404,
                    message: "Message not found".into(),
                }),
                cascade_deleted: false,
            },
        );
        assert_eq!(app.thread.len(), 2);
        assert!(app.error.as_deref().unwrap().contains("Message not found"));
    }

    #[test]
    fn test_primary_failure_still_drops_deleted_reply() {
        let mut app = test_app();
        app.thread.replace_with(vec![
            message(1, Role::User, "q"),
            message(2, Role::Assistant, "a"),
        ]);
        let key = app.thread.messages()[0].key;
        let Effect::DeleteMessages(plan) = update(&mut app, Action::DeleteMessage(key)) else {
            panic!("expected DeleteMessages");
        };
        update(
            &mut app,
            Action::MessagesDeleted {
                plan,
                result: Err(ApiError::Network("down".into())),
                cascade_deleted: true,
            },
        );

        let remaining = app.thread.messages();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, Some(1));
        assert!(app.error.is_some());
    }

    #[test]
    fn test_delete_unsaved_messages_is_local() {
        let mut app = test_app();
        let ticket = submit_ok(&mut app, "topic");
        finish(&mut app, ticket, Err(ApiError::Network("down".into())));
        let key = app.thread.messages()[0].key;

        assert_eq!(update(&mut app, Action::DeleteMessage(key)), Effect::None);
        assert!(app.thread.is_empty());
    }

    #[test]
    fn test_delete_while_busy_is_rejected() {
        let mut app = test_app();
        app.thread.replace_with(vec![message(1, Role::User, "q")]);
        let key = app.thread.messages()[0].key;
        submit_ok(&mut app, "topic");
        assert_eq!(update(&mut app, Action::DeleteMessage(key)), Effect::None);
        assert_eq!(app.thread.len(), 2);
    }

    #[test]
    fn test_edit_user_message_is_optimistic() {
        let mut app = test_app();
        app.thread.replace_with(vec![
            message(1, Role::User, "old"),
            message(2, Role::Assistant, "reply"),
        ]);
        let key = app.thread.messages()[0].key;
        let effect = update(
            &mut app,
            Action::EditMessage {
                key,
                content: " new topic ".into(),
            },
        );
        assert_eq!(
            effect,
            Effect::UpdateMessage {
                id: 1,
                content: "new topic".into()
            }
        );
        assert_eq!(app.thread.messages()[0].content, "new topic");
        assert_eq!(app.status_message, "Message updated");
        // The paired reply is untouched
        assert_eq!(app.thread.messages()[1].content, "reply");
    }

    #[test]
    fn test_edit_rejects_assistant_blank_and_unchanged() {
        let mut app = test_app();
        app.thread.replace_with(vec![
            message(1, Role::User, "same"),
            message(2, Role::Assistant, "reply"),
        ]);
        let user = app.thread.messages()[0].key;
        let reply = app.thread.messages()[1].key;

        for (key, content) in [(reply, "x"), (user, "   "), (user, "same")] {
            let effect = update(
                &mut app,
                Action::EditMessage {
                    key,
                    content: content.into(),
                },
            );
            assert_eq!(effect, Effect::None);
        }
        assert_eq!(app.thread.messages()[1].content, "reply");
    }

    #[test]
    fn test_edit_unsaved_message_stays_local() {
        let mut app = test_app();
        let ticket = submit_ok(&mut app, "topic");
        finish(&mut app, ticket, Err(ApiError::Network("down".into())));
        let key = app.thread.messages()[0].key;
        let effect = update(
            &mut app,
            Action::EditMessage {
                key,
                content: "changed".into(),
            },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(app.thread.messages()[0].content, "changed");
        assert_eq!(app.status_message, "Message updated (unsaved)");
    }

    #[test]
    fn test_cycle_settings_update_status() {
        let mut app = test_app();
        update(&mut app, Action::CycleTone);
        assert_eq!(app.settings.tone, Some(Tone::Professional));
        assert_eq!(app.status_message, "Tone: Professional");
        update(&mut app, Action::CycleLength);
        assert_eq!(app.status_message, "Length: 500 words");
        update(&mut app, Action::CycleAudience);
        assert_eq!(app.status_message, "Audience: General");
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
