use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use tandem_types::api::{MarkReadRequest, MarkReadResponse, SendMessageRequest, SetReactionRequest};
use tandem_types::events::{Change, FeedEvent};
use tandem_types::models::{Message, MessageKind};

use crate::error::{ApiError, ApiResult};
use crate::{AppState, blocking};

const DEFAULT_PAGE: u32 = 50;
const MAX_PAGE: u32 = 200;

#[derive(Debug, Default, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<u32>,
    /// RFC3339 cursor; returns messages strictly older than this.
    pub before: Option<String>,
}

/// GET /messages
///
/// Pages newest-first out of the store, then reverses so the client
/// appends in chat order.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
) -> ApiResult<Json<Vec<Message>>> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE).min(MAX_PAGE);
    let mut messages =
        blocking(move || state.db.get_messages(limit, query.before.as_deref())).await?;
    messages.reverse();
    Ok(Json(messages))
}

/// POST /messages
pub async fn send(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    if req.content.trim().is_empty() {
        return Err(ApiError::Invalid("message content is empty".into()));
    }

    // Only plain text goes through the harmony rewrite; media messages
    // carry a URL as content.
    let (content, softened) = if req.soften && req.kind == MessageKind::Text {
        match state.harmony.soften(&req.content).await {
            Some(rewritten) => (rewritten, true),
            None => (req.content, false),
        }
    } else {
        (req.content, false)
    };

    let message = Message {
        id: Uuid::new_v4(),
        sender: req.sender,
        content,
        kind: req.kind,
        harmony_softened: softened,
        reactions: Default::default(),
        read_at: None,
        created_at: Utc::now(),
    };

    let stored = message.clone();
    let db_state = state.clone();
    blocking(move || db_state.db.insert_message(&stored)).await?;

    state
        .dispatcher
        .broadcast(FeedEvent::Message(Change::Inserted(message.clone())));
    Ok((StatusCode::CREATED, Json(message)))
}

/// PUT /messages/{id}/reaction
pub async fn set_reaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetReactionRequest>,
) -> ApiResult<Json<Message>> {
    let db_state = state.clone();
    let updated = blocking(move || {
        db_state
            .db
            .set_reaction(id, req.person, req.emoji.as_deref())
    })
    .await?
    .ok_or(ApiError::NotFound("message"))?;

    state
        .dispatcher
        .broadcast(FeedEvent::Message(Change::Updated(updated.clone())));
    Ok(Json(updated))
}

/// POST /messages/read
///
/// Stamps read_at on every unread message from the partner and fans an
/// Updated event out per row so both read receipts stay live.
pub async fn mark_read(
    State(state): State<AppState>,
    Json(req): Json<MarkReadRequest>,
) -> ApiResult<Json<MarkReadResponse>> {
    let now = Utc::now();
    let db_state = state.clone();
    let stamped = blocking(move || db_state.db.mark_read(req.reader, now)).await?;

    let marked = stamped.len();
    for message in stamped {
        state
            .dispatcher
            .broadcast(FeedEvent::Message(Change::Updated(message)));
    }
    Ok(Json(MarkReadResponse { marked }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppStateInner;
    use crate::harmony::Harmony;
    use crate::storage::Storage;
    use std::sync::Arc;
    use tandem_db::Database;
    use tandem_gateway::dispatcher::Dispatcher;
    use tandem_types::models::Person;

    async fn test_state() -> AppState {
        let dir = std::env::temp_dir().join(format!("tandem-messages-{}", Uuid::new_v4()));
        Arc::new(AppStateInner {
            db: Arc::new(Database::open_in_memory().unwrap()),
            dispatcher: Dispatcher::default(),
            storage: Storage::new(dir, "http://localhost:4000".into())
                .await
                .unwrap(),
            harmony: Harmony::disabled(),
        })
    }

    fn send_req(sender: Person, content: &str, soften: bool) -> SendMessageRequest {
        serde_json::from_value(serde_json::json!({
            "sender": sender.as_str(),
            "content": content,
            "soften": soften,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn send_and_list_in_chat_order() {
        let state = test_state().await;
        for text in ["first", "second", "third"] {
            send(State(state.clone()), Json(send_req(Person::Lulu, text, false)))
                .await
                .unwrap();
        }

        let Json(messages) = list(State(state), Query(MessagesQuery::default()))
            .await
            .unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn soften_without_harmony_keeps_original_text() {
        let state = test_state().await;
        let (_, Json(message)) = send(
            State(state),
            Json(send_req(Person::Lala, "you never listen", true)),
        )
        .await
        .unwrap();
        assert_eq!(message.content, "you never listen");
        assert!(!message.harmony_softened);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let state = test_state().await;
        let err = send(State(state), Json(send_req(Person::Lulu, "   ", false)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));
    }

    #[tokio::test]
    async fn reaction_set_and_clear() {
        let state = test_state().await;
        let (_, Json(message)) = send(
            State(state.clone()),
            Json(send_req(Person::Lulu, "hey", false)),
        )
        .await
        .unwrap();

        let Json(updated) = set_reaction(
            State(state.clone()),
            Path(message.id),
            Json(SetReactionRequest {
                person: Person::Lala,
                emoji: Some("❤️".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.reactions.get(&Person::Lala).unwrap(), "❤️");

        let Json(cleared) = set_reaction(
            State(state),
            Path(message.id),
            Json(SetReactionRequest {
                person: Person::Lala,
                emoji: None,
            }),
        )
        .await
        .unwrap();
        assert!(cleared.reactions.is_empty());
    }

    #[tokio::test]
    async fn mark_read_counts_only_partner_messages() {
        let state = test_state().await;
        send(
            State(state.clone()),
            Json(send_req(Person::Lulu, "from lulu", false)),
        )
        .await
        .unwrap();
        send(
            State(state.clone()),
            Json(send_req(Person::Lala, "from lala", false)),
        )
        .await
        .unwrap();

        let Json(result) = mark_read(
            State(state),
            Json(MarkReadRequest {
                reader: Person::Lulu,
            }),
        )
        .await
        .unwrap();
        assert_eq!(result.marked, 1);
    }
}
