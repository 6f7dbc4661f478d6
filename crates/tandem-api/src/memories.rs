use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;

use tandem_types::api::CreateMemoryRequest;
use tandem_types::events::{Change, FeedEvent};
use tandem_types::models::Memory;

use crate::error::{ApiError, ApiResult};
use crate::{AppState, blocking};

/// GET /memories
///
/// Newest memory date first; same-day entries break ties on creation
/// time so the gallery stays stable.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Memory>>> {
    let memories = blocking(move || state.db.list_memories()).await?;
    Ok(Json(memories))
}

/// POST /memories
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateMemoryRequest>,
) -> ApiResult<(StatusCode, Json<Memory>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::Invalid("memory title is empty".into()));
    }

    let memory = Memory {
        id: Uuid::new_v4(),
        title: req.title,
        date: req.date,
        photos: req.photos,
        description: req.description,
        created_at: Utc::now(),
    };

    let stored = memory.clone();
    let db_state = state.clone();
    blocking(move || db_state.db.insert_memory(&stored)).await?;

    state
        .dispatcher
        .broadcast(FeedEvent::Memory(Change::Inserted(memory.clone())));
    Ok((StatusCode::CREATED, Json(memory)))
}

/// DELETE /memories/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let db_state = state.clone();
    let removed = blocking(move || db_state.db.delete_memory(id)).await?;
    if !removed {
        return Err(ApiError::NotFound("memory"));
    }

    state
        .dispatcher
        .broadcast(FeedEvent::Memory(Change::Deleted { id }));
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppStateInner;
    use crate::harmony::Harmony;
    use crate::storage::Storage;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tandem_db::Database;
    use tandem_gateway::dispatcher::Dispatcher;

    async fn test_state() -> AppState {
        let dir = std::env::temp_dir().join(format!("tandem-memories-{}", Uuid::new_v4()));
        Arc::new(AppStateInner {
            db: Arc::new(Database::open_in_memory().unwrap()),
            dispatcher: Dispatcher::default(),
            storage: Storage::new(dir, "http://localhost:4000".into())
                .await
                .unwrap(),
            harmony: Harmony::disabled(),
        })
    }

    fn memory_req(title: &str, date: NaiveDate) -> CreateMemoryRequest {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "date": date,
            "photos": ["http://localhost:4000/media/memories/abc-one.jpg"],
            "description": null,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn gallery_orders_newest_date_first() {
        let state = test_state().await;
        let older = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let newer = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
        create(State(state.clone()), Json(memory_req("beach day", older)))
            .await
            .unwrap();
        create(State(state.clone()), Json(memory_req("anniversary", newer)))
            .await
            .unwrap();

        let Json(memories) = list(State(state)).await.unwrap();
        assert_eq!(memories[0].title, "anniversary");
        assert_eq!(memories[1].title, "beach day");
    }

    #[tokio::test]
    async fn delete_missing_memory_is_not_found() {
        let state = test_state().await;
        let err = delete(State(state), Path(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound("memory")));
    }
}
