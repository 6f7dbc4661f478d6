use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;

use tandem_types::api::{CreateVisionRequest, SetDoneRequest};
use tandem_types::events::{Change, FeedEvent};
use tandem_types::models::LifeVisionItem;

use crate::error::{ApiError, ApiResult};
use crate::{AppState, blocking};

/// GET /visions
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<LifeVisionItem>>> {
    let visions = blocking(move || state.db.list_visions()).await?;
    Ok(Json(visions))
}

/// POST /visions
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateVisionRequest>,
) -> ApiResult<(StatusCode, Json<LifeVisionItem>)> {
    if req.content.trim().is_empty() {
        return Err(ApiError::Invalid("vision content is empty".into()));
    }

    let vision = LifeVisionItem {
        id: Uuid::new_v4(),
        category: req.category,
        content: req.content,
        done: false,
        created_at: Utc::now(),
    };

    let stored = vision.clone();
    let db_state = state.clone();
    blocking(move || db_state.db.insert_vision(&stored)).await?;

    state
        .dispatcher
        .broadcast(FeedEvent::Vision(Change::Inserted(vision.clone())));
    Ok((StatusCode::CREATED, Json(vision)))
}

/// PUT /visions/{id}/done
pub async fn set_done(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetDoneRequest>,
) -> ApiResult<Json<LifeVisionItem>> {
    let db_state = state.clone();
    let updated = blocking(move || db_state.db.set_vision_done(id, req.done))
        .await?
        .ok_or(ApiError::NotFound("vision"))?;

    state
        .dispatcher
        .broadcast(FeedEvent::Vision(Change::Updated(updated.clone())));
    Ok(Json(updated))
}

/// DELETE /visions/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let db_state = state.clone();
    let removed = blocking(move || db_state.db.delete_vision(id)).await?;
    if !removed {
        return Err(ApiError::NotFound("vision"));
    }

    state
        .dispatcher
        .broadcast(FeedEvent::Vision(Change::Deleted { id }));
    Ok(StatusCode::NO_CONTENT)
}
