use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;

use tandem_types::api::{CreateRequestRequest, SetRequestStatusRequest};
use tandem_types::events::{Change, FeedEvent};
use tandem_types::models::{RequestItem, RequestStatus};

use crate::error::{ApiError, ApiResult};
use crate::{AppState, blocking};

/// GET /requests
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<RequestItem>>> {
    let requests = blocking(move || state.db.list_requests()).await?;
    Ok(Json(requests))
}

/// POST /requests
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequestRequest>,
) -> ApiResult<(StatusCode, Json<RequestItem>)> {
    if req.details.trim().is_empty() {
        return Err(ApiError::Invalid("request details are empty".into()));
    }

    let item = RequestItem {
        id: Uuid::new_v4(),
        from_user: req.from_user,
        kind: req.kind,
        details: req.details,
        status: RequestStatus::Pending,
        target_date: req.target_date,
        completed_at: None,
        created_at: Utc::now(),
    };

    let stored = item.clone();
    let db_state = state.clone();
    blocking(move || db_state.db.insert_request(&stored)).await?;

    state
        .dispatcher
        .broadcast(FeedEvent::Request(Change::Inserted(item.clone())));
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /requests/{id}/status
///
/// Moving into Completed stamps completed_at; moving anywhere else
/// clears it again.
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetRequestStatusRequest>,
) -> ApiResult<Json<RequestItem>> {
    let completed_at = match req.status {
        RequestStatus::Completed => Some(Utc::now()),
        _ => None,
    };

    let db_state = state.clone();
    let updated = blocking(move || db_state.db.set_request_status(id, req.status, completed_at))
        .await?
        .ok_or(ApiError::NotFound("request"))?;

    state
        .dispatcher
        .broadcast(FeedEvent::Request(Change::Updated(updated.clone())));
    Ok(Json(updated))
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

    async fn test_state() -> AppState {
        let dir = std::env::temp_dir().join(format!("tandem-requests-{}", Uuid::new_v4()));
        Arc::new(AppStateInner {
            db: Arc::new(Database::open_in_memory().unwrap()),
            dispatcher: Dispatcher::default(),
            storage: Storage::new(dir, "http://localhost:4000".into())
                .await
                .unwrap(),
            harmony: Harmony::disabled(),
        })
    }

    fn request_req(details: &str) -> CreateRequestRequest {
        serde_json::from_value(serde_json::json!({
            "from_user": "Lulu",
            "type": "date",
            "details": details,
            "target_date": null,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn completing_stamps_and_reopening_clears() {
        let state = test_state().await;
        let (_, Json(item)) = create(State(state.clone()), Json(request_req("picnic at the park")))
            .await
            .unwrap();
        assert_eq!(item.status, RequestStatus::Pending);
        assert!(item.completed_at.is_none());

        let Json(done) = set_status(
            State(state.clone()),
            Path(item.id),
            Json(SetRequestStatusRequest {
                status: RequestStatus::Completed,
            }),
        )
        .await
        .unwrap();
        assert!(done.completed_at.is_some());

        let Json(reopened) = set_status(
            State(state),
            Path(item.id),
            Json(SetRequestStatusRequest {
                status: RequestStatus::Pending,
            }),
        )
        .await
        .unwrap();
        assert!(reopened.completed_at.is_none());
    }

    #[tokio::test]
    async fn missing_request_is_not_found() {
        let state = test_state().await;
        let err = set_status(
            State(state),
            Path(Uuid::new_v4()),
            Json(SetRequestStatusRequest {
                status: RequestStatus::Accepted,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("request")));
    }
}
