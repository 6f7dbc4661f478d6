use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;

use tandem_types::api::{CreateFinanceRequest, SetAmountRequest};
use tandem_types::events::{Change, FeedEvent};
use tandem_types::models::FinanceItem;

use crate::error::{ApiError, ApiResult};
use crate::{AppState, blocking};

/// GET /finances
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<FinanceItem>>> {
    let items = blocking(move || state.db.list_finances()).await?;
    Ok(Json(items))
}

/// POST /finances
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateFinanceRequest>,
) -> ApiResult<(StatusCode, Json<FinanceItem>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::Invalid("goal title is empty".into()));
    }
    if !req.target_amount.is_finite() || req.target_amount < 0.0 {
        return Err(ApiError::Invalid("target amount must be non-negative".into()));
    }
    if !req.current_amount.is_finite() || req.current_amount < 0.0 {
        return Err(ApiError::Invalid("current amount must be non-negative".into()));
    }

    let item = FinanceItem {
        id: Uuid::new_v4(),
        title: req.title,
        target_amount: req.target_amount,
        current_amount: req.current_amount,
        kind: req.kind,
        created_at: Utc::now(),
    };

    let stored = item.clone();
    let db_state = state.clone();
    blocking(move || db_state.db.insert_finance(&stored)).await?;

    state
        .dispatcher
        .broadcast(FeedEvent::Finance(Change::Inserted(item.clone())));
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /finances/{id}/amount
pub async fn set_amount(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetAmountRequest>,
) -> ApiResult<Json<FinanceItem>> {
    if !req.current_amount.is_finite() || req.current_amount < 0.0 {
        return Err(ApiError::Invalid("current amount must be non-negative".into()));
    }

    let db_state = state.clone();
    let updated = blocking(move || db_state.db.set_finance_amount(id, req.current_amount))
        .await?
        .ok_or(ApiError::NotFound("finance goal"))?;

    state
        .dispatcher
        .broadcast(FeedEvent::Finance(Change::Updated(updated.clone())));
    Ok(Json(updated))
}

/// DELETE /finances/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let db_state = state.clone();
    let removed = blocking(move || db_state.db.delete_finance(id)).await?;
    if !removed {
        return Err(ApiError::NotFound("finance goal"));
    }

    state
        .dispatcher
        .broadcast(FeedEvent::Finance(Change::Deleted { id }));
    Ok(StatusCode::NO_CONTENT)
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
        let dir = std::env::temp_dir().join(format!("tandem-finances-{}", Uuid::new_v4()));
        Arc::new(AppStateInner {
            db: Arc::new(Database::open_in_memory().unwrap()),
            dispatcher: Dispatcher::default(),
            storage: Storage::new(dir, "http://localhost:4000".into())
                .await
                .unwrap(),
            harmony: Harmony::disabled(),
        })
    }

    fn goal_req(title: &str, target: f64, kind: &str) -> CreateFinanceRequest {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "target_amount": target,
            "type": kind,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn amount_updates_are_broadcast_shaped() {
        let state = test_state().await;
        let (_, Json(goal)) = create(
            State(state.clone()),
            Json(goal_req("japan trip", 5000.0, "saving")),
        )
        .await
        .unwrap();
        assert_eq!(goal.current_amount, 0.0);

        let Json(updated) = set_amount(
            State(state),
            Path(goal.id),
            Json(SetAmountRequest {
                current_amount: 1200.0,
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.current_amount, 1200.0);
    }

    #[tokio::test]
    async fn negative_amounts_are_rejected() {
        let state = test_state().await;
        let err = create(
            State(state),
            Json(goal_req("broken", -10.0, "expense")),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));
    }
}
